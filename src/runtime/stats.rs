//! # Heap Instrumentation
//!
//! Per-thread allocation counters for every refcounted heap kind. Constructors
//! bump `allocated`, destructors bump `freed`; a balanced retain/release
//! discipline leaves `live() == 0` once every alias is gone.

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    Str,
    Array,
    Object,
    Closure,
}

const KINDS: usize = 4;

impl HeapKind {
    fn index(self) -> usize {
        match self {
            HeapKind::Str => 0,
            HeapKind::Array => 1,
            HeapKind::Object => 2,
            HeapKind::Closure => 3,
        }
    }
}

thread_local! {
    static ALLOCATED: Cell<[usize; KINDS]> = const { Cell::new([0; KINDS]) };
    static FREED: Cell<[usize; KINDS]> = const { Cell::new([0; KINDS]) };
}

fn bump(counter: &'static std::thread::LocalKey<Cell<[usize; KINDS]>>, kind: HeapKind) {
    // try_with: destructors may still run while thread locals are torn down
    let _ = counter.try_with(|cell| {
        let mut counts = cell.get();
        counts[kind.index()] += 1;
        cell.set(counts);
    });
}

pub(crate) fn record_alloc(kind: HeapKind) {
    bump(&ALLOCATED, kind);
}

pub(crate) fn record_free(kind: HeapKind) {
    bump(&FREED, kind);
}

/// Counters for one heap kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindCounts {
    pub allocated: usize,
    pub freed: usize,
}

impl KindCounts {
    pub fn live(&self) -> usize {
        self.allocated.saturating_sub(self.freed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveCounts {
    pub strings: KindCounts,
    pub arrays: KindCounts,
    pub objects: KindCounts,
    pub closures: KindCounts,
}

impl LiveCounts {
    pub fn live(&self) -> usize {
        self.strings.live() + self.arrays.live() + self.objects.live() + self.closures.live()
    }

    pub fn get(&self, kind: HeapKind) -> KindCounts {
        match kind {
            HeapKind::Str => self.strings,
            HeapKind::Array => self.arrays,
            HeapKind::Object => self.objects,
            HeapKind::Closure => self.closures,
        }
    }

    /// Counts accumulated since `earlier`
    pub fn since(&self, earlier: &LiveCounts) -> LiveCounts {
        let diff = |now: KindCounts, then: KindCounts| KindCounts {
            allocated: now.allocated - then.allocated,
            freed: now.freed - then.freed,
        };
        LiveCounts {
            strings: diff(self.strings, earlier.strings),
            arrays: diff(self.arrays, earlier.arrays),
            objects: diff(self.objects, earlier.objects),
            closures: diff(self.closures, earlier.closures),
        }
    }
}

/// Current counters for this thread
pub fn snapshot() -> LiveCounts {
    let allocated = ALLOCATED.with(Cell::get);
    let freed = FREED.with(Cell::get);
    let pair = |i: usize| KindCounts {
        allocated: allocated[i],
        freed: freed[i],
    };
    LiveCounts {
        strings: pair(HeapKind::Str.index()),
        arrays: pair(HeapKind::Array.index()),
        objects: pair(HeapKind::Object.index()),
        closures: pair(HeapKind::Closure.index()),
    }
}
