//! # Native Handles
//!
//! Wraps opaque toolkit widgets in runtime objects. A widget pointer always
//! maps back to the same handle object while that object is alive, and a
//! handle with registered callbacks is kept alive by the registry until the
//! callbacks are cleared.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::{OrTrap, Result};
use crate::runtime::closure;
use crate::runtime::object::Object;
use crate::runtime::value::Value;

/// Opaque widget pointer owned by the native toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativePtr(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Window,
    Button,
    Entry,
    List,
    Label,
    Other,
}

/// Events a callback can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Click,
    Change,
    Select,
    Activate,
}

impl Event {
    pub const ALL: [Event; 4] = [Event::Click, Event::Change, Event::Select, Event::Activate];

    fn slot(self) -> usize {
        match self {
            Event::Click => 0,
            Event::Change => 1,
            Event::Select => 2,
            Event::Activate => 3,
        }
    }
}

/// The native side of the binding
///
/// `connect` must arrange for [`dispatch`] to be called with the same widget
/// and event whenever the event fires.
pub trait Toolkit {
    fn connect(&self, widget: NativePtr, event: Event);
    fn disconnect(&self, widget: NativePtr, event: Event);
}

pub const HANDLE_KIND: &str = "handle";

pub struct Handle {
    native: NativePtr,
    kind: WidgetKind,
    callbacks: RefCell<[Value; 4]>,
}

impl Handle {
    pub fn native(&self) -> NativePtr {
        self.native
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn callback(&self, event: Event) -> Value {
        self.callbacks.borrow()[event.slot()].clone()
    }

    fn replace_callback(&self, event: Event, callback: Value) -> Value {
        std::mem::replace(&mut self.callbacks.borrow_mut()[event.slot()], callback)
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        let native = self.native;
        let _ = REGISTRY.try_with(|registry| {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                // Only forget the entry if it still points at a dead object
                let stale = registry
                    .lookup
                    .get(&native)
                    .map_or(false, |weak| weak.strong_count() == 0);
                if stale {
                    registry.lookup.remove(&native);
                }
            }
        });
        debug!(native = native.0, "handle freed");
    }
}

#[derive(Default)]
struct Registry {
    lookup: HashMap<NativePtr, Weak<Object>>,
    /// One owning alias of the handle per connected event
    pinned: HashMap<(NativePtr, Event), Value>,
    toolkit: Option<Rc<dyn Toolkit>>,
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

/// Install the toolkit that receives connect/disconnect requests
pub fn set_toolkit(toolkit: Rc<dyn Toolkit>) {
    let previous = REGISTRY.with(|r| r.borrow_mut().toolkit.replace(toolkit));
    // The old toolkit may own the last alias of a handle, whose drop needs
    // the registry
    drop(previous);
}

fn toolkit() -> Option<Rc<dyn Toolkit>> {
    REGISTRY.with(|r| r.borrow().toolkit.clone())
}

/// The handle object for `native`, created on first sight
pub fn wrap(native: NativePtr, kind: WidgetKind) -> Value {
    let existing = REGISTRY.with(|r| r.borrow().lookup.get(&native).and_then(Weak::upgrade));
    if let Some(object) = existing {
        return Value::Obj(object);
    }

    let object = Rc::new(Object::new(
        HANDLE_KIND,
        Handle {
            native,
            kind,
            callbacks: RefCell::new(Default::default()),
        },
    ));
    REGISTRY.with(|r| {
        r.borrow_mut()
            .lookup
            .insert(native, Rc::downgrade(&object))
    });
    debug!(native = native.0, ?kind, "handle created");
    Value::Obj(object)
}

/// The live handle object for `native`, if any
pub fn lookup(native: NativePtr) -> Value {
    REGISTRY
        .with(|r| r.borrow().lookup.get(&native).and_then(Weak::upgrade))
        .map_or(Value::Null, Value::Obj)
}

pub fn try_handle(value: &Value) -> Result<&Handle> {
    value.try_as_object()?.payload::<Handle>("native handle")
}

pub fn native_ptr(value: &Value) -> Result<NativePtr> {
    Ok(try_handle(value)?.native())
}

/// Number of live handle objects on this thread
pub fn handle_count() -> usize {
    REGISTRY.with(|r| {
        r.borrow()
            .lookup
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    })
}

/// Attach `callback` to `event`, or detach when it is not a function
pub fn try_set_callback(handle: &Value, event: Event, callback: Value) -> Result<()> {
    let native = try_handle(handle)?.native();

    if matches!(callback, Value::Fn(_)) {
        let previous = try_handle(handle)?.replace_callback(event, callback);
        let newly_pinned = REGISTRY.with(|r| {
            let mut registry = r.borrow_mut();
            let key = (native, event);
            if registry.pinned.contains_key(&key) {
                false
            } else {
                registry.pinned.insert(key, handle.clone());
                true
            }
        });
        if newly_pinned {
            if let Some(toolkit) = toolkit() {
                toolkit.connect(native, event);
            }
        }
        debug!(native = native.0, ?event, "callback set");
        drop(previous);
    } else {
        let previous = try_handle(handle)?.replace_callback(event, Value::Null);
        let unpinned = REGISTRY.with(|r| r.borrow_mut().pinned.remove(&(native, event)));
        if unpinned.is_some() {
            if let Some(toolkit) = toolkit() {
                toolkit.disconnect(native, event);
            }
        }
        debug!(native = native.0, ?event, "callback cleared");
        drop(previous);
        // May free the handle, which re-enters the registry
        drop(unpinned);
    }
    Ok(())
}

pub fn set_callback(handle: &Value, event: Event, callback: Value) {
    try_set_callback(handle, event, callback).or_trap()
}

/// Trampoline for toolkit events
///
/// Calls the closure registered for `event` on `native` with the handle
/// followed by `args`. Returns `Ok(false)` when nothing is registered.
pub fn try_dispatch(native: NativePtr, event: Event, args: Vec<Value>) -> Result<bool> {
    let handle = lookup(native);
    if handle.is_null() {
        return Ok(false);
    }
    let callback = try_handle(&handle)?.callback(event);
    if callback.is_null() {
        return Ok(false);
    }

    let mut call_args = Vec::with_capacity(args.len() + 1);
    call_args.push(handle);
    call_args.extend(args);
    let result = closure::try_call(&callback, &call_args)?;
    drop(result);
    Ok(true)
}

pub fn dispatch(native: NativePtr, event: Event, args: Vec<Value>) -> bool {
    try_dispatch(native, event, args).or_trap()
}

/// Detach every callback of `handle`
pub fn clear_callbacks(handle: &Value) -> Result<()> {
    for event in Event::ALL {
        try_set_callback(handle, event, Value::Null)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErgoError;
    use crate::runtime::closure::fn_new;
    use crate::runtime::object::{cell_get, cell_new, cell_set};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingToolkit {
        log: RefCell<Vec<(usize, Event, bool)>>,
    }

    impl Toolkit for RecordingToolkit {
        fn connect(&self, widget: NativePtr, event: Event) {
            self.log.borrow_mut().push((widget.0, event, true));
        }

        fn disconnect(&self, widget: NativePtr, event: Event) {
            self.log.borrow_mut().push((widget.0, event, false));
        }
    }

    fn count_clicks(env: &[Value], _args: &[Value]) -> Value {
        let current = cell_get(&env[0]).as_int();
        cell_set(&env[0], Value::Int(current + 1));
        Value::Null
    }

    fn ignore(_env: &[Value], _args: &[Value]) -> Value {
        Value::Null
    }

    #[test]
    fn same_widget_maps_to_same_handle() {
        let a = wrap(NativePtr(0x10), WidgetKind::Button);
        let b = wrap(NativePtr(0x10), WidgetKind::Button);
        assert_eq!(a, b);
        assert_eq!(native_ptr(&a).unwrap(), NativePtr(0x10));
        assert_eq!(try_handle(&a).unwrap().kind(), WidgetKind::Button);
    }

    #[test]
    fn released_handle_is_forgotten() {
        let before = handle_count();
        let h = wrap(NativePtr(0x20), WidgetKind::Label);
        assert_eq!(handle_count(), before + 1);
        drop(h);
        assert_eq!(handle_count(), before);
        assert!(lookup(NativePtr(0x20)).is_null());
    }

    #[test]
    fn callback_fires_through_dispatch() {
        let toolkit = Rc::new(RecordingToolkit::default());
        set_toolkit(toolkit.clone());

        let clicks = cell_new(Value::Int(0));
        let h = wrap(NativePtr(0x30), WidgetKind::Button);
        let cb = closure::fn_new_with_env(count_clicks, 1, vec![clicks.clone()]);
        set_callback(&h, Event::Click, cb);

        assert!(dispatch(NativePtr(0x30), Event::Click, vec![]));
        assert!(dispatch(NativePtr(0x30), Event::Click, vec![]));
        assert!(!dispatch(NativePtr(0x30), Event::Change, vec![]));
        assert_eq!(cell_get(&clicks), Value::Int(2));
        assert_eq!(*toolkit.log.borrow(), vec![(0x30, Event::Click, true)]);
    }

    #[test]
    fn registered_callback_keeps_handle_alive() {
        let h = wrap(NativePtr(0x40), WidgetKind::Entry);
        set_callback(&h, Event::Change, fn_new(ignore, 1));
        drop(h);

        let again = lookup(NativePtr(0x40));
        assert!(!again.is_null());

        set_callback(&again, Event::Change, Value::Null);
        drop(again);
        assert!(lookup(NativePtr(0x40)).is_null());
    }

    #[test]
    fn clearing_releases_closure_and_disconnects() {
        let toolkit = Rc::new(RecordingToolkit::default());
        set_toolkit(toolkit.clone());

        let h = wrap(NativePtr(0x50), WidgetKind::List);
        let cb = fn_new(ignore, 1);
        set_callback(&h, Event::Select, cb.clone());
        assert_eq!(cb.ref_count(), Some(2));

        clear_callbacks(&h).unwrap();
        assert_eq!(cb.ref_count(), Some(1));
        assert_eq!(
            *toolkit.log.borrow(),
            vec![(0x50, Event::Select, true), (0x50, Event::Select, false)]
        );
    }

    #[test]
    fn arity_mismatch_in_callback_is_an_error() {
        let h = wrap(NativePtr(0x60), WidgetKind::Button);
        set_callback(&h, Event::Activate, fn_new(ignore, 0));
        assert!(matches!(
            try_dispatch(NativePtr(0x60), Event::Activate, vec![]),
            Err(ErgoError::ArgumentMismatch(_))
        ));
        clear_callbacks(&h).unwrap();
    }

    struct OwningToolkit {
        _owned: Vec<Value>,
    }

    impl Toolkit for OwningToolkit {
        fn connect(&self, _widget: NativePtr, _event: Event) {}
        fn disconnect(&self, _widget: NativePtr, _event: Event) {}
    }

    #[test]
    fn replacing_toolkit_frees_handles_it_owned() {
        let before = handle_count();
        let owning = Rc::new(OwningToolkit {
            _owned: vec![wrap(NativePtr(0x70), WidgetKind::Window)],
        });
        set_toolkit(owning.clone());
        drop(owning);
        assert_eq!(handle_count(), before + 1);

        set_toolkit(Rc::new(RecordingToolkit::default()));
        assert_eq!(handle_count(), before);
        let stale = REGISTRY.with(|r| r.borrow().lookup.contains_key(&NativePtr(0x70)));
        assert!(!stale);
    }

    #[test]
    fn non_handles_are_rejected() {
        assert!(try_set_callback(&Value::Int(1), Event::Click, Value::Null).is_err());
        let cell = cell_new(Value::Null);
        assert!(native_ptr(&cell).is_err());
    }
}
