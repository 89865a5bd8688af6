//! # Objects
//!
//! Opaque refcounted blocks for native bindings. The payload's own `Drop`
//! is the object's destructor: it runs exactly once, when the last alias is
//! released.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use tracing::trace;

use crate::error::{ErgoError, OrTrap, Result};
use crate::runtime::stats::{self, HeapKind};
use crate::runtime::value::Value;

pub struct Object {
    kind: &'static str,
    payload: Box<dyn Any>,
}

impl Object {
    pub fn new<T: Any>(kind: &'static str, payload: T) -> Object {
        stats::record_alloc(HeapKind::Object);
        Object {
            kind,
            payload: Box::new(payload),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Payload as `T`, or a type error naming `expected`
    pub fn payload<T: Any>(&self, expected: &str) -> Result<&T> {
        self.downcast_ref::<T>().ok_or_else(|| {
            ErgoError::TypeError(format!("expected {}, found {} object", expected, self.kind))
        })
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        trace!(kind = self.kind, "freeing object");
        stats::record_free(HeapKind::Object);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("kind", &self.kind).finish()
    }
}

pub fn obj_new<T: Any>(kind: &'static str, payload: T) -> Value {
    Value::object(Object::new(kind, payload))
}

/// A single mutable slot shared by every alias of its object
pub struct StateCell {
    value: RefCell<Value>,
}

pub const STATE_CELL_KIND: &str = "cell";

impl StateCell {
    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        let previous = self.value.replace(value);
        drop(previous);
    }
}

/// New state cell owning `initial`
pub fn cell_new(initial: Value) -> Value {
    obj_new(
        STATE_CELL_KIND,
        StateCell {
            value: RefCell::new(initial),
        },
    )
}

pub fn try_cell_get(cell: &Value) -> Result<Value> {
    let object = cell.try_as_object()?;
    Ok(object.payload::<StateCell>("state cell")?.get())
}

pub fn try_cell_set(cell: &Value, value: Value) -> Result<()> {
    let object = cell.try_as_object()?;
    object.payload::<StateCell>("state cell")?.set(value);
    Ok(())
}

pub fn cell_get(cell: &Value) -> Value {
    try_cell_get(cell).or_trap()
}

pub fn cell_set(cell: &Value, value: Value) {
    try_cell_set(cell, value).or_trap()
}
