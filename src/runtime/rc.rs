//! # Retain / Release
//!
//! The ownership protocol compiled code follows. A `Value` held in a slot is
//! one owning alias; `retain` makes another, `release` ends one, and the two
//! move operations transfer an alias between slots without touching counts.

use crate::runtime::value::Value;

/// A new owning alias of `v`
pub fn retain(v: &Value) -> Value {
    v.clone()
}

/// End the alias `v`; frees the pointee when it was the last one
pub fn release(v: Value) {
    drop(v);
}

/// Move the value out of `slot`, leaving `Null` behind
pub fn take(slot: &mut Value) -> Value {
    slot.take()
}

/// Release what `slot` held, then store the already owned `v`
pub fn move_into(slot: &mut Value, v: Value) {
    let previous = std::mem::replace(slot, v);
    drop(previous);
}
