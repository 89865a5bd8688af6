//! # Arrays
//!
//! Growable sequences of owned values. The only heap kind that is mutated in
//! place.

use std::cell::RefCell;
use std::fmt;

use tracing::trace;

use crate::runtime::stats::{self, HeapKind};
use crate::runtime::value::Value;

/// Smallest backing buffer an array is created with
pub const MIN_CAPACITY: usize = 4;

pub struct Array {
    items: RefCell<Vec<Value>>,
}

fn slot(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

impl Array {
    pub fn with_capacity(hint: usize) -> Array {
        stats::record_alloc(HeapKind::Array);
        Array {
            items: RefCell::new(Vec::with_capacity(hint.max(MIN_CAPACITY))),
        }
    }

    /// Array owning `values`
    pub fn from_values(values: Vec<Value>) -> Array {
        let array = Array::with_capacity(values.len());
        array.items.borrow_mut().extend(values);
        array
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.borrow().capacity()
    }

    /// Append `value`, taking ownership of it
    pub fn add(&self, value: Value) {
        let mut items = self.items.borrow_mut();
        if items.len() == items.capacity() {
            let grow = items.capacity().max(MIN_CAPACITY);
            items.reserve_exact(grow);
        }
        items.push(value);
    }

    /// A new alias of the element at `index`, or `Null` when out of range
    pub fn get(&self, index: i64) -> Value {
        let items = self.items.borrow();
        match slot(index, items.len()) {
            Some(i) => items[i].clone(),
            None => Value::Null,
        }
    }

    /// Replace the element at `index`, taking ownership of `value`
    ///
    /// Out of range indices drop `value` and leave the array untouched.
    pub fn set(&self, index: i64, value: Value) {
        let previous = {
            let mut items = self.items.borrow_mut();
            match slot(index, items.len()) {
                Some(i) => std::mem::replace(&mut items[i], value),
                None => value,
            }
        };
        // Released after the borrow ends so destructors may touch this array
        drop(previous);
    }

    /// Remove and hand back the element at `index`, shifting the tail down
    pub fn remove(&self, index: i64) -> Value {
        let mut items = self.items.borrow_mut();
        match slot(index, items.len()) {
            Some(i) => items.remove(i),
            None => Value::Null,
        }
    }

    pub fn pop(&self) -> Value {
        self.items.borrow_mut().pop().unwrap_or_default()
    }

    /// New aliases of every element
    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        let items = std::mem::take(self.items.get_mut());
        trace!(len = items.len(), "freeing array");
        drop(items);
        stats::record_free(HeapKind::Array);
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.borrow().iter()).finish()
    }
}

pub fn arr_new(capacity_hint: usize) -> Value {
    Value::array(Array::with_capacity(capacity_hint))
}

pub fn arr_len(array: &Value) -> i64 {
    array.as_array().len() as i64
}

pub fn arr_add(array: &Value, value: Value) {
    array.as_array().add(value)
}

pub fn arr_get(array: &Value, index: i64) -> Value {
    array.as_array().get(index)
}

pub fn arr_set(array: &Value, index: i64, value: Value) {
    array.as_array().set(index, value)
}

pub fn arr_remove(array: &Value, index: i64) -> Value {
    array.as_array().remove(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::string::str_lit;

    #[test]
    fn starts_with_minimum_capacity() {
        assert!(Array::with_capacity(0).capacity() >= MIN_CAPACITY);
        assert!(Array::with_capacity(10).capacity() >= 10);
    }

    #[test]
    fn add_get_remove_scenario() {
        let arr = Array::with_capacity(0);
        arr.add(Value::Int(1));
        arr.add(Value::Int(2));
        arr.add(Value::Int(3));
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(1), Value::Int(2));

        assert_eq!(arr.remove(0), Value::Int(1));
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0), Value::Int(2));
    }

    #[test]
    fn capacity_doubles_when_full() {
        let arr = Array::with_capacity(4);
        let initial = arr.capacity();
        for i in 0..initial as i64 {
            arr.add(Value::Int(i));
        }
        assert_eq!(arr.capacity(), initial);
        arr.add(Value::Int(99));
        assert!(arr.capacity() >= initial * 2);
    }

    #[test]
    fn out_of_range_access_is_soft() {
        let arr = Array::with_capacity(0);
        arr.add(Value::Int(1));
        assert_eq!(arr.get(5), Value::Null);
        assert_eq!(arr.get(-1), Value::Null);
        assert_eq!(arr.remove(3), Value::Null);
        arr.set(7, Value::Int(2));
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.get(0), Value::Int(1));
    }

    #[test]
    fn get_returns_fresh_alias() {
        let arr = Array::with_capacity(0);
        arr.add(str_lit("x"));
        let alias = arr.get(0);
        assert_eq!(alias.ref_count(), Some(2));
        drop(alias);
        assert_eq!(arr.get(0).ref_count(), Some(2));
    }

    #[test]
    fn set_releases_previous_element() {
        let before = stats::snapshot();
        let arr = Array::with_capacity(0);
        arr.add(str_lit("old"));
        arr.set(0, str_lit("new"));
        let now = stats::snapshot().since(&before);
        assert_eq!(now.strings.allocated, 2);
        assert_eq!(now.strings.freed, 1);
    }

    #[test]
    fn remove_transfers_ownership() {
        let arr = Array::with_capacity(0);
        arr.add(str_lit("moved"));
        let removed = arr.remove(0);
        assert_eq!(removed.ref_count(), Some(1));
        assert!(arr.is_empty());
    }

    #[test]
    fn dropping_array_releases_elements() {
        let before = stats::snapshot();
        {
            let arr = arr_new(0);
            arr_add(&arr, str_lit("a"));
            arr_add(&arr, arr_new(2));
            assert_eq!(arr_len(&arr), 2);
        }
        let now = stats::snapshot().since(&before);
        assert_eq!(now.live(), 0);
        assert_eq!(now.arrays.freed, 2);
    }
}
