//! # Values
//!
//! The universal currency of compiled Ergo code. Scalars live inline; heap
//! kinds hold an `Rc`, so cloning a `Value` is a retain and dropping it is a
//! release.

use std::fmt;
use std::rc::Rc;

use crate::error::{ErgoError, OrTrap, Result};
use crate::runtime::array::Array;
use crate::runtime::closure::Closure;
use crate::runtime::object::Object;
use crate::runtime::string::Str;

/// Discriminant of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Null,
    Int,
    Float,
    Bool,
    Str,
    Arr,
    Obj,
    Fn,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Bool => "bool",
            Tag::Str => "string",
            Tag::Arr => "array",
            Tag::Obj => "object",
            Tag::Fn => "function",
        }
    }

    /// Whether values with this tag point at a refcounted heap block
    pub fn is_heap(self) -> bool {
        matches!(self, Tag::Str | Tag::Arr | Tag::Obj | Tag::Fn)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<Str>),
    Arr(Rc<Array>),
    Obj(Rc<Object>),
    Fn(Rc<Closure>),
}

fn mismatch(expected: &str, found: &Value) -> ErgoError {
    ErgoError::TypeError(format!("expected {}, found {}", expected, found.tag()))
}

impl Value {
    pub fn int(n: i64) -> Value {
        Value::Int(n)
    }

    pub fn float(x: f64) -> Value {
        Value::Float(x)
    }

    pub fn bool(b: bool) -> Value {
        Value::Bool(b)
    }

    pub fn str(s: &str) -> Value {
        Value::Str(Rc::new(Str::from_lit(s)))
    }

    pub fn array(array: Array) -> Value {
        Value::Arr(Rc::new(array))
    }

    pub fn object(object: Object) -> Value {
        Value::Obj(Rc::new(object))
    }

    pub fn closure(closure: Closure) -> Value {
        Value::Fn(Rc::new(closure))
    }

    pub fn tag(&self) -> Tag {
        match self {
            Value::Null => Tag::Null,
            Value::Int(_) => Tag::Int,
            Value::Float(_) => Tag::Float,
            Value::Bool(_) => Tag::Bool,
            Value::Str(_) => Tag::Str,
            Value::Arr(_) => Tag::Arr,
            Value::Obj(_) => Tag::Obj,
            Value::Fn(_) => Tag::Fn,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Number of live aliases of the pointee, `None` for scalars
    pub fn ref_count(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(Rc::strong_count(s)),
            Value::Arr(a) => Some(Rc::strong_count(a)),
            Value::Obj(o) => Some(Rc::strong_count(o)),
            Value::Fn(c) => Some(Rc::strong_count(c)),
            _ => None,
        }
    }

    /// Move the value out, leaving `Null` behind
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    pub fn try_as_int(&self) -> Result<i64> {
        match self {
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(*b as i64),
            Value::Float(x) => Ok(*x as i64),
            other => Err(mismatch("int", other)),
        }
    }

    pub fn try_as_float(&self) -> Result<f64> {
        match self {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(mismatch("float", other)),
        }
    }

    pub fn try_as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(n) => Ok(*n != 0),
            Value::Float(x) => Ok(*x != 0.0),
            Value::Null => Ok(false),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn as_int(&self) -> i64 {
        self.try_as_int().or_trap()
    }

    pub fn as_float(&self) -> f64 {
        self.try_as_float().or_trap()
    }

    pub fn as_bool(&self) -> bool {
        self.try_as_bool().or_trap()
    }

    pub fn try_as_str(&self) -> Result<&Rc<Str>> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn as_str(&self) -> &Rc<Str> {
        self.try_as_str().or_trap()
    }

    pub fn try_as_array(&self) -> Result<&Rc<Array>> {
        match self {
            Value::Arr(a) => Ok(a),
            other => Err(mismatch("array", other)),
        }
    }

    pub fn as_array(&self) -> &Rc<Array> {
        self.try_as_array().or_trap()
    }

    pub fn try_as_object(&self) -> Result<&Rc<Object>> {
        match self {
            Value::Obj(o) => Ok(o),
            other => Err(mismatch("object", other)),
        }
    }

    pub fn as_object(&self) -> &Rc<Object> {
        self.try_as_object().or_trap()
    }

    pub fn try_as_closure(&self) -> Result<&Rc<Closure>> {
        match self {
            Value::Fn(c) => Ok(c),
            other => Err(ErgoError::TypeError(format!(
                "cannot call a value of type {}",
                other.tag()
            ))),
        }
    }
}

/// Tags first, then content for strings and identity for other heap kinds
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b) || a.as_bytes() == b.as_bytes(),
            (Value::Arr(a), Value::Arr(b)) => Rc::ptr_eq(a, b),
            (Value::Obj(a), Value::Obj(b)) => Rc::ptr_eq(a, b),
            (Value::Fn(a), Value::Fn(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(x) => write!(f, "Float({:?})", x),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s.to_string_lossy()),
            Value::Arr(a) => write!(f, "Arr(len={})", a.len()),
            Value::Obj(o) => write!(f, "Obj({})", o.kind()),
            Value::Fn(c) => write!(f, "Fn(arity={})", c.arity()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = Vec::new();
        crate::runtime::format::render_into(self, &mut bytes);
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}
