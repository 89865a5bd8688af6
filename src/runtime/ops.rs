//! # Arithmetic & Comparison
//!
//! Numeric promotion rules: any Float operand makes the whole operation
//! floating point, otherwise it runs on i64 with truncating division.
//! Ordering comparisons always go through f64.

use crate::error::{ErgoError, OrTrap, Result};
use crate::runtime::value::Value;

pub(crate) enum Operands {
    Int(i64, i64),
    Float(f64, f64),
}

pub(crate) fn promote(a: &Value, b: &Value) -> Result<Operands> {
    if matches!(a, Value::Float(_)) || matches!(b, Value::Float(_)) {
        Ok(Operands::Float(a.try_as_float()?, b.try_as_float()?))
    } else {
        Ok(Operands::Int(a.try_as_int()?, b.try_as_int()?))
    }
}

pub fn try_add(a: &Value, b: &Value) -> Result<Value> {
    Ok(match promote(a, b)? {
        Operands::Int(x, y) => Value::Int(x.wrapping_add(y)),
        Operands::Float(x, y) => Value::Float(x + y),
    })
}

pub fn try_sub(a: &Value, b: &Value) -> Result<Value> {
    Ok(match promote(a, b)? {
        Operands::Int(x, y) => Value::Int(x.wrapping_sub(y)),
        Operands::Float(x, y) => Value::Float(x - y),
    })
}

pub fn try_mul(a: &Value, b: &Value) -> Result<Value> {
    Ok(match promote(a, b)? {
        Operands::Int(x, y) => Value::Int(x.wrapping_mul(y)),
        Operands::Float(x, y) => Value::Float(x * y),
    })
}

pub fn try_div(a: &Value, b: &Value) -> Result<Value> {
    match promote(a, b)? {
        Operands::Int(_, 0) => Err(ErgoError::DivisionByZero),
        Operands::Int(x, y) => Ok(Value::Int(x.wrapping_div(y))),
        Operands::Float(x, y) => Ok(Value::Float(x / y)),
    }
}

pub fn try_rem(a: &Value, b: &Value) -> Result<Value> {
    if matches!(a, Value::Float(_)) || matches!(b, Value::Float(_)) {
        return Err(ErgoError::TypeError(
            "modulo requires integer operands".to_string(),
        ));
    }
    match (a.try_as_int()?, b.try_as_int()?) {
        (_, 0) => Err(ErgoError::DivisionByZero),
        (x, y) => Ok(Value::Int(x.wrapping_rem(y))),
    }
}

pub fn try_neg(a: &Value) -> Result<Value> {
    match a {
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Ok(Value::Int(other.try_as_int()?.wrapping_neg())),
    }
}

fn compare(a: &Value, b: &Value, op: fn(f64, f64) -> bool) -> Result<Value> {
    Ok(Value::Bool(op(a.try_as_float()?, b.try_as_float()?)))
}

pub fn try_lt(a: &Value, b: &Value) -> Result<Value> {
    compare(a, b, |x, y| x < y)
}

pub fn try_le(a: &Value, b: &Value) -> Result<Value> {
    compare(a, b, |x, y| x <= y)
}

pub fn try_gt(a: &Value, b: &Value) -> Result<Value> {
    compare(a, b, |x, y| x > y)
}

pub fn try_ge(a: &Value, b: &Value) -> Result<Value> {
    compare(a, b, |x, y| x >= y)
}

pub fn add(a: &Value, b: &Value) -> Value {
    try_add(a, b).or_trap()
}

pub fn sub(a: &Value, b: &Value) -> Value {
    try_sub(a, b).or_trap()
}

pub fn mul(a: &Value, b: &Value) -> Value {
    try_mul(a, b).or_trap()
}

pub fn div(a: &Value, b: &Value) -> Value {
    try_div(a, b).or_trap()
}

pub fn rem(a: &Value, b: &Value) -> Value {
    try_rem(a, b).or_trap()
}

pub fn neg(a: &Value) -> Value {
    try_neg(a).or_trap()
}

pub fn lt(a: &Value, b: &Value) -> Value {
    try_lt(a, b).or_trap()
}

pub fn le(a: &Value, b: &Value) -> Value {
    try_le(a, b).or_trap()
}

pub fn gt(a: &Value, b: &Value) -> Value {
    try_gt(a, b).or_trap()
}

pub fn ge(a: &Value, b: &Value) -> Value {
    try_ge(a, b).or_trap()
}

pub fn eq(a: &Value, b: &Value) -> Value {
    Value::Bool(a == b)
}

pub fn ne(a: &Value, b: &Value) -> Value {
    Value::Bool(a != b)
}
