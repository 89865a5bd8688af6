//! # Mathematical Operations Library
//!
//! Numeric functions for Ergo programs, following the runtime's promotion
//! rules: a Float argument makes the result a Float.

use crate::error::Result;
use crate::runtime::ops::{promote, Operands};
use crate::runtime::value::Value;

/// Mathematical constants
pub struct MathConstants;

impl MathConstants {
    pub const PI: f64 = std::f64::consts::PI;
    pub const E: f64 = std::f64::consts::E;
}

/// Basic mathematical operations
pub struct MathOps;

impl MathOps {
    pub fn abs(value: &Value) -> Result<Value> {
        match value {
            Value::Float(x) => Ok(Value::Float(x.abs())),
            other => Ok(Value::Int(other.try_as_int()?.wrapping_abs())),
        }
    }

    pub fn max(a: &Value, b: &Value) -> Result<Value> {
        Ok(match promote(a, b)? {
            Operands::Int(x, y) => Value::Int(x.max(y)),
            Operands::Float(x, y) => Value::Float(x.max(y)),
        })
    }

    pub fn min(a: &Value, b: &Value) -> Result<Value> {
        Ok(match promote(a, b)? {
            Operands::Int(x, y) => Value::Int(x.min(y)),
            Operands::Float(x, y) => Value::Float(x.min(y)),
        })
    }

    /// Integer power for a non-negative integer exponent, float power otherwise
    pub fn pow(base: &Value, exponent: &Value) -> Result<Value> {
        Ok(match promote(base, exponent)? {
            Operands::Int(b, e) if e >= 0 => {
                Value::Int(b.wrapping_pow(u32::try_from(e).unwrap_or(u32::MAX)))
            }
            Operands::Int(b, e) => Value::Float((b as f64).powf(e as f64)),
            Operands::Float(b, e) => Value::Float(b.powf(e)),
        })
    }

    pub fn sqrt(value: &Value) -> Result<Value> {
        Ok(Value::Float(value.try_as_float()?.sqrt()))
    }

    pub fn floor(value: &Value) -> Result<Value> {
        match value {
            Value::Float(x) => Ok(Value::Float(x.floor())),
            other => Ok(Value::Int(other.try_as_int()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_keeps_kind() {
        assert_eq!(MathOps::abs(&Value::Int(-4)).unwrap(), Value::Int(4));
        assert_eq!(MathOps::abs(&Value::Float(-1.5)).unwrap(), Value::Float(1.5));
    }

    #[test]
    fn min_max_promote() {
        assert_eq!(MathOps::max(&Value::Int(2), &Value::Int(5)).unwrap(), Value::Int(5));
        assert_eq!(MathOps::min(&Value::Int(2), &Value::Float(0.5)).unwrap(), Value::Float(0.5));
    }

    #[test]
    fn pow_cases() {
        assert_eq!(MathOps::pow(&Value::Int(2), &Value::Int(10)).unwrap(), Value::Int(1024));
        assert_eq!(MathOps::pow(&Value::Int(2), &Value::Int(-1)).unwrap(), Value::Float(0.5));
        assert_eq!(MathOps::pow(&Value::Float(9.0), &Value::Float(0.5)).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn sqrt_and_floor() {
        assert_eq!(MathOps::sqrt(&Value::Int(16)).unwrap(), Value::Float(4.0));
        assert_eq!(MathOps::floor(&Value::Float(2.7)).unwrap(), Value::Float(2.0));
        assert_eq!(MathOps::floor(&Value::Int(3)).unwrap(), Value::Int(3));
        assert!(MathOps::sqrt(&Value::str("4")).is_err());
        assert!(MathConstants::PI > 3.0);
    }
}
