//! # String Library
//!
//! String manipulation functions for Ergo programs. Every result is a new
//! string; inputs are never modified.

use std::rc::Rc;

use crate::error::{ErgoError, Result};
use crate::runtime::string::{str_from_parts, Str};
use crate::runtime::value::Value;

fn new_str(bytes: &[u8]) -> Value {
    Value::Str(Rc::new(Str::from_bytes(bytes)))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// String manipulation operations
pub struct StringOps;

impl StringOps {
    /// Length in bytes
    pub fn length(s: &Value) -> Result<Value> {
        Ok(Value::Int(s.try_as_str()?.len() as i64))
    }

    pub fn upper(s: &Value) -> Result<Value> {
        Ok(new_str(&s.try_as_str()?.as_bytes().to_ascii_uppercase()))
    }

    pub fn lower(s: &Value) -> Result<Value> {
        Ok(new_str(&s.try_as_str()?.as_bytes().to_ascii_lowercase()))
    }

    /// Strip leading and trailing ASCII whitespace
    pub fn trim(s: &Value) -> Result<Value> {
        let bytes = s.try_as_str()?.as_bytes();
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        let end = bytes
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(start, |at| at + 1);
        Ok(new_str(&bytes[start..end]))
    }

    /// Concatenation of the stringified operands
    pub fn concat(a: &Value, b: &Value) -> Result<Value> {
        Ok(str_from_parts(&[a.clone(), b.clone()]))
    }

    /// `length` bytes starting at `start`, clamped to the end of the string
    pub fn substring(s: &Value, start: &Value, length: &Value) -> Result<Value> {
        let bytes = s.try_as_str()?.as_bytes();
        let (start_idx, len) = (start.try_as_int()?, length.try_as_int()?);
        if start_idx < 0 || len < 0 {
            return Err(ErgoError::IndexError(
                "Negative indices not allowed".to_string(),
            ));
        }
        let start_pos = (start_idx as usize).min(bytes.len());
        let end_pos = start_pos.saturating_add(len as usize).min(bytes.len());
        Ok(new_str(&bytes[start_pos..end_pos]))
    }

    /// Byte offset of the first occurrence of `needle`, -1 when absent
    pub fn index_of(s: &Value, needle: &Value) -> Result<Value> {
        let haystack = s.try_as_str()?.as_bytes();
        let needle = needle.try_as_str()?.as_bytes();
        Ok(Value::Int(find(haystack, needle).map_or(-1, |at| at as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &Value) -> String {
        v.as_str().to_string_lossy().into_owned()
    }

    #[test]
    fn length_and_case() {
        let s = Value::str("Ergo");
        assert_eq!(StringOps::length(&s).unwrap(), Value::Int(4));
        assert_eq!(text(&StringOps::upper(&s).unwrap()), "ERGO");
        assert_eq!(text(&StringOps::lower(&s).unwrap()), "ergo");
        assert_eq!(text(&StringOps::trim(&Value::str("  x \n")).unwrap()), "x");
    }

    #[test]
    fn concat_stringifies() {
        let joined = StringOps::concat(&Value::str("n="), &Value::Int(3)).unwrap();
        assert_eq!(text(&joined), "n=3");
    }

    #[test]
    fn substring_clamps() {
        let s = Value::str("runtime");
        let sub = |a, b| text(&StringOps::substring(&s, &Value::Int(a), &Value::Int(b)).unwrap());
        assert_eq!(sub(0, 3), "run");
        assert_eq!(sub(3, 100), "time");
        assert_eq!(sub(50, 2), "");
        assert!(matches!(
            StringOps::substring(&s, &Value::Int(-1), &Value::Int(2)),
            Err(ErgoError::IndexError(_))
        ));
    }

    #[test]
    fn index_of_reports_absence() {
        let s = Value::str("hello world");
        assert_eq!(StringOps::index_of(&s, &Value::str("world")).unwrap(), Value::Int(6));
        assert_eq!(StringOps::index_of(&s, &Value::str("xyz")).unwrap(), Value::Int(-1));
    }

    #[test]
    fn non_strings_are_rejected() {
        assert!(matches!(StringOps::length(&Value::Int(1)), Err(ErgoError::TypeError(_))));
    }
}
