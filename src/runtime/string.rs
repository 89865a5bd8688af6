//! # Strings
//!
//! Immutable byte strings. Contents are fixed at construction; every
//! "modifying" operation builds a new `Str`.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::runtime::format;
use crate::runtime::stats::{self, HeapKind};
use crate::runtime::value::Value;

pub struct Str {
    bytes: Box<[u8]>,
}

impl Str {
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Str {
        stats::record_alloc(HeapKind::Str);
        Str {
            bytes: bytes.into(),
        }
    }

    pub fn from_lit(s: &str) -> Str {
        Str::from_bytes(s.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl Drop for Str {
    fn drop(&mut self) {
        stats::record_free(HeapKind::Str);
    }
}

impl PartialEq for Str {
    fn eq(&self, other: &Str) -> bool {
        self.bytes == other.bytes
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

/// String value from a literal
pub fn str_lit(s: &str) -> Value {
    Value::Str(Rc::new(Str::from_lit(s)))
}

/// String value from at most `len` leading bytes of `bytes`
pub fn str_slice(bytes: &[u8], len: usize) -> Value {
    let end = len.min(bytes.len());
    Value::Str(Rc::new(Str::from_bytes(&bytes[..end])))
}

/// Concatenate the stringified form of every part
pub fn str_from_parts(parts: &[Value]) -> Value {
    let mut bytes = Vec::new();
    for part in parts {
        format::render_into(part, &mut bytes);
    }
    Value::Str(Rc::new(Str::from_bytes(bytes)))
}

/// Stringify `v`; strings come back as a new alias of themselves
pub fn to_string(v: &Value) -> Value {
    Value::Str(format::to_str(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::array::Array;

    fn text(v: &Value) -> String {
        v.as_str().to_string_lossy().into_owned()
    }

    #[test]
    fn to_string_scalars() {
        assert_eq!(text(&to_string(&Value::Int(42))), "42");
        assert_eq!(text(&to_string(&Value::Int(-7))), "-7");
        assert_eq!(text(&to_string(&Value::Float(3.5))), "3.500000");
        assert_eq!(text(&to_string(&Value::Bool(true))), "true");
        assert_eq!(text(&to_string(&Value::Bool(false))), "false");
        assert_eq!(text(&to_string(&Value::Null)), "null");
    }

    #[test]
    fn to_string_placeholders_for_containers() {
        let arr = Value::array(Array::with_capacity(1));
        assert_eq!(text(&to_string(&arr)), "[array]");
    }

    #[test]
    fn to_string_of_string_is_the_same_block() {
        let s = str_lit("hello");
        let again = to_string(&s);
        assert_eq!(s.ref_count(), Some(2));
        match (&s, &again) {
            (Value::Str(a), Value::Str(b)) => assert!(Rc::ptr_eq(a, b)),
            _ => panic!("expected strings"),
        }
    }

    #[test]
    fn slice_is_length_bounded() {
        assert_eq!(text(&str_slice(b"abcdef", 3)), "abc");
        assert_eq!(text(&str_slice(b"ab", 10)), "ab");
    }

    #[test]
    fn from_parts_concatenates_and_frees_intermediates() {
        let before = stats::snapshot();
        {
            let parts = [str_lit("n="), Value::Int(5), str_lit(", ok="), Value::Bool(true)];
            let joined = str_from_parts(&parts);
            assert_eq!(text(&joined), "n=5, ok=true");
        }
        let after = stats::snapshot().since(&before);
        assert_eq!(after.strings.live(), 0);
        assert_eq!(after.strings.allocated, 3);
    }
}
