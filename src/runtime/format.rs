//! # Formatting & Interpolation
//!
//! Stringification of values and the `{}` placeholder language used by
//! `writef` and `readf`.

use std::rc::Rc;

use crate::runtime::array::Array;
use crate::runtime::string::Str;
use crate::runtime::value::{Tag, Value};

const PLACEHOLDER: &[u8] = b"{}";

/// Fixed six-decimal rendering, `nan`/`inf` spelled the C way
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        let text = if x > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        format!("{:.6}", x)
    }
}

/// Append the stringified form of `v` to `out`
pub fn render_into(v: &Value, out: &mut Vec<u8>) {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Int(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::Float(x) => out.extend_from_slice(format_float(*x).as_bytes()),
        Value::Str(s) => out.extend_from_slice(s.as_bytes()),
        Value::Arr(_) => out.extend_from_slice(b"[array]"),
        Value::Obj(_) => out.extend_from_slice(b"[object]"),
        Value::Fn(_) => out.extend_from_slice(b"[function]"),
    }
}

/// Stringified form of `v` as a string block
pub fn to_str(v: &Value) -> Rc<Str> {
    match v {
        Value::Str(s) => Rc::clone(s),
        other => {
            let mut bytes = Vec::new();
            render_into(other, &mut bytes);
            Rc::new(Str::from_bytes(bytes))
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Substitute `args` into the `{}` placeholders of `fmt`, left to right
///
/// Placeholders past the last argument expand to nothing.
pub fn interpolate(fmt: &[u8], args: &[Value], out: &mut Vec<u8>) {
    let mut args = args.iter();
    let mut rest = fmt;
    while let Some(at) = find(rest, PLACEHOLDER) {
        out.extend_from_slice(&rest[..at]);
        if let Some(arg) = args.next() {
            render_into(arg, out);
        }
        rest = &rest[at + PLACEHOLDER.len()..];
    }
    out.extend_from_slice(rest);
}

fn split_placeholders(fmt: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    let mut rest = fmt;
    while let Some(at) = find(rest, PLACEHOLDER) {
        segments.push(&rest[..at]);
        rest = &rest[at + PLACEHOLDER.len()..];
    }
    segments.push(rest);
    segments
}

fn trim_blanks(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', tail @ ..] = bytes {
        bytes = tail;
    }
    while let [head @ .., b' ' | b'\t'] = bytes {
        bytes = head;
    }
    bytes
}

/// Leading decimal integer of `text`, saturating, 0 when there is none
fn parse_int(text: &[u8]) -> i64 {
    let (negative, digits) = match text {
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] => (false, rest),
        _ => (false, text),
    };
    let mut n: i64 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        let d = (b - b'0') as i64;
        n = if negative {
            n.saturating_mul(10).saturating_sub(d)
        } else {
            n.saturating_mul(10).saturating_add(d)
        };
    }
    n
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of the leading `[+-]digits[.digits][(e|E)[+-]digits]` prefix
fn float_prefix_len(text: &[u8]) -> usize {
    let mut end = usize::from(matches!(text.first(), Some(b'+' | b'-')));
    let whole = count_digits(&text[end..]);
    end += whole;

    let mut fraction = 0;
    if text.get(end) == Some(&b'.') {
        fraction = count_digits(&text[end + 1..]);
        end += 1 + fraction;
    }
    if whole + fraction == 0 {
        return 0;
    }

    if matches!(text.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(text.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let digits = count_digits(&text[exp..]);
        if digits > 0 {
            end = exp + digits;
        }
    }
    end
}

/// Leading float literal of `text`, 0.0 when there is none
fn parse_float(text: &[u8]) -> f64 {
    let len = float_prefix_len(text);
    std::str::from_utf8(&text[..len])
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn parse_bool(text: &[u8]) -> bool {
    text.eq_ignore_ascii_case(b"true") || text == b"1"
}

fn parse_capture(text: &[u8], hint: Option<&Value>) -> Value {
    match hint.map(Value::tag) {
        Some(Tag::Int) => Value::Int(parse_int(text)),
        Some(Tag::Float) => Value::Float(parse_float(text)),
        Some(Tag::Bool) => Value::Bool(parse_bool(text)),
        _ => Value::Str(Rc::new(Str::from_bytes(text))),
    }
}

/// Pull the `{}` captures of `fmt` out of `line`
///
/// Each literal segment of `fmt` is searched for in `line` starting where the
/// previous one ended; the bytes in between form a capture, trimmed of spaces
/// and tabs and parsed according to the tag of the matching hint. A segment
/// that cannot be found lets its capture run to the end of the line.
pub fn scan(fmt: &[u8], line: &[u8], hints: &[Value]) -> Array {
    let segments = split_placeholders(fmt);
    let captures = segments.len() - 1;
    let out = Array::with_capacity(captures);

    let mut pos = match find(line, segments[0]) {
        Some(at) => at + segments[0].len(),
        None => 0,
    };

    for i in 0..captures {
        let separator = segments[i + 1];
        let last = i + 1 == captures;
        let end = if separator.is_empty() {
            if last {
                line.len()
            } else {
                pos
            }
        } else {
            find(&line[pos..], separator)
                .map(|at| pos + at)
                .unwrap_or(line.len())
        };

        out.add(parse_capture(trim_blanks(&line[pos..end]), hints.get(i)));
        pos = (end + separator.len()).min(line.len());
    }

    out
}
