//! # Closures
//!
//! A compiled function plus the values it captured. Captures are by value:
//! the closure owns one alias of each and releases them when it dies.

use std::fmt;

use tracing::trace;

use crate::error::{ErgoError, OrTrap, Result};
use crate::runtime::stats::{self, HeapKind};
use crate::runtime::value::Value;

/// Calling convention of compiled Ergo functions
///
/// Arguments are borrowed from the caller; the returned value is owned by it.
pub type NativeFn = fn(env: &[Value], args: &[Value]) -> Value;

/// Arity of functions that accept any argument count
pub const VARIADIC: i32 = -1;

pub struct Closure {
    arity: i32,
    func: NativeFn,
    env: Box<[Value]>,
}

impl Closure {
    pub fn new(func: NativeFn, arity: i32) -> Closure {
        Closure::with_env(func, arity, Vec::new())
    }

    /// Closure owning `env`; the caller hands over one alias per capture
    pub fn with_env(func: NativeFn, arity: i32, env: Vec<Value>) -> Closure {
        stats::record_alloc(HeapKind::Closure);
        Closure {
            arity,
            func,
            env: env.into_boxed_slice(),
        }
    }

    pub fn arity(&self) -> i32 {
        self.arity
    }

    pub fn is_variadic(&self) -> bool {
        self.arity < 0
    }

    pub fn env(&self) -> &[Value] {
        &self.env
    }

    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        if !self.is_variadic() && args.len() != self.arity as usize {
            return Err(ErgoError::ArgumentMismatch(format!(
                "function expects {} argument(s), got {}",
                self.arity,
                args.len()
            )));
        }
        Ok((self.func)(&self.env, args))
    }
}

impl Drop for Closure {
    fn drop(&mut self) {
        trace!(captures = self.env.len(), "freeing closure");
        stats::record_free(HeapKind::Closure);
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("arity", &self.arity)
            .field("env", &self.env)
            .finish()
    }
}

pub fn fn_new(func: NativeFn, arity: i32) -> Value {
    Value::closure(Closure::new(func, arity))
}

pub fn fn_new_with_env(func: NativeFn, arity: i32, env: Vec<Value>) -> Value {
    Value::closure(Closure::with_env(func, arity, env))
}

pub fn try_call(callee: &Value, args: &[Value]) -> Result<Value> {
    callee.try_as_closure()?.invoke(args)
}

/// Call `callee`, trapping on a non-function or an arity mismatch
pub fn call(callee: &Value, args: &[Value]) -> Value {
    try_call(callee, args).or_trap()
}
