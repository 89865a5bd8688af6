use thiserror::Error;

use crate::runtime::trap::trap;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErgoError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Argument mismatch: {0}")]
    ArgumentMismatch(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Index error: {0}")]
    IndexError(String),
    #[error("Value error: {0}")]
    ValueError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl From<std::io::Error> for ErgoError {
    fn from(err: std::io::Error) -> Self {
        ErgoError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ErgoError>;

/// Turns a recoverable runtime error into a fatal trap.
///
/// Generated code never sees an `ErgoError`: every primitive it calls is the
/// `or_trap` form of a fallible twin.
pub trait OrTrap<T> {
    fn or_trap(self) -> T;
}

impl<T> OrTrap<T> for Result<T> {
    fn or_trap(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => trap(&err.to_string()),
        }
    }
}
