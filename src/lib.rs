//! # Ergo Runtime - Support Library
//!
//! The runtime every compiled Ergo program links against
//!
//! ## Architecture
//!
//! - **Runtime**: values, refcounted strings/arrays/objects/closures,
//!   arithmetic, formatting and traps
//! - **Libraries**: console and file I/O, string and math built-ins
//! - **Native**: opaque GUI handles, event trampolines, file dialogs
//! - **Config**: process-wide runtime settings
//!

pub mod config;
pub mod error;
pub mod libs;
pub mod native;
pub mod runtime;

// Re-export commonly used types
pub use crate::config::RuntimeConfig;
pub use crate::error::{ErgoError, OrTrap, Result};
pub use crate::runtime::{Array, Closure, NativeFn, Object, Str, Tag, Value};
