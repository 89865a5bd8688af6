//! # Runtime System
//!
//! Values, refcounted heap kinds, the retain/release protocol, arithmetic,
//! formatting and traps

pub mod array;
pub mod closure;
pub mod format;
pub mod object;
pub mod ops;
pub mod rc;
pub mod stats;
pub mod string;
pub mod trap;
pub mod value;

pub use array::Array;
pub use closure::{Closure, NativeFn, VARIADIC};
pub use object::{Object, StateCell};
pub use string::Str;
pub use trap::trap;
pub use value::{Tag, Value};

use tracing::debug;

use crate::config::{self, RuntimeConfig};

/// Install `config` for the rest of the process
///
/// Call before the first `write`; the stdout sink picks its buffering mode
/// the first time it is used. Whatever is still buffered is flushed when the
/// process exits normally or traps.
pub fn init(config: RuntimeConfig) {
    debug!(?config, "runtime configured");
    config::install(config);
}
