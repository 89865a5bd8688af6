//! # Native Bindings
//!
//! Opaque widget handles, event trampolines and file dialogs. The toolkit
//! itself lives outside this crate and is reached through traits.

pub mod dialog;
pub mod handle;

pub use dialog::FileDialogs;
pub use handle::{Event, Handle, NativePtr, Toolkit, WidgetKind};
