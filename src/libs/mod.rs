//! # Built-in Libraries
//!
//! Standard library modules for Ergo programs

pub mod io;
pub mod math;
pub mod string;
