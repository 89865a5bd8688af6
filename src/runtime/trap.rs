//! # Traps
//!
//! Fatal runtime errors. A trap prints a diagnostic to stderr and aborts the
//! process; nothing unwinds and nothing can catch it.

use std::io::Write;

use colored::*;
use tracing::error;

use crate::config;

pub const DEBUGGER_HINT: &str =
    "run the program under a debugger (gdb, lldb) to see where the trap was raised";

/// Render the diagnostic a trap writes to stderr
pub fn render(msg: &str, hint: bool) -> String {
    let mut out = format!("{}: {}", "error".bright_red().bold(), msg);
    if hint {
        out.push('\n');
        out.push_str(&format!("{} {}", "help:".bright_cyan(), DEBUGGER_HINT));
    }
    out
}

/// Abort the process with `msg`
pub fn trap(msg: &str) -> ! {
    error!(reason = msg, "runtime trap");

    // Output written before the trap should not be lost in the buffer
    crate::libs::io::flush_quietly();

    let hint = config::active().trap_hint;
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", render(msg, hint));
    let _ = stderr.flush();

    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_message_with_hint() {
        colored::control::set_override(false);
        let text = render("arity mismatch", true);
        assert_eq!(text, format!("error: arity mismatch\nhelp: {}", DEBUGGER_HINT));
    }

    #[test]
    fn hint_can_be_suppressed() {
        colored::control::set_override(false);
        assert_eq!(render("boom", false), "error: boom");
    }
}
