//! Output formatting for finished and archived debates.

pub mod console;

/// Turn terminal colors off for the rest of the process
pub fn disable_color() {
    colored::control::set_override(false);
}
