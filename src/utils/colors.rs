//! ANSI escape codes for table and status output.

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Wrap `value` in grey when it is blank or a zero amount.
pub fn colorize_optional(value: &str) -> String {
    let t = value.trim();
    if t.is_empty() || t == "0" || t.starts_with("0,00") || t == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
