//! Console messages shared by every command.
//!
//! Status lines go to stdout, errors to stderr.

use ansi_term::{Colour, Style};
use std::fmt;

fn status(style: Style, icon: &str, msg: impl fmt::Display) -> String {
    format!("{} {}", style.paint(icon), msg)
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", status(Colour::Blue.bold(), "ℹ️", msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", status(Colour::Green.bold(), "✅", msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", status(Colour::Yellow.bold(), "⚠️", msg));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", status(Colour::Red.bold(), "❌", msg));
}

/// Section title printed above each payroll month.
pub fn header<T: fmt::Display>(msg: T) {
    let title = msg.to_string();
    let rule = "═".repeat(title.chars().count().max(24));
    let style = Colour::Blue.bold();
    println!("{}\n{}\n{}", style.paint(&rule), style.paint(&title), style.paint(&rule));
}
