//! Terminal output
//!
//! Node ids and mesh listings go to stdout uncolored so they can be piped.
//! `colored` honours NO_COLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Section title of a report.
pub fn header(title: &(impl Display + ?Sized)) {
    println!("{}", title.to_string().cyan().bold());
}

/// `label: value` line, label padded so values line up.
pub fn field(label: &str, value: &(impl Display + ?Sized)) {
    let label = format!("{:<16}", format!("{label}:"));
    println!("  {} {}", label.green(), value);
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("    {}", msg);
}

/// One machine-readable item per line.
pub fn info(item: &(impl Display + ?Sized)) {
    println!("{}", item);
}
