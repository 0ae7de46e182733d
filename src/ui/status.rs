//! Styled status lines
//!
//! Everything the operator reads during a build goes through these helpers so
//! the output keeps one look: green stage headers, plain progress lines,
//! yellow notices, red warnings on stderr.

use console::Style;

/// Header for a pipeline stage
pub fn step(message: &str) {
    println!("{}", Style::new().bold().green().apply_to(message));
}

/// Ordinary progress line
pub fn info(message: &str) {
    println!("  {message}");
}

/// Something was skipped or adjusted on purpose
pub fn notice(message: &str) {
    println!("  {}", Style::new().yellow().apply_to(message));
}

/// Recoverable problem; the run continues
pub fn warn(message: &str) {
    eprintln!(
        "  {} {}",
        Style::new().bold().red().apply_to("Warning:"),
        message
    );
}

/// Extra detail shown only with --verbose
pub fn detail(message: &str) {
    println!("  {}", Style::new().dim().apply_to(message));
}

/// Bold label followed by a value
pub fn field(label: &str, value: &str) {
    println!("  {} {}", Style::new().bold().apply_to(label), value);
}
