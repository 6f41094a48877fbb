//! Terminal messages for the download and relocation tools.
//!
//! Progress goes to stdout and problems go to stderr. `dq`, `tee` and
//! `kv-splitter` keep stdout for their data and only report diagnostics here.

use owo_colors::OwoColorize;

const INDENT: &str = "   ";

/// Start of a pipeline step, e.g. `-> Downloading https://...`
pub fn step(message: &str) {
    println!("{} {}", "->".cyan().bold(), message);
}

/// Sub-line of the current step, indented under it.
pub fn note(message: &str) {
    println!("{INDENT}{}", message.dimmed());
}

pub fn field(label: &str, value: &str) {
    println!("{INDENT}{} {}", format!("{label}:").cyan(), value);
}

/// Final line of a successful run.
pub fn done(message: &str) {
    println!("{} {}", "ok".green().bold(), message);
}

/// Section title, e.g. before a directory listing.
pub fn heading(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// `✓ name` when `failure` is `None`, `✗ name: reason` otherwise.
pub fn file_status(name: &str, failure: Option<&str>) {
    match failure {
        None => println!("{INDENT}{} {}", "✓".green(), name),
        Some(reason) => println!("{INDENT}{} {}: {}", "✗".red(), name, reason.red()),
    }
}

/// One row of a directory listing: right-aligned size, then the name.
pub fn list_item(size: &str, name: &str, is_dir: bool) {
    let label = listing_label(name, is_dir);
    if is_dir {
        println!("{INDENT}{size:>15}  {}", label.blue());
    } else {
        println!("{INDENT}{size:>15}  {label}");
    }
}

/// Directories get a trailing `/` so they stand out without color.
fn listing_label(name: &str, is_dir: bool) -> String {
    if is_dir && !name.ends_with('/') {
        format!("{name}/")
    } else {
        name.to_string()
    }
}
