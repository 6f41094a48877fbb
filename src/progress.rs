//! Terminal progress for downloads and extraction.
//!
//! A [`Progress`] starts as a spinner and becomes a byte bar once the total
//! size is known. It clears itself on drop, so an early return never leaves a
//! half-drawn line behind. indicatif hides it when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);
const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// A spinner that can turn into a byte bar.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn spinner(message: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("     {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK);
        Self { bar }
    }

    /// Switch to a byte bar of `total` bytes.
    pub fn set_total(&self, total: u64) {
        let style = ProgressStyle::default_bar()
            .template("     {spinner:.cyan} {msg} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars(TICK_CHARS)
            .progress_chars("━╸━");

        self.bar.set_length(total);
        self.bar.set_style(style);
    }

    pub fn set_position(&self, bytes: u64) {
        self.bar.set_position(bytes);
    }

    pub fn total(&self) -> Option<u64> {
        self.bar.length()
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Run `f` while a spinner labelled `message` is shown.
pub fn with_spinner<T, E>(message: &str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let _progress = Progress::spinner(message);
    f()
}
