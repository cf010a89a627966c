//! Terminal progress display for the painting loop

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "Outpainting [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks completed tiles against the planned total
///
/// Skipped tiles count as completed so the bar always reaches the end of a
/// successful run.
pub struct ProgressReporter {
    bar: ProgressBar,
    painted: usize,
    skipped: usize,
}

impl ProgressReporter {
    /// Visible progress bar over `total` planned tiles
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        Self {
            bar,
            painted: 0,
            skipped: 0,
        }
    }

    /// Reporter that tracks counts without drawing anything
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self {
            bar,
            painted: 0,
            skipped: 0,
        }
    }

    /// Record a painted tile
    pub fn painted(&mut self) {
        self.painted += 1;
        self.advance();
    }

    /// Record a skipped tile
    pub fn skipped(&mut self) {
        self.skipped += 1;
        self.advance();
    }

    /// Tiles completed so far, painted or skipped
    pub const fn completed(&self) -> usize {
        self.painted + self.skipped
    }

    /// Number of planned tiles
    pub fn total(&self) -> usize {
        self.bar.length().map_or(0, |length| length as usize)
    }

    /// Stop the bar, leaving the final counts on screen
    pub fn finish(&self) {
        self.bar
            .finish_with_message(format!("{} painted, {} skipped", self.painted, self.skipped));
    }

    /// Stop the bar after a failed tile
    pub fn abandon(&self) {
        self.bar.abandon_with_message(format!(
            "failed at tile {} of {} ({} painted, {} skipped)",
            self.completed() + 1,
            self.total(),
            self.painted,
            self.skipped
        ));
    }

    fn advance(&self) {
        self.bar.inc(1);
        self.bar
            .set_message(format!("{} painted, {} skipped", self.painted, self.skipped));
    }
}
