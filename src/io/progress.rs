//! Multi-sheet progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Stages a sheet passes through: segmented, extracted, complete
pub const SHEET_STAGES: u64 = 3;

/// Coordinates progress display for batch segmentation
///
/// Shows one bar per sheet for small batches and adds a single batch bar
/// once there are more sheets than fit on screen.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    sheet_bars: Vec<ProgressBar>,
    /// (`sheet name`, `stage reached`, `status`) per sheet seen so far
    sheet_states: Vec<(String, u64, String)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static SHEET_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>24} [{bar:20.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Sheets: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            sheet_bars: Vec::new(),
            sheet_states: Vec::new(),
        }
    }

    /// Create bars for a batch of sheets
    pub fn initialize(&mut self, sheet_count: usize) {
        if sheet_count > MAX_INDIVIDUAL_PROGRESS_BARS {
            let batch_bar = ProgressBar::new(sheet_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..sheet_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(SHEET_STAGES);
            bar.set_style(SHEET_STYLE.clone());
            self.sheet_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Register a sheet as started
    pub fn start_sheet(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.sheet_states.len() {
            self.sheet_states
                .resize(index + 1, (String::new(), 0, String::new()));
        }
        if let Some(state) = self.sheet_states.get_mut(index) {
            *state = (display_name, 0, "loading".to_string());
        }
        self.update_bars();
    }

    /// Record that a sheet reached the next stage
    pub fn advance(&mut self, index: usize, status: &str) {
        if let Some(state) = self.sheet_states.get_mut(index) {
            state.1 = (state.1 + 1).min(SHEET_STAGES);
            state.2 = status.to_string();
        }
        self.update_bars();
    }

    /// Mark a sheet as done
    pub fn complete_sheet(&mut self, index: usize, asset_count: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.sheet_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = SHEET_STAGES;
            state.2 = format!("{asset_count} assets");
        }
        self.update_bars();
    }

    /// Stage a sheet has reached, `None` for sheets never started
    pub fn stage(&self, index: usize) -> Option<u64> {
        self.sheet_states
            .get(index)
            .filter(|(name, _, _)| !name.is_empty())
            .map(|(_, stage, _)| *stage)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All sheets processed");
        }
        let _ = self.multi_progress.clear();
    }

    // Show the most recent sheets in the available bars
    fn update_bars(&self) {
        let active: Vec<&(String, u64, String)> = self
            .sheet_states
            .iter()
            .filter(|(name, _, _)| !name.is_empty())
            .collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_index, bar) in self.sheet_bars.iter().enumerate() {
            match visible.get(bar_index) {
                Some((name, stage, status)) => {
                    bar.set_position(*stage);
                    bar.set_prefix(name.clone());
                    bar.set_message(status.clone());
                }
                None => {
                    bar.set_position(0);
                    bar.set_prefix(String::new());
                    bar.set_message(String::new());
                }
            }
        }
    }
}
