//! Progress bar and per-track console output.
//!
//! Provides a progress bar over the track list, with support for log-only
//! mode where the bar is hidden for tail-friendly output. Log records are
//! printed around the bar so each one stays on its own line.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{Log, Metadata, Record, SetLoggerError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::catalog::CatalogObserver;
use crate::models::{ResolutionResult, TrackQuery};

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Set log-only mode globally
pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

/// Check if log-only mode is enabled
pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Bar currently drawn, if any
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn set_active_bar(pb: Option<ProgressBar>) {
    *ACTIVE_BAR.lock().unwrap_or_else(|e| e.into_inner()) = pb;
}

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

/// `env_logger` wrapper that suspends the active progress bar while writing.
pub struct BarAwareLogger {
    inner: env_logger::Logger,
}

impl BarAwareLogger {
    pub fn new(inner: env_logger::Logger) -> Self {
        Self { inner }
    }

    /// Install as the global logger.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.inner.filter());
        log::set_boxed_logger(Box::new(self))
    }
}

impl Log for BarAwareLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }
        match active_bar() {
            Some(pb) if !pb.is_hidden() => pb.suspend(|| self.inner.log(record)),
            _ => self.inner.log(record),
        }
    }

    fn flush(&self) {
        self.inner.flush()
    }
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// Create a progress bar with consistent styling.
/// In log-only mode, the progress bar is hidden.
pub fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
    }
    pb.set_message(msg.to_string());
    pb
}

/// "[  3/120] Artist – Title  (fallback: 2009)"
pub fn track_line(index: usize, total: usize, track: &TrackQuery) -> String {
    let fallback = track
        .fallback_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "none".to_string());
    format!(
        "[{:>3}/{}] {}  (fallback: {})",
        index,
        total,
        track.label(),
        fallback
    )
}

/// "         => 1965  [MusicBrainz]" or the skip marker.
pub fn result_line(result: &ResolutionResult) -> String {
    match result.year {
        Some(year) => format!("         => {}  [{}]", year, result.source),
        None => "         => SKIPPED (no year found)".to_string(),
    }
}

/// Prints one line pair per track and advances the bar.
pub struct ConsoleProgress {
    pb: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(total: usize) -> Self {
        let pb = create_progress_bar(total as u64, "Resolving years");
        set_active_bar(Some(pb.clone()));
        Self { pb }
    }

    fn print(&self, line: String) {
        if is_log_only() {
            println!("{}", line);
        } else {
            self.pb.println(line);
        }
    }

    pub fn finish(&self, saved: usize) {
        set_active_bar(None);
        self.pb
            .finish_with_message(format!("Resolved {} songs", saved));
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        set_active_bar(None);
    }
}

impl CatalogObserver for ConsoleProgress {
    fn track_started(&mut self, index: usize, total: usize, track: &TrackQuery) {
        self.print(track_line(index, total, track));
    }

    fn track_finished(
        &mut self,
        _index: usize,
        _total: usize,
        _track: &TrackQuery,
        result: &ResolutionResult,
    ) {
        self.print(result_line(result));
        self.pb.inc(1);
    }
}
