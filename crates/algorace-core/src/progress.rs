//! Cancellation and per-worker progress throttling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::ProgressBoard;
use crate::constants::PROGRESS_REPORT_THRESHOLD;
use crate::error::RaceError;

/// Cooperative cancellation token using an atomic flag.
///
/// # Example
/// ```
/// use algorace_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check for cancellation, returning an error if cancelled.
    pub fn check_cancelled(&self) -> Result<(), RaceError> {
        if self.is_cancelled() {
            Err(RaceError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// A worker's handle on the board.
///
/// Forwards a value only once it moved at least `threshold` percentage
/// points past the last forwarded one, so tight loops stay off the lock.
pub struct WorkerProgress<'a> {
    board: &'a ProgressBoard,
    name: &'a str,
    last: f64,
    threshold: f64,
}

impl<'a> WorkerProgress<'a> {
    /// Create a handle with the default reporting threshold.
    #[must_use]
    pub fn new(board: &'a ProgressBoard, name: &'a str) -> Self {
        Self::with_threshold(board, name, PROGRESS_REPORT_THRESHOLD)
    }

    /// Create a handle with a custom reporting threshold.
    #[must_use]
    pub fn with_threshold(board: &'a ProgressBoard, name: &'a str, threshold: f64) -> Self {
        Self {
            board,
            name,
            last: 0.0,
            threshold,
        }
    }

    /// Worker identity.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Report progress in percent.
    pub fn report(&mut self, percent: f64) -> Result<(), RaceError> {
        if percent.is_nan() || percent < 0.0 {
            return Err(RaceError::InvalidProgress {
                worker: self.name.to_string(),
                value: percent,
            });
        }
        if percent - self.last >= self.threshold {
            self.board.update(self.name, percent)?;
            self.last = percent;
        }
        Ok(())
    }

    /// Report `done` out of `total` units of work.
    pub fn report_fraction(&mut self, done: usize, total: usize) -> Result<(), RaceError> {
        if total == 0 {
            return Ok(());
        }
        self.report(done as f64 / total as f64 * 100.0)
    }
}
