//! Constants for progress reporting, rendering and dataset defaults.

use std::time::Duration;

/// Highest progress a running worker may show. Only a formal completion
/// moves an entry to [`PROGRESS_COMPLETE`].
pub const PROGRESS_CAP: f64 = 99.9;

/// Progress of a completed worker.
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Minimum progress change (percentage points) before a worker forwards an
/// update to the board.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.1;

/// Dataset length used when the requested size is missing or invalid.
pub const DEFAULT_SIZE: usize = 10_000;

/// Upper bound of generated values; values are drawn from `1..=DEFAULT_VALUE_RANGE`.
pub const DEFAULT_VALUE_RANGE: i64 = 10_000;

/// Renderer polling cadence.
pub const DEFAULT_RENDER_INTERVAL: Duration = Duration::from_millis(10);

/// Fastest cadence the renderer accepts.
pub const MIN_RENDER_INTERVAL: Duration = Duration::from_millis(1);

/// Slowest cadence the renderer accepts.
pub const MAX_RENDER_INTERVAL: Duration = Duration::from_secs(1);

/// Number of cells in a rendered progress track.
pub const DEFAULT_TRACK_LENGTH: usize = 50;

/// How long the coordinator waits for the renderer to stop.
pub const RENDERER_STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Stack size for worker threads; quicksort recursion runs on it.
pub const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// At least one worker did not finish (fault or watchdog timeout).
    pub const ERROR_DNF: i32 = 2;
    /// Workload outputs failed cross-validation.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Race cancelled by user (Ctrl+C).
    pub const ERROR_CANCELED: i32 = 130;
}
