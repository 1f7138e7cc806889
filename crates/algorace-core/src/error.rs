//! Error type shared by the race components.

/// Errors raised by the board, the results store, workloads and the coordinator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RaceError {
    /// An operation named a worker that was never registered.
    #[error("unknown worker: {0}")]
    UnknownWorker(String),

    /// The same worker identity was registered twice.
    #[error("worker registered twice: {0}")]
    DuplicateWorker(String),

    /// A progress value was negative or not a number.
    #[error("invalid progress {value} for worker {worker}")]
    InvalidProgress {
        /// Worker that reported the value.
        worker: String,
        /// The rejected value.
        value: f64,
    },

    /// A worker tried to write its results a second time.
    #[error("results already recorded for worker {0}")]
    AlreadyRecorded(String),

    /// A race was started without any worker.
    #[error("no workers registered")]
    NoWorkers,

    /// The race was cancelled (Ctrl+C or watchdog).
    #[error("race cancelled")]
    Cancelled,

    /// A workload failed while running.
    #[error("workload {worker} failed: {message}")]
    Workload {
        /// Failing worker.
        worker: String,
        /// Failure description.
        message: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The renderer could not draw a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Workload outputs disagree with the reference result.
    #[error("result mismatch: {0}")]
    Mismatch(String),
}
