//! # algorace-core
//!
//! Core library for AlgoRace: the shared progress board, the results
//! store, the worker contract and the five racing workloads.

pub mod binary_search;
pub mod board;
pub mod bubble_sort;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod insertion_sort;
pub mod linear_search;
pub mod memory;
pub mod progress;
pub mod quick_sort;
pub mod registry;
pub mod results;
pub mod state;
pub mod worker;
pub mod workload;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use board::{BoardSnapshot, Completion, EntrySnapshot, EntryState, ProgressBoard};
pub use constants::{
    exit_codes, DEFAULT_RENDER_INTERVAL, DEFAULT_SIZE, DEFAULT_TRACK_LENGTH, DEFAULT_VALUE_RANGE,
    PROGRESS_CAP, PROGRESS_COMPLETE, PROGRESS_REPORT_THRESHOLD,
};
pub use dataset::Dataset;
pub use error::RaceError;
pub use memory::MemoryTracker;
pub use progress::{CancellationToken, WorkerProgress};
pub use registry::{DefaultFactory, WorkloadFactory};
pub use results::{ResultsStore, RunMetrics, WorkerRecord};
pub use state::RaceState;
pub use worker::{run_worker, WorkerOutcome};
pub use workload::{Pacing, PacingPolicy, WorkerContext, Workload, WorkloadKind, WorkloadOutput};
