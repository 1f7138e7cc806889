//! Worker contract.
//!
//! `Workload` is the trait implemented by each racing algorithm.
//! `WorkerContext` is what a workload sees while it runs: a throttled
//! progress handle, cancellation, memory accounting, pacing and the clock.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::board::ProgressBoard;
use crate::dataset::Dataset;
use crate::error::RaceError;
use crate::memory::MemoryTracker;
use crate::progress::{CancellationToken, WorkerProgress};

/// Family of a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkloadKind {
    /// Looks up the dataset target.
    Search,
    /// Produces a sorted copy of the dataset.
    Sort,
}

/// What a workload produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WorkloadOutput {
    /// Result of a search. `index` refers to the sequence that was searched.
    Search {
        /// Whether the target was found.
        found: bool,
        /// Zero-based position of the match.
        index: Option<usize>,
    },
    /// Sorted copy of the dataset.
    Sorted(Vec<i64>),
}

impl WorkloadOutput {
    /// Family of workload that produces this kind of output.
    #[must_use]
    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::Search { .. } => WorkloadKind::Search,
            Self::Sorted(_) => WorkloadKind::Sort,
        }
    }
}

/// A racing algorithm.
pub trait Workload: Send + Sync {
    /// Display name; doubles as the worker identity on the board.
    fn name(&self) -> &str;

    /// Search or sort.
    fn kind(&self) -> WorkloadKind;

    /// Run the algorithm over `dataset`, reporting progress through `ctx`.
    ///
    /// The dataset is shared and read-only; workloads that rearrange data
    /// work on their own copy.
    fn run(
        &self,
        ctx: &mut WorkerContext<'_>,
        dataset: &Dataset,
    ) -> Result<WorkloadOutput, RaceError>;
}

/// Whether pacing sleeps count toward the measured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PacingPolicy {
    /// Subtract pacing sleeps from the measured duration.
    #[default]
    Exclude,
    /// Measure pacing sleeps like any other work.
    Include,
}

/// Artificial delays that slow workloads down enough to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Master switch.
    pub enabled: bool,
    /// Accounting policy for the measured duration.
    pub policy: PacingPolicy,
    /// Delay after each probe of a halving search.
    pub search_step: Duration,
    /// Delay per scanned element of a linear search on small inputs.
    pub scan_element: Duration,
    /// Linear scans pace only below this many elements.
    pub scan_limit: usize,
    /// Untimed delay after preparing a sorted copy for a halving search.
    pub presort: Duration,
}

impl Pacing {
    /// Pacing with every delay switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: PacingPolicy::Exclude,
            search_step: Duration::from_millis(50),
            scan_element: Duration::from_millis(1),
            scan_limit: 1000,
            presort: Duration::from_millis(100),
        }
    }
}

/// Wall clock that keeps track of how much of the elapsed time was pacing.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
    paced: Duration,
}

impl Stopwatch {
    /// Start a new stopwatch.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            paced: Duration::ZERO,
        }
    }

    /// Restart from zero, forgetting accumulated pacing.
    pub fn restart(&mut self) {
        *self = Self::start();
    }

    /// Account for a pacing sleep.
    pub fn add_paced(&mut self, d: Duration) {
        self.paced += d;
    }

    /// Raw elapsed time.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Total pacing recorded.
    #[must_use]
    pub fn paced(&self) -> Duration {
        self.paced
    }

    /// Elapsed time under the given pacing policy.
    #[must_use]
    pub fn measured(&self, policy: PacingPolicy) -> Duration {
        match policy {
            PacingPolicy::Exclude => self.elapsed().saturating_sub(self.paced),
            PacingPolicy::Include => self.elapsed(),
        }
    }
}

/// Everything a workload needs while it runs.
pub struct WorkerContext<'a> {
    progress: WorkerProgress<'a>,
    cancel: &'a CancellationToken,
    pacing: &'a Pacing,
    memory: MemoryTracker,
    clock: Stopwatch,
}

impl<'a> WorkerContext<'a> {
    /// Create a context for worker `name`; the clock starts now.
    #[must_use]
    pub fn new(
        board: &'a ProgressBoard,
        name: &'a str,
        cancel: &'a CancellationToken,
        pacing: &'a Pacing,
    ) -> Self {
        Self {
            progress: WorkerProgress::new(board, name),
            cancel,
            pacing,
            memory: MemoryTracker::new(),
            clock: Stopwatch::start(),
        }
    }

    /// Worker identity.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.progress.name()
    }

    /// Pacing configuration.
    #[must_use]
    pub fn pacing(&self) -> &'a Pacing {
        self.pacing
    }

    /// Working-storage tracker for this worker.
    #[must_use]
    pub fn memory(&self) -> &MemoryTracker {
        &self.memory
    }

    /// Report progress in percent. Also a cancellation checkpoint.
    pub fn report(&mut self, percent: f64) -> Result<(), RaceError> {
        self.cancel.check_cancelled()?;
        self.progress.report(percent)
    }

    /// Report `done` out of `total` units. Also a cancellation checkpoint.
    pub fn report_fraction(&mut self, done: usize, total: usize) -> Result<(), RaceError> {
        self.cancel.check_cancelled()?;
        self.progress.report_fraction(done, total)
    }

    /// Sleep for a visualization delay, if pacing is enabled.
    pub fn pace(&mut self, delay: Duration) {
        if !self.pacing.enabled || delay.is_zero() {
            return;
        }
        let slept = Instant::now();
        std::thread::sleep(delay);
        self.clock.add_paced(slept.elapsed());
    }

    /// Start timing from now. Used after untimed preparation.
    pub fn restart_clock(&mut self) {
        self.clock.restart();
    }

    /// Duration measured so far under the configured pacing policy.
    #[must_use]
    pub fn measured(&self) -> Duration {
        self.clock.measured(self.pacing.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_excludes_pacing() {
        let mut clock = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(5));
        clock.add_paced(Duration::from_millis(5));
        assert!(clock.measured(PacingPolicy::Exclude) < clock.measured(PacingPolicy::Include));
        assert_eq!(clock.paced(), Duration::from_millis(5));
    }

    #[test]
    fn stopwatch_never_underflows() {
        let mut clock = Stopwatch::start();
        clock.add_paced(Duration::from_secs(60));
        assert_eq!(clock.measured(PacingPolicy::Exclude), Duration::ZERO);
    }

    #[test]
    fn stopwatch_restart_forgets_pacing() {
        let mut clock = Stopwatch::start();
        clock.add_paced(Duration::from_secs(1));
        clock.restart();
        assert_eq!(clock.paced(), Duration::ZERO);
    }

    #[test]
    fn pace_is_skipped_when_disabled() {
        let board = ProgressBoard::new(["w"]).unwrap();
        let cancel = CancellationToken::new();
        let pacing = Pacing::disabled();
        let mut ctx = WorkerContext::new(&board, "w", &cancel, &pacing);
        let before = Instant::now();
        ctx.pace(Duration::from_millis(200));
        assert!(before.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn pace_is_excluded_from_measurement() {
        let board = ProgressBoard::new(["w"]).unwrap();
        let cancel = CancellationToken::new();
        let pacing = Pacing::default();
        let mut ctx = WorkerContext::new(&board, "w", &cancel, &pacing);
        ctx.pace(Duration::from_millis(30));
        assert!(ctx.measured() < Duration::from_millis(30));
    }

    #[test]
    fn pace_is_counted_under_include_policy() {
        let board = ProgressBoard::new(["w"]).unwrap();
        let cancel = CancellationToken::new();
        let pacing = Pacing {
            policy: PacingPolicy::Include,
            ..Pacing::default()
        };
        let mut ctx = WorkerContext::new(&board, "w", &cancel, &pacing);
        ctx.pace(Duration::from_millis(30));
        assert!(ctx.measured() >= Duration::from_millis(30));
    }

    #[test]
    fn report_observes_cancellation() {
        let board = ProgressBoard::new(["w"]).unwrap();
        let cancel = CancellationToken::new();
        let pacing = Pacing::disabled();
        let mut ctx = WorkerContext::new(&board, "w", &cancel, &pacing);
        assert!(ctx.report(10.0).is_ok());
        cancel.cancel();
        assert!(matches!(ctx.report(20.0), Err(RaceError::Cancelled)));
        assert!(matches!(ctx.report_fraction(1, 2), Err(RaceError::Cancelled)));
    }
}
