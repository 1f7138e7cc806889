//! Race-wide state shared by the coordinator, the workers and the renderer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::board::ProgressBoard;
use crate::error::RaceError;
use crate::results::ResultsStore;

/// Global t=0, the renderer's `active` flag, the board and the results store.
pub struct RaceState {
    start: Instant,
    active: AtomicBool,
    board: ProgressBoard,
    results: ResultsStore,
}

impl RaceState {
    /// Create the state for a race; the start instant is fixed here.
    pub fn new(names: &[String]) -> Result<Self, RaceError> {
        let board = ProgressBoard::new(names.iter().cloned())?;
        let results = ResultsStore::new(names);
        Ok(Self {
            start: Instant::now(),
            active: AtomicBool::new(true),
            board,
            results,
        })
    }

    /// Time elapsed since the race started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the renderer should keep running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop the renderer loop. Returns whether the state was still active.
    pub fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }

    /// The shared progress board.
    #[must_use]
    pub fn board(&self) -> &ProgressBoard {
        &self.board
    }

    /// The shared results store.
    #[must_use]
    pub fn results(&self) -> &ResultsStore {
        &self.results
    }
}
