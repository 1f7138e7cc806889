//! Shared progress board.
//!
//! Every worker publishes its progress here and the renderer polls
//! consistent snapshots. All reads and writes go through one mutex, so a
//! snapshot always reflects a state that existed at some real instant.
//! Completion is latched: the last worker to finish raises a one-shot
//! "all complete" signal that any number of waiters can observe.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use tracing::debug;

use crate::constants::{PROGRESS_CAP, PROGRESS_COMPLETE};
use crate::error::RaceError;

/// Lifecycle state of a board entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryState {
    /// The worker is still executing.
    Running,
    /// The worker finished successfully; progress is pinned at 100.
    Completed,
    /// The worker failed or was cancelled. Its progress stays where it stopped.
    DidNotFinish,
}

impl EntryState {
    /// Whether the entry reached a terminal state.
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Outcome of a finishing call on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The entry moved to its terminal state; other workers are still running.
    Recorded,
    /// The entry moved to its terminal state and it was the last one.
    /// Returned exactly once per board.
    AllComplete,
    /// The entry was already terminal; nothing changed.
    AlreadyFinished,
}

/// Point-in-time view of one worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot {
    /// Worker identity.
    pub name: String,
    /// Progress in percent, `[0, 100]`.
    pub progress: f64,
    /// Lifecycle state.
    pub state: EntryState,
}

impl EntrySnapshot {
    /// Whether the worker completed successfully.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.state == EntryState::Completed
    }
}

/// Consistent view of the whole board, in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    /// One entry per registered worker.
    pub entries: Vec<EntrySnapshot>,
}

impl BoardSnapshot {
    /// Whether every entry reached a terminal state.
    #[must_use]
    pub fn all_finished(&self) -> bool {
        self.entries.iter().all(|e| e.state.is_finished())
    }

    /// Number of entries in a terminal state.
    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.entries.iter().filter(|e| e.state.is_finished()).count()
    }

    /// Look up an entry by worker identity.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EntrySnapshot> {
        self.entries.iter().find(|e| e.name == name)
    }
}

struct Entry {
    progress: f64,
    state: EntryState,
}

struct BoardState {
    entries: Vec<Entry>,
    remaining: usize,
    all_complete: bool,
}

/// Thread-safe store of per-worker progress.
///
/// The key set is fixed at construction. Each key is written by its own
/// worker only; the single lock protects the structure, not the values.
pub struct ProgressBoard {
    names: Vec<String>,
    index: HashMap<String, usize>,
    state: Mutex<BoardState>,
    all_complete: Condvar,
}

impl ProgressBoard {
    /// Create a board for the given worker identities, in display order.
    ///
    /// Fails on an empty set or a duplicated identity.
    pub fn new<I, S>(names: I) -> Result<Self, RaceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(RaceError::NoWorkers);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            if index.insert(name.clone(), slot).is_some() {
                return Err(RaceError::DuplicateWorker(name.clone()));
            }
        }

        let entries = names
            .iter()
            .map(|_| Entry {
                progress: 0.0,
                state: EntryState::Running,
            })
            .collect();

        Ok(Self {
            state: Mutex::new(BoardState {
                entries,
                remaining: names.len(),
                all_complete: false,
            }),
            names,
            index,
            all_complete: Condvar::new(),
        })
    }

    /// Registered worker identities, in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered workers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: a board cannot be built without workers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn slot(&self, name: &str) -> Result<usize, RaceError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| RaceError::UnknownWorker(name.to_string()))
    }

    /// Publish progress for a worker.
    ///
    /// Values above [`PROGRESS_CAP`] are clamped to it. Values lower than
    /// the current progress are ignored, and so are updates to finished
    /// entries. Negative and NaN values are rejected.
    pub fn update(&self, name: &str, progress: f64) -> Result<(), RaceError> {
        if progress.is_nan() || progress < 0.0 {
            return Err(RaceError::InvalidProgress {
                worker: name.to_string(),
                value: progress,
            });
        }
        let slot = self.slot(name)?;
        let clamped = progress.min(PROGRESS_CAP);

        let mut state = self.state.lock();
        let entry = &mut state.entries[slot];
        if entry.state == EntryState::Running && clamped > entry.progress {
            entry.progress = clamped;
        }
        Ok(())
    }

    /// Mark a worker as successfully completed, pinning its progress at 100.
    ///
    /// Idempotent: a second call returns [`Completion::AlreadyFinished`].
    pub fn mark_complete(&self, name: &str) -> Result<Completion, RaceError> {
        self.finish(name, EntryState::Completed)
    }

    /// Mark a worker as did-not-finish.
    ///
    /// Counts toward "all complete" so waiters never hang on a failed worker.
    pub fn mark_dnf(&self, name: &str) -> Result<Completion, RaceError> {
        self.finish(name, EntryState::DidNotFinish)
    }

    fn finish(&self, name: &str, terminal: EntryState) -> Result<Completion, RaceError> {
        let slot = self.slot(name)?;

        let mut state = self.state.lock();
        let entry = &mut state.entries[slot];
        if entry.state.is_finished() {
            return Ok(Completion::AlreadyFinished);
        }
        entry.state = terminal;
        if terminal == EntryState::Completed {
            entry.progress = PROGRESS_COMPLETE;
        }

        state.remaining -= 1;
        if state.remaining > 0 {
            return Ok(Completion::Recorded);
        }

        state.all_complete = true;
        drop(state);
        debug!(last = %name, "all workers finished");
        self.all_complete.notify_all();
        Ok(Completion::AllComplete)
    }

    /// Take a consistent snapshot of every entry.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.lock();
        let entries = self
            .names
            .iter()
            .zip(&state.entries)
            .map(|(name, entry)| EntrySnapshot {
                name: name.clone(),
                progress: entry.progress,
                state: entry.state,
            })
            .collect();
        BoardSnapshot { entries }
    }

    /// Whether the "all complete" signal has fired.
    #[must_use]
    pub fn is_all_complete(&self) -> bool {
        self.state.lock().all_complete
    }

    /// Block until every worker finished or `timeout` elapsed.
    ///
    /// Returns whether the "all complete" signal fired.
    pub fn wait_all_complete(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        while !state.all_complete {
            if self
                .all_complete
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return state.all_complete;
            }
        }
        true
    }
}
