//! Fixed-cadence renderer loop.
//!
//! Polls the progress board, turns each snapshot into a [`Frame`] and hands
//! it to a [`FrameSink`]. Exits when every worker finished (announcing it
//! once) or when the race state is deactivated.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, warn};

use algorace_core::board::{BoardSnapshot, EntryState};
use algorace_core::constants::{
    DEFAULT_RENDER_INTERVAL, DEFAULT_TRACK_LENGTH, MAX_RENDER_INTERVAL, MIN_RENDER_INTERVAL,
};
use algorace_core::state::RaceState;
use algorace_core::RaceError;

use crate::interfaces::FrameSink;

/// One worker's line in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLine {
    /// Worker identity.
    pub name: String,
    /// Progress in percent.
    pub progress: f64,
    /// Filled cells of the track.
    pub filled: usize,
    /// Total cells of the track.
    pub track_len: usize,
    /// Lifecycle state.
    pub state: EntryState,
}

/// Everything needed to draw the live view once.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Time since the race started.
    pub elapsed: Duration,
    /// One line per worker, in registration order.
    pub lines: Vec<FrameLine>,
}

impl Frame {
    /// Build a frame from a board snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &BoardSnapshot, elapsed: Duration, track_len: usize) -> Self {
        let lines = snapshot
            .entries
            .iter()
            .map(|entry| FrameLine {
                name: entry.name.clone(),
                progress: entry.progress,
                filled: filled_cells(entry.progress, track_len, entry.state),
                track_len,
                state: entry.state,
            })
            .collect();
        Self { elapsed, lines }
    }
}

/// Number of filled cells for `progress` percent on a track of `track_len` cells.
///
/// Only a finished entry can fill the whole track; a running one stops a cell short.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn filled_cells(progress: f64, track_len: usize, state: EntryState) -> usize {
    let cells = (progress / 100.0 * track_len as f64).round();
    let limit = match state {
        EntryState::Running => track_len.saturating_sub(1),
        EntryState::Completed | EntryState::DidNotFinish => track_len,
    };
    (cells.max(0.0) as usize).min(limit)
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
    /// Polling cadence.
    pub interval: Duration,
    /// Cells per progress track.
    pub track_len: usize,
}

impl RendererConfig {
    /// Create a config; the interval is clamped to the accepted range.
    #[must_use]
    pub fn new(interval: Duration, track_len: usize) -> Self {
        Self {
            interval: interval.clamp(MIN_RENDER_INTERVAL, MAX_RENDER_INTERVAL),
            track_len,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_INTERVAL, DEFAULT_TRACK_LENGTH)
    }
}

/// Why the renderer loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderExit {
    /// Every worker finished; the sink was told once.
    AllComplete,
    /// The race state was deactivated first.
    Stopped,
}

/// Run the renderer loop on the current thread.
///
/// A frame is drawn on every tick, including one last frame after the
/// state is deactivated. Sink errors and panics in `draw` are logged and
/// never stop the loop.
pub fn render_loop(
    state: &RaceState,
    sink: &mut dyn FrameSink,
    config: &RendererConfig,
) -> RenderExit {
    let mut faults = 0usize;

    loop {
        let active = state.is_active();
        let snapshot = state.board().snapshot();
        let frame = Frame::from_snapshot(&snapshot, state.elapsed(), config.track_len);

        let drawn = panic::catch_unwind(AssertUnwindSafe(|| sink.draw(&frame)))
            .unwrap_or_else(|_| Err(RaceError::Render("frame sink panicked".into())));
        if let Err(err) = drawn {
            faults += 1;
            if faults == 1 {
                warn!(error = %err, "renderer could not draw a frame");
            } else {
                debug!(error = %err, faults, "renderer fault");
            }
        }

        if snapshot.all_finished() {
            state.deactivate();
            if let Err(err) = sink.all_complete(&frame) {
                warn!(error = %err, "renderer could not announce completion");
            }
            return RenderExit::AllComplete;
        }

        if !active {
            return RenderExit::Stopped;
        }

        std::thread::sleep(config.interval);
    }
}
