//! Orchestration interfaces.

use algorace_core::RaceError;

use crate::renderer::Frame;
use crate::report::RaceReport;

/// Destination of rendered frames (a terminal, a test recorder, nothing).
///
/// Errors are reported back to the renderer, which logs them and keeps
/// going; they never reach the workers.
pub trait FrameSink: Send {
    /// Draw one frame, replacing the previous one.
    fn draw(&mut self, frame: &Frame) -> Result<(), RaceError>;

    /// Announce that every worker finished. Called at most once per race.
    fn all_complete(&mut self, frame: &Frame) -> Result<(), RaceError>;
}

/// Trait for presenting final results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present the duration, memory and finish-order reports.
    fn present_rankings(&self, report: &RaceReport);

    /// Announce the fastest worker.
    fn present_winner(&self, report: &RaceReport);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Sink that discards every frame.
pub struct NullSink;

impl FrameSink for NullSink {
    fn draw(&mut self, _frame: &Frame) -> Result<(), RaceError> {
        Ok(())
    }

    fn all_complete(&mut self, _frame: &Frame) -> Result<(), RaceError> {
        Ok(())
    }
}
