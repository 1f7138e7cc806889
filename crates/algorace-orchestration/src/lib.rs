//! # algorace-orchestration
//!
//! Concurrent race execution, renderer lifecycle and result analysis.

pub mod coordinator;
pub mod interfaces;
pub mod renderer;
pub mod report;
pub mod workload_selection;

pub use coordinator::{RaceConfig, RaceCoordinator};
pub use interfaces::{FrameSink, NullSink, ResultPresenter};
pub use renderer::{render_loop, Frame, FrameLine, RenderExit, RendererConfig};
pub use report::{ChartRow, RaceReport, Standing};
