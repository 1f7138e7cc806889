//! # algorace-cli
//!
//! CLI output: the live race view, textual reports, the SVG chart,
//! the size prompt and shell completion.

pub mod chart;
pub mod completion;
pub mod output;
pub mod presenter;
pub mod prompt;
pub mod terminal;
pub mod ui;

pub use presenter::CLIResultPresenter;
pub use terminal::TerminalSink;
