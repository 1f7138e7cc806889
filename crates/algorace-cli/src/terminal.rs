//! Live race view drawn in place on the terminal.

use console::{style, Term};

use algorace_core::board::EntryState;
use algorace_core::RaceError;
use algorace_orchestration::interfaces::FrameSink;
use algorace_orchestration::renderer::{Frame, FrameLine};

use crate::output::format_duration;
use crate::ui::is_color_disabled;

const RULE_WIDTH: usize = 70;
const NAME_WIDTH: usize = 25;

/// Frame sink that redraws the race on a terminal.
pub struct TerminalSink {
    term: Term,
    drawn_lines: usize,
    color: bool,
}

impl TerminalSink {
    /// Sink drawing on stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Term::stdout())
    }

    /// Sink drawing on `term`.
    #[must_use]
    pub fn new(term: Term) -> Self {
        Self {
            term,
            drawn_lines: 0,
            color: !is_color_disabled(),
        }
    }

    /// Whether the underlying stream is an interactive terminal.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Lines of text for one frame, without styling.
#[must_use]
pub fn frame_lines(frame: &Frame) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = Vec::with_capacity(frame.lines.len() + 3);
    lines.push(rule.clone());
    lines.push(format!(
        "AlgoRace  elapsed {}",
        format_duration(frame.elapsed)
    ));
    lines.push(rule);
    lines.extend(frame.lines.iter().map(entry_line));
    lines
}

fn state_tag(state: EntryState) -> &'static str {
    match state {
        EntryState::Running => "[RUNNING]",
        EntryState::Completed => "[DONE]",
        EntryState::DidNotFinish => "[DNF]",
    }
}

fn entry_line(line: &FrameLine) -> String {
    let bar = format!(
        "{}{}",
        "#".repeat(line.filled),
        " ".repeat(line.track_len.saturating_sub(line.filled))
    );
    format!(
        "{:<width$} {:<9} |{bar}| {:>5.1}%",
        line.name,
        state_tag(line.state),
        line.progress,
        width = NAME_WIDTH
    )
}

fn styled(line: &FrameLine, text: String) -> String {
    match line.state {
        EntryState::Running => text,
        EntryState::Completed => style(text).green().to_string(),
        EntryState::DidNotFinish => style(text).red().to_string(),
    }
}

fn render_err(err: &std::io::Error) -> RaceError {
    RaceError::Render(err.to_string())
}

impl FrameSink for TerminalSink {
    fn draw(&mut self, frame: &Frame) -> Result<(), RaceError> {
        if self.drawn_lines > 0 {
            self.term
                .clear_last_lines(self.drawn_lines)
                .map_err(|e| render_err(&e))?;
        }

        let plain = frame_lines(frame);
        let header = plain.len() - frame.lines.len();
        for (i, text) in plain.into_iter().enumerate() {
            let text = match i.checked_sub(header) {
                Some(idx) if self.color => styled(&frame.lines[idx], text),
                _ => text,
            };
            self.term.write_line(&text).map_err(|e| render_err(&e))?;
        }
        self.drawn_lines = frame.lines.len() + header;
        Ok(())
    }

    fn all_complete(&mut self, frame: &Frame) -> Result<(), RaceError> {
        let msg = format!(
            "All {} workers finished in {}",
            frame.lines.len(),
            format_duration(frame.elapsed)
        );
        let msg = if self.color {
            style(msg).bold().to_string()
        } else {
            msg
        };
        self.term.write_line("").map_err(|e| render_err(&e))?;
        self.term.write_line(&msg).map_err(|e| render_err(&e))?;
        self.drawn_lines = 0;
        Ok(())
    }
}
