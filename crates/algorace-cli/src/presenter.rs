//! CLI result presenter.

use algorace_orchestration::interfaces::ResultPresenter;
use algorace_orchestration::report::{RaceReport, Standing};

use crate::output::{format_duration, format_kib};
use crate::ui::{print_error, print_header, print_success};

/// Which metric a ranking table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Measured duration.
    Duration,
    /// Peak memory.
    Memory,
    /// Finish offset since the race start.
    Finish,
}

impl Metric {
    fn title(self) -> &'static str {
        match self {
            Self::Duration => "Ranking by Duration",
            Self::Memory => "Ranking by Memory",
            Self::Finish => "Ranking by Finish Time",
        }
    }

    fn value(self, standing: &Standing) -> String {
        match self {
            Self::Duration => format_duration(standing.duration),
            Self::Memory => format_kib(standing.memory_bytes),
            Self::Finish => format!("+{}", format_duration(standing.finish_offset)),
        }
    }

    fn standings(self, report: &RaceReport) -> &[Standing] {
        match self {
            Self::Duration => &report.by_duration,
            Self::Memory => &report.by_memory,
            Self::Finish => &report.by_finish,
        }
    }
}

/// Rows of one ranking table. DNF workers follow the ranked entries.
#[must_use]
pub fn ranking_rows(report: &RaceReport, metric: Metric) -> Vec<String> {
    let mut rows: Vec<String> = metric
        .standings(report)
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  {:>2}. {:<25} {:>14}", i + 1, s.name, metric.value(s)))
        .collect();
    rows.extend(
        report
            .dnf
            .iter()
            .map(|d| format!("   -. {:<25} {:>14}", d.name, "DNF")),
    );
    rows
}

/// Text of the winner announcement.
#[must_use]
pub fn winner_line(report: &RaceReport) -> Option<String> {
    report.winner().map(|w| {
        format!(
            "The fastest algorithm is {} with a time of {}",
            w.name,
            format_duration(w.duration)
        )
    })
}

/// CLI result presenter.
#[derive(Debug, Default)]
pub struct CLIResultPresenter;

impl CLIResultPresenter {
    /// Create a presenter that writes to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_rankings(&self, report: &RaceReport) {
        for metric in [Metric::Duration, Metric::Memory, Metric::Finish] {
            println!();
            print_header(metric.title());
            for row in ranking_rows(report, metric) {
                println!("{row}");
            }
        }
        if report.has_dnf() {
            println!();
            for d in &report.dnf {
                println!("  {} did not finish: {}", d.name, d.reason);
            }
        }
    }

    fn present_winner(&self, report: &RaceReport) {
        println!();
        match winner_line(report) {
            Some(line) => print_success(&line),
            None => print_error("no algorithm finished the race"),
        }
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}
