//! Application configuration from CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use algorace_core::constants::{DEFAULT_TRACK_LENGTH, DEFAULT_VALUE_RANGE};
use algorace_core::workload::{Pacing, PacingPolicy};
use algorace_orchestration::coordinator::RaceConfig;
use algorace_orchestration::renderer::RendererConfig;

/// AlgoRace: race search and sort algorithms over the same random data.
#[derive(Parser, Debug)]
#[command(name = "algorace", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Array size. Prompted for interactively when omitted.
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Upper bound of the random values; elements are drawn from [1, RANGE].
    #[arg(long, default_value_t = DEFAULT_VALUE_RANGE)]
    pub range: i64,

    /// Seed for a reproducible dataset.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Algorithms to race: all, or a comma list of linear, binary, bubble, quick, insertion.
    #[arg(long, default_value = "all")]
    pub algo: String,

    /// Live view refresh interval (e.g. "10ms"), clamped to [1ms, 1s].
    #[arg(long, default_value = "10ms", value_parser = parse_duration)]
    pub interval: Duration,

    /// Length of each progress bar.
    #[arg(long, default_value_t = DEFAULT_TRACK_LENGTH)]
    pub track: usize,

    /// Disable the artificial delays that make the race watchable.
    #[arg(long)]
    pub no_pacing: bool,

    /// Count pacing delays in the measured durations.
    #[arg(long, conflicts_with = "no_pacing")]
    pub count_pacing: bool,

    /// Race deadline (e.g. "10m"); unfinished algorithms are marked DNF. 0 disables it.
    #[arg(long, default_value = "10m", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Chart output path.
    #[arg(long, default_value = "race_results.svg")]
    pub chart: PathBuf,

    /// Do not write the chart.
    #[arg(long)]
    pub no_chart: bool,

    /// Also write the full report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// No live view, only the final reports.
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Race settings derived from the flags.
    #[must_use]
    pub fn race_config(&self) -> RaceConfig {
        let pacing = if self.no_pacing {
            Pacing::disabled()
        } else {
            Pacing {
                policy: if self.count_pacing {
                    PacingPolicy::Include
                } else {
                    PacingPolicy::Exclude
                },
                ..Pacing::default()
            }
        };
        RaceConfig {
            renderer: RendererConfig::new(self.interval, self.track),
            pacing,
            timeout: (!self.timeout.is_zero()).then_some(self.timeout),
        }
    }
}

/// Parse a duration string like "10ms", "30s", "5m", "1h". A bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let parsed = if let Some(ms) = s.strip_suffix("ms") {
        ms.parse().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .map(|n| Duration::from_secs(n.saturating_mul(60)))
    } else if let Some(hours) = s.strip_suffix('h') {
        hours
            .parse::<u64>()
            .ok()
            .map(|n| Duration::from_secs(n.saturating_mul(3600)))
    } else {
        s.parse().ok().map(Duration::from_secs)
    };
    parsed.ok_or_else(|| format!("invalid duration: {s:?} (use e.g. 10ms, 30s, 5m, 1h)"))
}
