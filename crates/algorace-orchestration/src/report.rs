//! Result analysis: rankings, DNF listing and cross-validation.

use std::cmp::Ordering;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use algorace_core::dataset::Dataset;
use algorace_core::results::WorkerRecord;
use algorace_core::worker::WorkerOutcome;
use algorace_core::workload::{WorkloadKind, WorkloadOutput};
use algorace_core::RaceError;

/// A ranked worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Worker identity.
    pub name: String,
    /// Measured duration.
    pub duration: Duration,
    /// Peak working storage in bytes.
    pub memory_bytes: u64,
    /// Time since the race start at which the worker finished.
    pub finish_offset: Duration,
}

/// A worker that did not finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DidNotFinish {
    /// Worker identity.
    pub name: String,
    /// Why it stopped.
    pub reason: String,
    /// Time since the race start at which it stopped.
    pub finish_offset: Duration,
}

/// Per-algorithm data handed to the chart writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    /// Worker identity.
    pub name: String,
    /// Measured duration.
    pub duration: Duration,
    /// Peak working storage in bytes.
    pub memory_bytes: u64,
}

/// Final outcome of a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceReport {
    /// Dataset length.
    pub size: usize,
    /// Search target.
    pub target: i64,
    /// Dataset seed, when one was given.
    pub seed: Option<u64>,
    /// Finished workers, fastest first.
    pub by_duration: Vec<Standing>,
    /// Finished workers, smallest peak memory first.
    pub by_memory: Vec<Standing>,
    /// Finished workers, earliest finisher first.
    pub by_finish: Vec<Standing>,
    /// Workers that did not finish, in registration order.
    pub dnf: Vec<DidNotFinish>,
    /// Outputs that failed cross-validation, one message per worker.
    pub mismatches: Vec<String>,
}

impl RaceReport {
    /// Build a report from the results store records (in registration order)
    /// and the outcomes returned by the workers.
    #[must_use]
    pub fn build(
        records: &[(String, WorkerRecord)],
        outcomes: &[WorkerOutcome],
        dataset: &Dataset,
    ) -> Self {
        let mut finished = Vec::new();
        let mut dnf = Vec::new();
        for (name, record) in records {
            match record {
                WorkerRecord::Finished(metrics) => finished.push(Standing {
                    name: name.clone(),
                    duration: metrics.duration,
                    memory_bytes: metrics.memory_bytes,
                    finish_offset: metrics.finish_offset,
                }),
                WorkerRecord::DidNotFinish {
                    reason,
                    finish_offset,
                } => dnf.push(DidNotFinish {
                    name: name.clone(),
                    reason: reason.clone(),
                    finish_offset: *finish_offset,
                }),
            }
        }

        let by_duration = ranked(&finished, |a, b| a.duration.cmp(&b.duration));
        let by_memory = ranked(&finished, |a, b| a.memory_bytes.cmp(&b.memory_bytes));
        let by_finish = ranked(&finished, |a, b| a.finish_offset.cmp(&b.finish_offset));

        Self {
            size: dataset.len(),
            target: dataset.target(),
            seed: dataset.seed(),
            by_duration,
            by_memory,
            by_finish,
            dnf,
            mismatches: cross_validate(outcomes, dataset),
        }
    }

    /// Fastest finished worker.
    #[must_use]
    pub fn winner(&self) -> Option<&Standing> {
        self.by_duration.first()
    }

    /// Rows for the chart writer, sorted by duration.
    #[must_use]
    pub fn chart_rows(&self) -> Vec<ChartRow> {
        self.by_duration
            .iter()
            .map(|s| ChartRow {
                name: s.name.clone(),
                duration: s.duration,
                memory_bytes: s.memory_bytes,
            })
            .collect()
    }

    /// Whether any worker did not finish.
    #[must_use]
    pub fn has_dnf(&self) -> bool {
        !self.dnf.is_empty()
    }

    /// Check cross-validation.
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.mismatches.is_empty() {
            Ok(())
        } else {
            Err(RaceError::Mismatch(self.mismatches.join("; ")))
        }
    }
}

fn ranked<F>(standings: &[Standing], metric: F) -> Vec<Standing>
where
    F: Fn(&Standing, &Standing) -> Ordering,
{
    let mut sorted = standings.to_vec();
    sorted.sort_by(|a, b| metric(a, b).then_with(|| a.name.cmp(&b.name)));
    sorted
}

/// Check every worker output against the dataset.
fn cross_validate(outcomes: &[WorkerOutcome], dataset: &Dataset) -> Vec<String> {
    let values = dataset.values();
    let target = dataset.target();
    let mut reference = values.to_vec();
    reference.sort_unstable();
    let present = values.contains(&target);

    let mut mismatches = Vec::new();
    for outcome in outcomes {
        let Some(output) = &outcome.output else {
            continue;
        };
        let problem = match output {
            _ if output.kind() != outcome.kind => Some(format!(
                "{} workload produced {} output",
                kind_label(outcome.kind),
                kind_label(output.kind())
            )),
            WorkloadOutput::Sorted(sorted) => {
                (sorted != &reference).then(|| "output is not the sorted dataset".to_string())
            }
            WorkloadOutput::Search { found, index } => {
                check_search(*found, *index, present, target, values, &reference)
            }
        };
        if let Some(problem) = problem {
            warn!(worker = %outcome.name, problem = %problem, "cross-validation failed");
            mismatches.push(format!("{}: {problem}", outcome.name));
        }
    }
    mismatches
}

fn kind_label(kind: WorkloadKind) -> &'static str {
    match kind {
        WorkloadKind::Search => "search",
        WorkloadKind::Sort => "sort",
    }
}

fn check_search(
    found: bool,
    index: Option<usize>,
    present: bool,
    target: i64,
    values: &[i64],
    sorted: &[i64],
) -> Option<String> {
    if found != present {
        return Some(format!("found={found} but target present={present}"));
    }
    match (found, index) {
        (false, None) => None,
        (false, Some(i)) => Some(format!("reported index {i} without a match")),
        (true, None) => Some("found without an index".to_string()),
        (true, Some(i)) => {
            let hit = |seq: &[i64]| seq.get(i) == Some(&target);
            (!hit(values) && !hit(sorted))
                .then(|| format!("index {i} does not hold the target {target}"))
        }
    }
}
