//! Helpers for running a single workload in unit tests.

use crate::board::ProgressBoard;
use crate::dataset::Dataset;
use crate::progress::CancellationToken;
use crate::workload::{Pacing, WorkerContext, Workload, WorkloadOutput};

/// Run `workload` without pacing against a private board.
pub(crate) fn run_unpaced(workload: &dyn Workload, dataset: &Dataset) -> (WorkloadOutput, u64) {
    let board = ProgressBoard::new([workload.name()]).unwrap();
    let cancel = CancellationToken::new();
    let pacing = Pacing::disabled();
    let mut ctx = WorkerContext::new(&board, workload.name(), &cancel, &pacing);
    let output = workload.run(&mut ctx, dataset).unwrap();
    (output, ctx.memory().peak())
}

/// The six-element dataset used across workload tests.
pub(crate) fn sample() -> Dataset {
    Dataset::from_values(vec![5, 3, 8, 1, 9, 2], 8)
}
