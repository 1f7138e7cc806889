//! Running one workload as a race worker.
//!
//! A worker runs its workload, then either records metrics and marks
//! itself complete, or records a did-not-finish entry and marks itself
//! DNF. Both paths finish the board entry, so the "all complete" signal
//! fires even when a workload errors or panics.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::constants::PROGRESS_COMPLETE;
use crate::dataset::Dataset;
use crate::progress::CancellationToken;
use crate::results::{RunMetrics, WorkerRecord};
use crate::state::RaceState;
use crate::workload::{Pacing, WorkerContext, Workload, WorkloadKind, WorkloadOutput};

/// What a worker hands back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOutcome {
    /// Worker identity.
    pub name: String,
    /// Family the workload declared.
    pub kind: WorkloadKind,
    /// Workload output, absent for a DNF.
    pub output: Option<WorkloadOutput>,
    /// Record written to the results store.
    pub record: WorkerRecord,
}

/// Run `workload` as a worker of the race held by `state`.
pub fn run_worker(
    state: &RaceState,
    workload: &dyn Workload,
    dataset: &Dataset,
    cancel: &CancellationToken,
    pacing: &Pacing,
) -> WorkerOutcome {
    let name = workload.name();
    debug!(worker = %name, "worker started");

    let mut ctx = WorkerContext::new(state.board(), name, cancel, pacing);
    let result = panic::catch_unwind(AssertUnwindSafe(|| workload.run(&mut ctx, dataset)));
    let duration = ctx.measured();
    let memory_bytes = ctx.memory().peak();
    let finish_offset = state.elapsed();

    let (output, record) = match result {
        Ok(Ok(output)) => {
            let record = WorkerRecord::Finished(RunMetrics {
                duration,
                memory_bytes,
                finish_offset,
            });
            (Some(output), record)
        }
        Ok(Err(err)) => (None, dnf_record(name, &err.to_string(), finish_offset)),
        Err(payload) => (None, dnf_record(name, &panic_message(&*payload), finish_offset)),
    };

    if let Err(err) = state.results().record(name, record.clone()) {
        warn!(worker = %name, error = %err, "could not record results");
    }

    let finished = if output.is_some() {
        info!(
            worker = %name,
            duration_ms = duration.as_secs_f64() * 1000.0,
            memory_bytes,
            "worker finished"
        );
        state
            .board()
            .update(name, PROGRESS_COMPLETE)
            .and_then(|()| state.board().mark_complete(name))
    } else {
        state.board().mark_dnf(name)
    };
    if let Err(err) = finished {
        warn!(worker = %name, error = %err, "could not finish board entry");
    }

    WorkerOutcome {
        name: name.to_string(),
        kind: workload.kind(),
        output,
        record,
    }
}

fn dnf_record(name: &str, reason: &str, finish_offset: std::time::Duration) -> WorkerRecord {
    warn!(worker = %name, reason, "worker did not finish");
    WorkerRecord::DidNotFinish {
        reason: reason.to_string(),
        finish_offset,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
