//! Insertion sort.

use crate::dataset::Dataset;
use crate::error::RaceError;
use crate::workload::{WorkerContext, Workload, WorkloadKind, WorkloadOutput};

/// Insertion sort on a private copy. Progress is elements inserted out of `n`.
pub struct InsertionSort;

impl InsertionSort {
    /// Create a new insertion sort workload.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for InsertionSort {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for InsertionSort {
    fn name(&self) -> &str {
        "Insertion Sort"
    }

    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Sort
    }

    fn run(
        &self,
        ctx: &mut WorkerContext<'_>,
        dataset: &Dataset,
    ) -> Result<WorkloadOutput, RaceError> {
        let mut data = dataset.values().to_vec();
        ctx.memory().charge_vec(&data);
        let n = data.len();

        for i in 1..n {
            ctx.report_fraction(i, n)?;

            let current = data[i];
            let mut j = i;
            while j > 0 && current < data[j - 1] {
                data[j] = data[j - 1];
                j -= 1;
            }
            data[j] = current;
        }

        Ok(WorkloadOutput::Sorted(data))
    }
}
