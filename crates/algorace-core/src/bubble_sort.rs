//! Bubble sort with early exit.

use crate::dataset::Dataset;
use crate::error::RaceError;
use crate::workload::{WorkerContext, Workload, WorkloadKind, WorkloadOutput};

/// Bubble sort on a private copy. Stops after the first pass without swaps.
///
/// Progress is outer passes made out of `n`.
pub struct BubbleSort;

impl BubbleSort {
    /// Create a new bubble sort workload.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for BubbleSort {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for BubbleSort {
    fn name(&self) -> &str {
        "Bubble Sort"
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

        for pass in 0..n {
            ctx.report_fraction(pass, n)?;

            let mut swapped = false;
            for j in 0..n - pass - 1 {
                if data[j] > data[j + 1] {
                    data.swap(j, j + 1);
                    swapped = true;
                }
            }
            if !swapped {
                break;
            }
        }

        Ok(WorkloadOutput::Sorted(data))
    }
}
