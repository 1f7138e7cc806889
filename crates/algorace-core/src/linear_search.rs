//! Sequential scan for the dataset target.

use crate::dataset::Dataset;
use crate::error::RaceError;
use crate::workload::{WorkerContext, Workload, WorkloadKind, WorkloadOutput};

/// Linear search over the shared dataset, in place (no copy needed).
///
/// Progress is the fraction of elements scanned. On inputs smaller than
/// the pacing scan limit every element is paced.
pub struct LinearSearch;

impl LinearSearch {
    /// Create a new linear search workload.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinearSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for LinearSearch {
    fn name(&self) -> &str {
        "Linear Search"
    }

    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Search
    }

    fn run(
        &self,
        ctx: &mut WorkerContext<'_>,
        dataset: &Dataset,
    ) -> Result<WorkloadOutput, RaceError> {
        let values = dataset.values();
        let target = dataset.target();
        let n = values.len();
        let pacing = ctx.pacing();
        let paced = n < pacing.scan_limit;

        for (i, &value) in values.iter().enumerate() {
            ctx.report_fraction(i, n)?;
            if paced {
                ctx.pace(pacing.scan_element);
            }
            if value == target {
                return Ok(WorkloadOutput::Search {
                    found: true,
                    index: Some(i),
                });
            }
        }

        Ok(WorkloadOutput::Search {
            found: false,
            index: None,
        })
    }
}
