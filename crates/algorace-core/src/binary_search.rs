//! Halving search over a freshly sorted copy.

use std::cmp::Ordering;

use crate::dataset::Dataset;
use crate::error::RaceError;
use crate::workload::{WorkerContext, Workload, WorkloadKind, WorkloadOutput};

/// Binary search.
///
/// Sorting the private copy happens before the clock starts and is not
/// part of the progress model. Progress is probes made against the
/// worst-case bound `bit_length(n)`, i.e. ⌈log2(n + 1)⌉.
pub struct BinarySearch;

impl BinarySearch {
    /// Create a new binary search workload.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Upper bound on the number of probes for `n` elements.
    #[must_use]
    pub fn max_probes(n: usize) -> usize {
        ((usize::BITS - n.leading_zeros()) as usize).max(1)
    }
}

impl Default for BinarySearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for BinarySearch {
    fn name(&self) -> &str {
        "Binary Search"
    }

    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Search
    }

    fn run(
        &self,
        ctx: &mut WorkerContext<'_>,
        dataset: &Dataset,
    ) -> Result<WorkloadOutput, RaceError> {
        let mut sorted = dataset.values().to_vec();
        sorted.sort_unstable();
        ctx.memory().charge_vec(&sorted);

        let pacing = ctx.pacing();
        ctx.pace(pacing.presort);
        ctx.restart_clock();

        let target = dataset.target();
        let max_probes = Self::max_probes(sorted.len());
        let (mut lo, mut hi) = (0, sorted.len());
        let mut probes = 0;

        while lo < hi {
            probes += 1;
            ctx.report_fraction(probes, max_probes)?;

            let mid = lo + (hi - lo) / 2;
            match sorted[mid].cmp(&target) {
                Ordering::Equal => {
                    return Ok(WorkloadOutput::Search {
                        found: true,
                        index: Some(mid),
                    });
                }
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
            }

            ctx.pace(pacing.search_step);
        }

        Ok(WorkloadOutput::Search {
            found: false,
            index: None,
        })
    }
}
