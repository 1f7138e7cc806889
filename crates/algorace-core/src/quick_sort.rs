//! Quicksort with Lomuto partitioning.

use crate::dataset::Dataset;
use crate::error::RaceError;
use crate::workload::{WorkerContext, Workload, WorkloadKind, WorkloadOutput};

/// Bookkeeping for one frame of the recursion.
const FRAME_BYTES: usize = 2 * std::mem::size_of::<usize>();

/// Quicksort on a private copy: Lomuto partition, last element as pivot.
///
/// Progress is partitions performed (pivots fixed in place) out of `n`.
/// Recursion goes into the smaller side and the larger side is handled by
/// the loop, which keeps the depth logarithmic on inputs with many
/// repeated values.
pub struct QuickSort;

/// Counter threaded through the recursion.
struct PartitionCount {
    fixed: usize,
    total: usize,
}

impl QuickSort {
    /// Create a new quicksort workload.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for QuickSort {
    fn default() -> Self {
        Self::new()
    }
}

/// Partition around the last element; returns the pivot's final position.
fn lomuto_partition(data: &mut [i64]) -> usize {
    let last = data.len() - 1;
    let pivot = data[last];
    let mut store = 0;
    for j in 0..last {
        if data[j] <= pivot {
            data.swap(store, j);
            store += 1;
        }
    }
    data.swap(store, last);
    store
}

fn sort_slice(
    mut data: &mut [i64],
    count: &mut PartitionCount,
    ctx: &mut WorkerContext<'_>,
) -> Result<(), RaceError> {
    while data.len() > 1 {
        let pivot = lomuto_partition(data);
        count.fixed += 1;
        ctx.report_fraction(count.fixed, count.total)?;

        let (left, rest) = std::mem::take(&mut data).split_at_mut(pivot);
        let right = &mut rest[1..];

        let (smaller, larger) = if left.len() < right.len() {
            (left, right)
        } else {
            (right, left)
        };
        ctx.memory().charge(FRAME_BYTES);
        let result = sort_slice(smaller, count, ctx);
        ctx.memory().release(FRAME_BYTES);
        result?;
        data = larger;
    }
    Ok(())
}

impl Workload for QuickSort {
    fn name(&self) -> &str {
        "Quick Sort"
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

        let mut count = PartitionCount {
            fixed: 0,
            total: data.len(),
        };
        sort_slice(&mut data, &mut count, ctx)?;

        Ok(WorkloadOutput::Sorted(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{run_unpaced, sample};

    #[test]
    fn sorts_sample() {
        let (output, _) = run_unpaced(&QuickSort::new(), &sample());
        assert_eq!(output, WorkloadOutput::Sorted(vec![1, 2, 3, 5, 8, 9]));
    }

    #[test]
    fn lomuto_places_pivot() {
        let mut data = vec![5, 3, 8, 1, 9, 2];
        let p = lomuto_partition(&mut data);
        assert_eq!(p, 1);
        assert_eq!(data[p], 2);
        assert!(data[..p].iter().all(|&v| v <= 2));
        assert!(data[p + 1..].iter().all(|&v| v > 2));
    }

    #[test]
    fn handles_many_duplicates() {
        let values: Vec<i64> = (0..5000).map(|i| i % 3).collect();
        let mut expected = values.clone();
        expected.sort_unstable();
        let (output, _) = run_unpaced(&QuickSort::new(), &Dataset::from_values(values, 0));
        assert_eq!(output, WorkloadOutput::Sorted(expected));
    }

    #[test]
    fn handles_already_sorted_input() {
        let values: Vec<i64> = (0..3000).collect();
        let (output, _) = run_unpaced(&QuickSort::new(), &Dataset::from_values(values.clone(), 0));
        assert_eq!(output, WorkloadOutput::Sorted(values));
    }

    #[test]
    fn charges_copy_and_frames() {
        let (_, peak) = run_unpaced(&QuickSort::new(), &sample());
        assert!(peak > 6 * 8);
    }
}
