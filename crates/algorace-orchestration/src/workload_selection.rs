//! Workload selection logic.

use std::sync::Arc;

use algorace_core::registry::WorkloadFactory;
use algorace_core::workload::Workload;
use algorace_core::RaceError;

/// Get workloads to race based on the algorithm selection.
///
/// `selection` is either `all` or a comma-separated list of factory keys.
/// Selecting the same workload twice (even through an alias) is an error.
pub fn get_workloads_to_run(
    selection: &str,
    factory: &dyn WorkloadFactory,
) -> Result<Vec<Arc<dyn Workload>>, RaceError> {
    let keys: Vec<&str> = match selection.trim() {
        "all" => factory.available(),
        list => list
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect(),
    };

    if keys.is_empty() {
        return Err(RaceError::Config("no workloads selected".into()));
    }

    let mut workloads: Vec<Arc<dyn Workload>> = Vec::with_capacity(keys.len());
    for key in keys {
        let workload = factory.get(&key.to_ascii_lowercase())?;
        if workloads.iter().any(|w| w.name() == workload.name()) {
            return Err(RaceError::DuplicateWorker(workload.name().to_string()));
        }
        workloads.push(workload);
    }
    Ok(workloads)
}
