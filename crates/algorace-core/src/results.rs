//! Per-worker results written once at the end of each run.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::RaceError;

/// Metrics of a worker that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunMetrics {
    /// Measured wall-clock duration of the workload.
    pub duration: Duration,
    /// Peak working storage attributed to the workload, in bytes.
    pub memory_bytes: u64,
    /// Time since the race start at which the worker finished.
    pub finish_offset: Duration,
}

/// Terminal record of a worker.
///
/// Duration, memory and finish offset live in one value so they are always
/// written together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorkerRecord {
    /// The worker completed.
    Finished(RunMetrics),
    /// The worker failed, panicked or was cancelled.
    DidNotFinish {
        /// Why the worker stopped.
        reason: String,
        /// Time since the race start at which the worker stopped.
        finish_offset: Duration,
    },
}

impl WorkerRecord {
    /// Metrics, if the worker completed.
    #[must_use]
    pub fn metrics(&self) -> Option<&RunMetrics> {
        match self {
            Self::Finished(metrics) => Some(metrics),
            Self::DidNotFinish { .. } => None,
        }
    }

    /// Time since the race start at which the worker stopped, either way.
    #[must_use]
    pub fn finish_offset(&self) -> Duration {
        match self {
            Self::Finished(metrics) => metrics.finish_offset,
            Self::DidNotFinish { finish_offset, .. } => *finish_offset,
        }
    }
}

/// Thread-safe, write-once store of worker records.
pub struct ResultsStore {
    names: Vec<String>,
    records: Mutex<HashMap<String, WorkerRecord>>,
}

impl ResultsStore {
    /// Create an empty store accepting records for the given workers.
    #[must_use]
    pub fn new(names: &[String]) -> Self {
        Self {
            names: names.to_vec(),
            records: Mutex::new(HashMap::with_capacity(names.len())),
        }
    }

    /// Insert the record of one worker.
    ///
    /// Each worker writes at most once; a second write is rejected and the
    /// first record is kept. Records of other workers are never touched.
    pub fn record(&self, name: &str, record: WorkerRecord) -> Result<(), RaceError> {
        if !self.names.iter().any(|n| n == name) {
            return Err(RaceError::UnknownWorker(name.to_string()));
        }
        let mut records = self.records.lock();
        if records.contains_key(name) {
            return Err(RaceError::AlreadyRecorded(name.to_string()));
        }
        records.insert(name.to_string(), record);
        Ok(())
    }

    /// Record of one worker, if written.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<WorkerRecord> {
        self.records.lock().get(name).cloned()
    }

    /// Number of records written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether no record was written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// All written records, in registration order.
    #[must_use]
    pub fn records(&self) -> Vec<(String, WorkerRecord)> {
        let records = self.records.lock();
        self.names
            .iter()
            .filter_map(|name| records.get(name).map(|r| (name.clone(), r.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Bubble Sort".to_string(), "Insertion Sort".to_string()]
    }

    fn metrics(ms: u64) -> WorkerRecord {
        WorkerRecord::Finished(RunMetrics {
            duration: Duration::from_millis(ms),
            memory_bytes: 1024,
            finish_offset: Duration::from_millis(ms + 1),
        })
    }

    #[test]
    fn record_and_get() {
        let store = ResultsStore::new(&names());
        assert!(store.is_empty());
        store.record("Bubble Sort", metrics(5)).unwrap();
        assert_eq!(store.len(), 1);
        let record = store.get("Bubble Sort").unwrap();
        assert_eq!(record.metrics().unwrap().memory_bytes, 1024);
        assert_eq!(record.finish_offset(), Duration::from_millis(6));
        assert!(store.get("Insertion Sort").is_none());
    }

    #[test]
    fn second_write_is_rejected() {
        let store = ResultsStore::new(&names());
        store.record("Bubble Sort", metrics(5)).unwrap();
        assert!(matches!(
            store.record("Bubble Sort", metrics(9)),
            Err(RaceError::AlreadyRecorded(_))
        ));
        assert_eq!(
            store.get("Bubble Sort").unwrap().metrics().unwrap().duration,
            Duration::from_millis(5)
        );
    }

    #[test]
    fn writes_never_erase_other_workers() {
        let store = ResultsStore::new(&names());
        store.record("Bubble Sort", metrics(5)).unwrap();
        store.record("Insertion Sort", metrics(7)).unwrap();
        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "Bubble Sort");
        assert_eq!(records[1].0, "Insertion Sort");
    }

    #[test]
    fn unknown_worker_is_rejected() {
        let store = ResultsStore::new(&names());
        assert!(matches!(
            store.record("Heap Sort", metrics(1)),
            Err(RaceError::UnknownWorker(_))
        ));
    }

    #[test]
    fn dnf_record_has_no_metrics() {
        let record = WorkerRecord::DidNotFinish {
            reason: "panicked".into(),
            finish_offset: Duration::from_millis(3),
        };
        assert!(record.metrics().is_none());
        assert_eq!(record.finish_offset(), Duration::from_millis(3));
    }

    #[test]
    fn concurrent_inserts_from_many_threads() {
        let names: Vec<String> = (0..32).map(|i| format!("w{i}")).collect();
        let store = ResultsStore::new(&names);
        std::thread::scope(|s| {
            for name in &names {
                let store = &store;
                s.spawn(move || store.record(name, metrics(1)).unwrap());
            }
        });
        assert_eq!(store.len(), 32);
    }
}
