//! Workload factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::binary_search::BinarySearch;
use crate::bubble_sort::BubbleSort;
use crate::error::RaceError;
use crate::insertion_sort::InsertionSort;
use crate::linear_search::LinearSearch;
use crate::quick_sort::QuickSort;
use crate::workload::Workload;

/// Factory trait for creating workloads.
pub trait WorkloadFactory: Send + Sync {
    /// Get or create a workload by key.
    fn get(&self, key: &str) -> Result<Arc<dyn Workload>, RaceError>;

    /// List all available keys, in race registration order.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<String, Arc<dyn Workload>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_workload(key: &str) -> Result<Arc<dyn Workload>, RaceError> {
        match key {
            "linear" | "sequential" => Ok(Arc::new(LinearSearch::new())),
            "binary" => Ok(Arc::new(BinarySearch::new())),
            "bubble" => Ok(Arc::new(BubbleSort::new())),
            "quick" | "quicksort" => Ok(Arc::new(QuickSort::new())),
            "insertion" => Ok(Arc::new(InsertionSort::new())),
            _ => Err(RaceError::Config(format!("unknown workload: {key}"))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadFactory for DefaultFactory {
    fn get(&self, key: &str) -> Result<Arc<dyn Workload>, RaceError> {
        if let Some(workload) = self.cache.read().get(key) {
            return Ok(Arc::clone(workload));
        }

        let workload = Self::create_workload(key)?;
        self.cache
            .write()
            .insert(key.to_string(), Arc::clone(&workload));
        Ok(workload)
    }

    fn available(&self) -> Vec<&str> {
        vec!["linear", "binary", "bubble", "quick", "insertion"]
    }
}
