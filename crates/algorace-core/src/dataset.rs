//! Shared input dataset and search target.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RaceError;

/// Read-only input shared by every worker of a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    values: Vec<i64>,
    target: i64,
    seed: Option<u64>,
}

impl Dataset {
    /// Generate `size` values uniformly drawn from `1..=value_range` and pick
    /// the target uniformly among them, so searches always find a match.
    ///
    /// Without a seed a random one is drawn; the seed used is kept so a run
    /// can be reproduced.
    pub fn generate(size: usize, value_range: i64, seed: Option<u64>) -> Result<Self, RaceError> {
        if size == 0 {
            return Err(RaceError::Config("dataset size must be positive".into()));
        }
        if value_range < 1 {
            return Err(RaceError::Config(format!(
                "value range must be at least 1, got {value_range}"
            )));
        }

        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let values: Vec<i64> = (0..size).map(|_| rng.random_range(1..=value_range)).collect();
        let target = values[rng.random_range(0..values.len())];

        Ok(Self {
            values,
            target,
            seed: Some(seed),
        })
    }

    /// Build a dataset from known values.
    #[must_use]
    pub fn from_values(values: Vec<i64>, target: i64) -> Self {
        Self {
            values,
            target,
            seed: None,
        }
    }

    /// The values, in generation order.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// The value searched for by search workloads.
    #[must_use]
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Seed used for generation, if the dataset was generated.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the dataset holds no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
