//! Builder configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::projector::IndexProjector;

/// Parameters of the projection scheme.
///
/// Vectors built under different configurations are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// N-gram length in characters.
    pub order: usize,
    /// Vector width.
    pub dimension: usize,
    /// Hash seed.
    pub seed: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            order: 4,
            dimension: 10_000,
            seed: 42,
        }
    }
}

impl BuilderConfig {
    /// Create a config from explicit parameters.
    pub fn new(order: usize, dimension: usize, seed: u64) -> Self {
        Self {
            order,
            dimension,
            seed,
        }
    }

    /// Check parameters without building anything.
    pub fn validate(&self) -> Result<(), Error> {
        IndexProjector::new(self.order, self.dimension, self.seed).map(|_| ())
    }
}
