//! The vectorizer: text -> [`Vector`] via sliding character n-grams.
//!
//! A [`Builder`] holds an immutable [`BuilderConfig`] and the matching [`IndexProjector`].
//! It is `Send + Sync` and meant to be shared across worker threads by reference.
//!
//! # Example
//!
//! ```rust
//! use langrv::{Builder, BuilderConfig};
//!
//! let builder = Builder::new(BuilderConfig::new(3, 10_000, 42)).unwrap();
//! let mut en = builder.build("I like birds");
//! en.merge(&builder.build("and some more things")).unwrap();
//! let text = builder.build("I like jam");
//!
//! let s = en.score(&text).unwrap();
//! assert!(s > 0.0 && s < 1.0);
//! ```
//!
//! # Notes
//!
//! - Windows are taken over Unicode scalar values (`char`), not bytes.
//! - No case folding or normalization is applied.
//! - Text shorter than `order` yields the zero vector.

use tracing::debug;

use crate::config::BuilderConfig;
use crate::error::Error;
use crate::projector::{Contributions, IndexProjector};
use crate::vector::Vector;

/// Immutable configuration plus projector; produces fresh [`Vector`]s.
#[derive(Debug, Clone)]
pub struct Builder {
    config: BuilderConfig,
    projector: IndexProjector,
}

impl Builder {
    /// Create a builder. Fails on invalid parameters.
    pub fn new(config: BuilderConfig) -> Result<Self, Error> {
        let projector = IndexProjector::new(config.order, config.dimension, config.seed)?;
        debug!(
            order = config.order,
            dimension = config.dimension,
            seed = config.seed,
            "created vector builder"
        );
        Ok(Self { config, projector })
    }

    /// Build the vector of `text`.
    pub fn build(&self, text: &str) -> Vector {
        self.build_with(text, |ngram| self.projector.project(ngram))
    }

    /// Build with a caller-supplied projection (e.g. a memoizing one).
    ///
    /// `project` must agree with [`Builder::projector`] for the output to be meaningful.
    pub(crate) fn build_with<F>(&self, text: &str, mut project: F) -> Vector
    where
        F: FnMut(&str) -> Contributions,
    {
        let mut v = Vector::zeros(self.config.dimension);
        for ngram in ngrams(text, self.config.order) {
            v.add_contributions(&project(ngram));
        }
        v
    }

    /// The all-zero vector for this builder (a starting point for profiles).
    pub fn zeros(&self) -> Vector {
        Vector::zeros(self.config.dimension)
    }

    /// The configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The underlying projector.
    pub fn projector(&self) -> &IndexProjector {
        &self.projector
    }

    /// N-gram length in characters.
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Vector width.
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }
}

/// Iterate over the `order`-character windows of `text`, stride 1.
///
/// Yields `chars - order + 1` slices, or nothing if `text` is shorter than `order`.
/// Window starts and ends come from two `char_indices` walks `order` apart.
pub fn ngrams(text: &str, order: usize) -> impl Iterator<Item = &str> + '_ {
    let starts = text.char_indices().map(|(i, _)| i);
    let ends = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .skip(order);
    let limit = if order == 0 { 0 } else { usize::MAX };
    starts
        .zip(ends)
        .take(limit)
        .map(move |(start, end)| &text[start..end])
}
