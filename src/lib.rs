//! `langrv`: random indexing of character n-grams.
//!
//! Every overlapping `order`-character window of a text is projected to a sparse signed
//! index vector in a fixed `dimension`-wide space and summed into a dense [`Vector`]. Texts
//! that share many n-grams end up with high cosine similarity, which is enough for fast,
//! memory-bounded language identification.
//!
//! The core is four operations:
//! - [`make_builder`]: fix `order`, `dimension` and `seed`
//! - [`build`]: text -> fresh [`Vector`]
//! - [`merge`]: fold one vector into another (profiles are sums of many lines)
//! - [`score`]: cosine similarity, `0` for zero-norm input
//!
//! Index vectors are recomputed from a keyed hash of each n-gram rather than stored, so
//! memory does not grow with vocabulary. [`classify`] and [`corpus`] are a thin harness on
//! top (nearest-profile labelling, parallel training and accuracy reports).
//!
//! ```rust
//! let builder = langrv::make_builder(3, 10_000, 42).unwrap();
//! let mut a = langrv::build(&builder, "I like birds");
//! let b = langrv::build(&builder, "I like jam");
//! langrv::merge(&mut a, &langrv::build(&builder, "and some more things")).unwrap();
//!
//! assert!((langrv::score(&a, &a).unwrap() - 1.0).abs() < 1e-9);
//! assert_eq!(langrv::score(&a, &b).unwrap(), langrv::score(&b, &a).unwrap());
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod cache;
pub mod classify;
pub mod config;
pub mod corpus;
pub mod error;
pub mod projector;
pub mod vector;

pub use builder::{ngrams, Builder};
pub use cache::{CachedVectorizer, ProjectionCache};
pub use classify::Profiles;
pub use config::BuilderConfig;
pub use corpus::{Corpus, CorpusError, EvalConfig, LanguageReport};
pub use error::Error;
pub use projector::{Contribution, Contributions, IndexProjector, K};
pub use vector::Vector;

/// Create a [`Builder`]. Fails if `order` or `dimension` is zero or `dimension < K`.
pub fn make_builder(order: usize, dimension: usize, seed: u64) -> Result<Builder, Error> {
    Builder::new(BuilderConfig::new(order, dimension, seed))
}

/// Vectorize `text`. Text shorter than the builder's order gives the zero vector.
pub fn build(builder: &Builder, text: &str) -> Vector {
    builder.build(text)
}

/// Add `src` into `dst` elementwise.
pub fn merge(dst: &mut Vector, src: &Vector) -> Result<(), Error> {
    dst.merge(src)
}

/// Cosine similarity of `a` and `b`.
pub fn score(a: &Vector, b: &Vector) -> Result<f64, Error> {
    a.score(b)
}
