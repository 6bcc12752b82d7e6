//! Index projection: n-gram -> sparse signed index vector.
//!
//! Each n-gram is assigned [`K`] distinct positions in `0..dimension`, each carrying a sign
//! of +1 or -1. Nothing is stored per n-gram: the positions are recomputed from a keyed hash
//! of `(seed, order, ngram bytes)` on every call, so memory stays constant no matter how many
//! distinct n-grams a corpus contains.
//!
//! # Notes
//!
//! - The hash is xxHash64 keyed with the seed; its digest seeds a ChaCha8 stream from which
//!   positions are drawn by rejection sampling (repeats are redrawn) and one sign bit is
//!   drawn per accepted position.
//! - Results are pure, so any memoization (see [`crate::cache`]) is invisible to callers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use xxhash_rust::xxh64::Xxh64;

use crate::error::Error;

/// Number of nonzero contributions per n-gram.
pub const K: usize = 5;

/// One signed contribution of an n-gram's index vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contribution {
    /// Position in `0..dimension`.
    pub position: usize,
    /// `true` for +1, `false` for -1.
    pub positive: bool,
}

impl Contribution {
    /// The signed unit value, +1.0 or -1.0.
    #[inline]
    pub fn sign(&self) -> f32 {
        if self.positive {
            1.0
        } else {
            -1.0
        }
    }
}

/// The full contribution set of one n-gram.
pub type Contributions = [Contribution; K];

/// Stateless projector from n-grams to their [`Contributions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexProjector {
    order: usize,
    dimension: usize,
    seed: u64,
}

impl IndexProjector {
    /// Create a projector. Fails if `dimension < K`.
    pub fn new(order: usize, dimension: usize, seed: u64) -> Result<Self, Error> {
        if order == 0 {
            return Err(Error::InvalidParam("order must be >= 1"));
        }
        if dimension == 0 {
            return Err(Error::InvalidParam("dimension must be >= 1"));
        }
        if dimension < K {
            return Err(Error::DimensionTooSmall {
                dimension,
                required: K,
            });
        }
        Ok(Self {
            order,
            dimension,
            seed,
        })
    }

    /// Compute the contribution set of `ngram`.
    ///
    /// Positions are pairwise distinct and lie in `0..dimension`.
    pub fn project(&self, ngram: &str) -> Contributions {
        let mut rng = ChaCha8Rng::seed_from_u64(self.key(ngram));
        let mut out = [Contribution {
            position: 0,
            positive: true,
        }; K];
        let mut filled = 0;
        while filled < K {
            let position = rng.gen_range(0..self.dimension);
            if out[..filled].iter().any(|c| c.position == position) {
                continue;
            }
            out[filled] = Contribution {
                position,
                positive: rng.gen::<bool>(),
            };
            filled += 1;
        }
        out
    }

    fn key(&self, ngram: &str) -> u64 {
        let mut hasher = Xxh64::new(self.seed);
        hasher.update(&(self.order as u64).to_le_bytes());
        hasher.update(ngram.as_bytes());
        hasher.digest()
    }

    /// Width of the index space.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
