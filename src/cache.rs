//! Memoized projection for repeated vectorization.
//!
//! Projection is a pure function of the n-gram, so a cache only trades memory for hashing
//! time and never changes results. A [`ProjectionCache`] is owned by exactly one caller (one
//! per worker thread); there is no shared cache and no locking. When a cache reaches its
//! capacity it stops admitting entries and further misses are recomputed.
//!
//! A cache remembers the projector that filled it. Handing it a different projector drops
//! every entry before the lookup, so a cache carried over from another builder can never
//! leak foreign positions into a vector.

use std::collections::HashMap;

use crate::builder::Builder;
use crate::projector::{Contributions, IndexProjector};
use crate::vector::Vector;

/// Default number of cached n-grams.
pub const DEFAULT_CAPACITY: usize = 1 << 16;

/// Bounded n-gram -> contribution-set memo.
#[derive(Debug, Clone)]
pub struct ProjectionCache {
    projector: Option<IndexProjector>,
    capacity: usize,
    entries: HashMap<Box<str>, Contributions>,
    hits: u64,
    misses: u64,
}

impl Default for ProjectionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProjectionCache {
    /// Create a cache holding at most `capacity` n-grams.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            projector: None,
            capacity,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up `ngram`, projecting and admitting it on a miss.
    ///
    /// Entries filled by a different projector are dropped first.
    pub fn project(&mut self, projector: &IndexProjector, ngram: &str) -> Contributions {
        self.bind(projector);
        if let Some(c) = self.entries.get(ngram) {
            self.hits += 1;
            return *c;
        }
        self.misses += 1;
        let c = projector.project(ngram);
        if self.entries.len() < self.capacity {
            self.entries.insert(ngram.into(), c);
        }
        c
    }

    /// Tie the cache to `projector`, discarding entries from any other one.
    pub fn bind(&mut self, projector: &IndexProjector) {
        if self.projector.as_ref() != Some(projector) {
            self.entries.clear();
            self.projector = Some(*projector);
        }
    }

    /// The projector the current entries belong to.
    pub fn projector(&self) -> Option<&IndexProjector> {
        self.projector.as_ref()
    }

    /// Number of cached n-grams.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to project.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop all entries and counters.
    pub fn clear(&mut self) {
        self.projector = None;
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// A [`Builder`] paired with a private [`ProjectionCache`].
///
/// Output is bit-identical to [`Builder::build`].
#[derive(Debug)]
pub struct CachedVectorizer<'b> {
    builder: &'b Builder,
    cache: ProjectionCache,
}

impl<'b> CachedVectorizer<'b> {
    /// Wrap `builder` with a default-sized cache.
    pub fn new(builder: &'b Builder) -> Self {
        Self::with_cache(builder, ProjectionCache::default())
    }

    /// Wrap `builder` with the given cache, emptying it if it was filled by another builder.
    pub fn with_cache(builder: &'b Builder, mut cache: ProjectionCache) -> Self {
        cache.bind(builder.projector());
        Self { builder, cache }
    }

    /// Build the vector of `text`.
    pub fn build(&mut self, text: &str) -> Vector {
        let builder = self.builder;
        let projector = builder.projector();
        let cache = &mut self.cache;
        builder.build_with(text, |ngram| cache.project(projector, ngram))
    }

    /// The wrapped builder.
    pub fn builder(&self) -> &'b Builder {
        self.builder
    }

    /// The cache.
    pub fn cache(&self) -> &ProjectionCache {
        &self.cache
    }

    /// Release the cache.
    pub fn into_cache(self) -> ProjectionCache {
        self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuilderConfig;

    #[test]
    fn cached_build_matches_uncached() {
        let b = Builder::new(BuilderConfig::new(3, 1_000, 9)).unwrap();
        let mut cv = CachedVectorizer::new(&b);
        for text in ["banana bandana", "banana", "", "xy", "ünïcödé ünïcödé"] {
            assert_eq!(cv.build(text), b.build(text));
        }
        assert!(cv.cache().hits() > 0);
    }

    #[test]
    fn capacity_bounds_entries_but_not_results() {
        let b = Builder::new(BuilderConfig::new(2, 500, 1)).unwrap();
        let mut cv = CachedVectorizer::with_cache(&b, ProjectionCache::with_capacity(3));
        let text = "abcdefghij";
        assert_eq!(cv.build(text), b.build(text));
        assert_eq!(cv.cache().len(), 3);
        assert_eq!(cv.cache().misses(), 9);
    }

    #[test]
    fn clear_resets() {
        let p = IndexProjector::new(2, 100, 0).unwrap();
        let mut cache = ProjectionCache::default();
        cache.project(&p, "ab");
        cache.project(&p, "ab");
        assert_eq!((cache.hits(), cache.misses(), cache.len()), (1, 1, 1));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.projector().is_none());
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn cache_from_other_seed_is_not_reused() {
        let a = Builder::new(BuilderConfig::new(3, 10_000, 1)).unwrap();
        let b = Builder::new(BuilderConfig::new(3, 10_000, 2)).unwrap();
        let mut cv = CachedVectorizer::new(&a);
        cv.build("abc");
        let cache = cv.into_cache();
        assert_eq!(cache.len(), 1);

        let mut cv = CachedVectorizer::with_cache(&b, cache);
        assert!(cv.cache().is_empty());
        assert_eq!(cv.cache().projector(), Some(b.projector()));
        assert_eq!(cv.build("abc"), b.build("abc"));
    }

    #[test]
    fn cache_from_wider_builder_does_not_overflow() {
        let wide = Builder::new(BuilderConfig::new(3, 10_000, 42)).unwrap();
        let narrow = Builder::new(BuilderConfig::new(3, 10, 42)).unwrap();
        let mut cv = CachedVectorizer::new(&wide);
        cv.build("abcdef");
        let mut cv = CachedVectorizer::with_cache(&narrow, cv.into_cache());
        assert_eq!(cv.build("abcdef"), narrow.build("abcdef"));
    }

    #[test]
    fn direct_lookup_rebinds_on_new_projector() {
        let p = IndexProjector::new(3, 10_000, 1).unwrap();
        let q = IndexProjector::new(3, 10_000, 2).unwrap();
        let mut cache = ProjectionCache::default();
        assert_eq!(cache.project(&p, "abc"), p.project("abc"));
        assert_eq!(cache.project(&q, "abc"), q.project("abc"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 0);
    }
}
