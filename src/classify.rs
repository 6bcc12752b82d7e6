//! Language profiles and nearest-profile classification.
//!
//! A profile is the merge of many `build(line)` results for one label. Classification
//! builds the unseen text once and ranks every profile by cosine score. This is policy on
//! top of the core: the core only provides the similarity.

use tracing::debug;

use crate::builder::Builder;
use crate::cache::CachedVectorizer;
use crate::error::Error;
use crate::vector::Vector;

/// A labelled set of profile vectors sharing one [`Builder`].
#[derive(Debug, Clone)]
pub struct Profiles {
    builder: Builder,
    profiles: Vec<(String, Vector)>,
}

impl Profiles {
    /// An empty set bound to `builder`.
    pub fn new(builder: Builder) -> Self {
        Self {
            builder,
            profiles: Vec::new(),
        }
    }

    /// Fold each line into `label`'s profile (created on first use), one merge per line.
    ///
    /// Returns the number of lines consumed.
    pub fn train<I, S>(&mut self, label: &str, lines: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profile = self.builder.zeros();
        let mut n = 0;
        {
            let mut vectorizer = CachedVectorizer::new(&self.builder);
            for line in lines {
                profile.merge(&vectorizer.build(line.as_ref()))?;
                n += 1;
            }
        }
        debug!(label, lines = n, "trained profile");
        let idx = self.slot(label);
        self.profiles[idx].1.merge(&profile)?;
        Ok(n)
    }

    /// Merge a prebuilt vector into `label`'s profile.
    pub fn insert(&mut self, label: &str, vector: &Vector) -> Result<(), Error> {
        if vector.dimension() != self.builder.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.builder.dimension(),
                got: vector.dimension(),
            });
        }
        let idx = self.slot(label);
        self.profiles[idx].1.merge(vector)
    }

    fn slot(&mut self, label: &str) -> usize {
        match self.profiles.iter().position(|(l, _)| l == label) {
            Some(i) => i,
            None => {
                self.profiles.push((label.to_string(), self.builder.zeros()));
                self.profiles.len() - 1
            }
        }
    }

    /// Score `text` against every profile, best first (ties keep insertion order).
    pub fn rank(&self, text: &str) -> Result<Vec<(&str, f64)>, Error> {
        self.rank_vector(&self.builder.build(text))
    }

    /// Score a prebuilt vector against every profile, best first.
    pub fn rank_vector(&self, v: &Vector) -> Result<Vec<(&str, f64)>, Error> {
        let mut out = self
            .profiles
            .iter()
            .map(|(label, p)| Ok((label.as_str(), p.score(v)?)))
            .collect::<Result<Vec<_>, Error>>()?;
        out.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(out)
    }

    /// The best-scoring label, or `None` if there are no profiles.
    pub fn classify(&self, text: &str) -> Result<Option<&str>, Error> {
        self.classify_vector(&self.builder.build(text))
    }

    /// The best-scoring label for a prebuilt vector.
    pub fn classify_vector(&self, v: &Vector) -> Result<Option<&str>, Error> {
        Ok(self.rank_vector(v)?.first().map(|(label, _)| *label))
    }

    /// Profile vector for `label`.
    pub fn get(&self, label: &str) -> Option<&Vector> {
        self.profiles
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|(l, _)| l.as_str())
    }

    /// The shared builder.
    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True if no profiles exist.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
