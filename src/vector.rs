//! Dense accumulator vectors: elementwise merge and cosine scoring.

use crate::error::Error;
use crate::projector::Contributions;

/// A dense `dimension`-wide vector of accumulated n-gram contributions.
///
/// Magnitude grows with the amount of text folded in; only [`Vector::score`] normalizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    /// The all-zero vector of the given width.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            data: vec![0.0; dimension],
        }
    }

    /// Wrap raw components.
    pub fn from_vec(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Vector width.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Raw components.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        sum_squares(&self.data).sqrt()
    }

    /// True if every component is zero (no signal).
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }

    #[inline]
    pub(crate) fn add_contributions(&mut self, contributions: &Contributions) {
        for c in contributions {
            self.data[c.position] += c.sign();
        }
    }

    /// Fold `other` into `self` by elementwise addition. `other` is left unchanged.
    pub fn merge(&mut self, other: &Vector) -> Result<(), Error> {
        check_dimensions(self, other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += *b;
        }
        Ok(())
    }

    /// Cosine similarity in `[-1, 1]`.
    ///
    /// Returns `0.0` when either vector has zero norm.
    pub fn score(&self, other: &Vector) -> Result<f64, Error> {
        check_dimensions(self, other)?;
        let mut ab = 0f64;
        let mut aa = 0f64;
        let mut bb = 0f64;
        for (&a, &b) in self.data.iter().zip(other.data.iter()) {
            let (a, b) = (a as f64, b as f64);
            ab += a * b;
            aa += a * a;
            bb += b * b;
        }
        if aa == 0.0 || bb == 0.0 {
            return Ok(0.0);
        }
        Ok((ab / (aa * bb).sqrt()).clamp(-1.0, 1.0))
    }
}

fn check_dimensions(a: &Vector, b: &Vector) -> Result<(), Error> {
    if a.dimension() != b.dimension() {
        return Err(Error::DimensionMismatch {
            expected: a.dimension(),
            got: b.dimension(),
        });
    }
    Ok(())
}

fn sum_squares(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_elementwise() {
        let mut a = Vector::from_vec(vec![1.0, -2.0, 0.0]);
        let b = Vector::from_vec(vec![3.0, 2.0, -1.0]);
        a.merge(&b).unwrap();
        assert_eq!(a.as_slice(), &[4.0, 0.0, -1.0]);
        assert_eq!(b.as_slice(), &[3.0, 2.0, -1.0]);
    }

    #[test]
    fn score_is_cosine() {
        let a = Vector::from_vec(vec![1.0, 0.0]);
        let b = Vector::from_vec(vec![1.0, 1.0]);
        let c = Vector::from_vec(vec![-2.0, 0.0]);
        assert!((a.score(&b).unwrap() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((a.score(&c).unwrap() + 1.0).abs() < 1e-12);
        assert!((b.score(&b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_norm_scores_zero() {
        let z = Vector::zeros(4);
        let a = Vector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert!(z.is_zero());
        assert_eq!(z.score(&a).unwrap(), 0.0);
        assert_eq!(a.score(&z).unwrap(), 0.0);
        assert_eq!(z.score(&z).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let mut a = Vector::zeros(3);
        let b = Vector::zeros(4);
        let err = Error::DimensionMismatch {
            expected: 3,
            got: 4,
        };
        assert_eq!(a.merge(&b), Err(err.clone()));
        assert_eq!(a.score(&b), Err(err));
        assert_eq!(a, Vector::zeros(3));
    }

    #[test]
    fn norm_matches_components() {
        let a = Vector::from_vec(vec![3.0, 4.0]);
        assert_eq!(a.norm(), 5.0);
    }
}
