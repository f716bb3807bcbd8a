use serde::{Deserialize, Serialize};

use crate::IndexError;

/// Banding parameters: the signature is split into `bands` bands of `rows`
/// values each, with `bands * rows == num_perm`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LshParams {
    bands: usize,
    rows: usize,
}

impl LshParams {
    /// Explicit banding. Fails unless both factors are positive and their
    /// product is exactly `num_perm`.
    pub fn new(bands: usize, rows: usize, num_perm: usize) -> Result<Self, IndexError> {
        if bands == 0 || rows == 0 || bands.checked_mul(rows) != Some(num_perm) {
            return Err(IndexError::InvalidBanding {
                bands,
                rows,
                num_perm,
            });
        }
        Ok(Self { bands, rows })
    }

    /// Choose the divisor pair of `num_perm` whose S-curve midpoint
    /// `(1/b)^(1/r)` lies closest to `threshold`.
    ///
    /// Ties go to the pair with more bands, which favors recall.
    pub fn from_threshold(threshold: f64, num_perm: usize) -> Result<Self, IndexError> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(IndexError::InvalidThreshold { threshold });
        }
        if num_perm == 0 {
            return Err(IndexError::InvalidBanding {
                bands: 0,
                rows: 0,
                num_perm,
            });
        }

        let mut best = Self {
            bands: 1,
            rows: num_perm,
        };
        let mut best_diff = f64::MAX;
        for bands in (1..=num_perm).filter(|b| num_perm % b == 0) {
            let candidate = Self {
                bands,
                rows: num_perm / bands,
            };
            let diff = (candidate.estimated_threshold() - threshold).abs();
            if diff <= best_diff {
                best = candidate;
                best_diff = diff;
            }
        }
        Ok(best)
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Signature length these parameters cover.
    pub fn num_perm(&self) -> usize {
        self.bands * self.rows
    }

    /// Similarity at which a pair becomes a candidate with probability ~0.5.
    pub fn estimated_threshold(&self) -> f64 {
        (1.0 / self.bands as f64).powf(1.0 / self.rows as f64)
    }

    /// Probability that a pair with true Jaccard `similarity` shares at least
    /// one band: `1 - (1 - s^r)^b`.
    pub fn candidate_probability(&self, similarity: f64) -> f64 {
        1.0 - (1.0 - similarity.powi(self.rows as i32)).powi(self.bands as i32)
    }
}
