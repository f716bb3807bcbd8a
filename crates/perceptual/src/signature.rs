use serde::{Deserialize, Serialize};

use crate::config::PerceptualError;

/// Slot value used when the shingle set is empty.
///
/// No shingle contributes a hash, so every slot keeps the initial minimum.
/// Real shingles hash to `u64::MAX` with negligible probability.
pub const EMPTY_SLOT: u64 = u64::MAX;

/// Fixed-length MinHash signature of a shingle set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MinHashSignature {
    values: Vec<u64>,
}

impl MinHashSignature {
    pub fn from_values(values: Vec<u64>) -> Self {
        Self { values }
    }

    /// Signature of the empty set for `num_perm` hash functions.
    pub fn empty_set(num_perm: usize) -> Self {
        Self {
            values: vec![EMPTY_SLOT; num_perm],
        }
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the signature has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` when the signature was produced from an empty shingle set.
    pub fn is_empty_set(&self) -> bool {
        self.values.iter().all(|&v| v == EMPTY_SLOT)
    }

    /// Estimated Jaccard similarity: the fraction of slots on which both
    /// signatures agree.
    ///
    /// Signatures of different length come from different configurations and
    /// cannot be compared.
    pub fn jaccard(&self, other: &MinHashSignature) -> Result<f64, PerceptualError> {
        if self.len() != other.len() {
            return Err(PerceptualError::SignatureLengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        if self.is_empty() {
            return Ok(0.0);
        }
        let agree = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();
        Ok(agree as f64 / self.len() as f64)
    }
}

impl AsRef<[u64]> for MinHashSignature {
    fn as_ref(&self) -> &[u64] {
        &self.values
    }
}
