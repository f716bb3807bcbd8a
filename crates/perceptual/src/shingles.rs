//! Word n-gram shingling.
//!
//! A shingle is a run of `n` consecutive whitespace-separated tokens joined by
//! a single space. Shingling is a pure function of the text and the n-gram
//! range, so shingles can always be re-derived from stored document text.

use serde::{Deserialize, Serialize};

use crate::config::PerceptualError;

/// Inclusive range of n-gram sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NgramRange {
    pub min_n: usize,
    pub max_n: usize,
}

impl NgramRange {
    /// Create a validated range. Requires `1 <= min_n <= max_n`.
    pub fn new(min_n: usize, max_n: usize) -> Result<Self, PerceptualError> {
        let range = Self { min_n, max_n };
        range.validate()?;
        Ok(range)
    }

    /// Range containing the single size `n`.
    pub fn exactly(n: usize) -> Result<Self, PerceptualError> {
        Self::new(n, n)
    }

    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.min_n == 0 || self.min_n > self.max_n {
            return Err(PerceptualError::InvalidNgramRange {
                min_n: self.min_n,
                max_n: self.max_n,
            });
        }
        Ok(())
    }
}

/// Produce every contiguous token n-gram of `text` for each `n` in `range`.
///
/// Output is grouped by increasing `n`, and within one `n` follows token order.
/// Duplicates are kept; MinHash treats the result as a set. Texts with fewer
/// than `n` tokens contribute nothing for that `n`, so empty text yields an
/// empty collection.
pub fn shingle(text: &str, range: NgramRange) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() || range.min_n == 0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for n in range.min_n..=range.max_n.min(tokens.len()) {
        out.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    out
}
