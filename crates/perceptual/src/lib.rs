//! # Shingling and MinHash signatures
//!
//! This crate turns normalized label text into compact, similarity-preserving
//! signatures. It sits between text normalization (`canonical`) and candidate
//! retrieval (`index`).
//!
//! ## Contract
//!
//! - Input text is expected to be normalized already. This crate never
//!   lowercases, strips punctuation or touches whitespace beyond splitting.
//! - Every operation is a pure function of `(text or shingles, config)`: no
//!   I/O, no clocks, no global state.
//!
//! Invariant: for the same shingle set and the same [`MinHashConfig`], the
//! signature is bit identical across runs and across the sequential and
//! parallel code paths.
//!
//! ## Pipeline
//!
//! 1.  **Shingling**: [`shingle`] splits text on whitespace and emits every
//!     contiguous word n-gram for each size in an [`NgramRange`].
//!
//! 2.  **MinHashing**: [`MinHasher::signature`] hashes the distinct shingles
//!     and keeps, for each of `num_perm` keyed hash functions, the minimum
//!     value. The result is a fixed-length [`MinHashSignature`].
//!
//! 3.  **Estimation**: [`MinHashSignature::jaccard`] returns the fraction of
//!     agreeing slots, an unbiased estimate of the Jaccard similarity of the
//!     two shingle sets.
//!
//! An empty shingle set yields the sentinel signature
//! [`MinHashSignature::empty_set`], which callers can detect with
//! [`MinHashSignature::is_empty_set`].
//!
//! ## Example Usage
//!
//! ```
//! use perceptual::{MinHashConfig, MinHasher, NgramRange};
//!
//! let hasher = MinHasher::new(MinHashConfig::default()).unwrap();
//! let range = NgramRange::new(2, 2).unwrap();
//!
//! let a = hasher.signature_for_text("master of computer science", range);
//! let b = hasher.signature_for_text("master of computer science", range);
//!
//! assert_eq!(a.len(), 128);
//! assert_eq!(a.jaccard(&b).unwrap(), 1.0);
//! ```
pub mod config;
mod minhash;
mod shingles;
mod signature;

pub use crate::config::{MinHashConfig, PerceptualError, DEFAULT_NUM_PERM, DEFAULT_SEED};
pub use crate::minhash::MinHasher;
pub use crate::shingles::{shingle, NgramRange};
pub use crate::signature::{MinHashSignature, EMPTY_SLOT};

/// Current MinHash algorithm version for this crate.
pub const MINHASH_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const MINHASH_ALGORITHM: &str = "xxh3_keyed_minhash_v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_labels_score_higher_than_unrelated_ones() {
        let hasher = MinHasher::new(MinHashConfig::default()).unwrap();
        let range = NgramRange::new(1, 2).unwrap();

        let base = hasher.signature_for_text("bachelor of computer science", range);
        let near = hasher.signature_for_text("bachelor of computer science honours", range);
        let far = hasher.signature_for_text("diploma in nursing practice", range);

        let near_score = base.jaccard(&near).unwrap();
        let far_score = base.jaccard(&far).unwrap();
        assert!(near_score > far_score, "near={near_score} far={far_score}");
    }

    #[test]
    fn single_word_text_has_empty_bigram_signature() {
        let hasher = MinHasher::new(MinHashConfig::default()).unwrap();
        let sig = hasher.signature_for_text("economics", NgramRange::exactly(2).unwrap());
        assert!(sig.is_empty_set());
    }
}
