//! # Banded LSH Index
//!
//! Candidate retrieval for MinHash signatures. Each signature of length
//! `num_perm` is cut into `bands` contiguous bands of `rows` values; every band
//! is hashed into a bucket, and two documents become candidates when they land
//! in the same bucket for at least one band.
//!
//! The probability that a pair with Jaccard similarity `s` becomes a candidate
//! is `1 - (1 - s^r)^b`, an S-curve whose midpoint sits near
//! `(1/b)^(1/r)`. [`LshParams::from_threshold`] picks the banding whose
//! midpoint is closest to a target threshold.
//!
//! ## Lifecycle
//!
//! The index is built once through [`LshIndexBuilder`] and frozen by
//! [`LshIndexBuilder::build`]. The resulting [`LshIndex`] exposes queries only,
//! so it can be shared across threads without locking.
//!
//! ## Example Usage
//!
//! ```
//! use index::{LshIndexBuilder, LshParams};
//! use perceptual::{MinHashConfig, MinHasher, NgramRange};
//!
//! let hasher = MinHasher::new(MinHashConfig::default()).unwrap();
//! let range = NgramRange::new(2, 2).unwrap();
//!
//! let params = LshParams::from_threshold(0.8, hasher.num_perm()).unwrap();
//! let mut builder = LshIndexBuilder::new(params, hasher.num_perm()).unwrap();
//! builder
//!     .insert(0, &hasher.signature_for_text("computer science", range))
//!     .unwrap();
//! let index = builder.build();
//!
//! let hits = index
//!     .query(&hasher.signature_for_text("computer science", range))
//!     .unwrap();
//! assert_eq!(hits, vec![0]);
//! ```

mod lsh;
mod params;

pub use crate::lsh::{LshIndex, LshIndexBuilder};
pub use crate::params::LshParams;

use thiserror::Error;

/// Identifier of an indexed document.
pub type DocId = usize;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("invalid banding: {bands} bands x {rows} rows must equal num_perm {num_perm}")]
    InvalidBanding {
        bands: usize,
        rows: usize,
        num_perm: usize,
    },
    #[error("invalid LSH threshold {threshold}; expected a finite value in (0, 1]")]
    InvalidThreshold { threshold: f64 },
    #[error("signature length {actual} does not match index num_perm {expected}")]
    SignatureLength { expected: usize, actual: usize },
}
