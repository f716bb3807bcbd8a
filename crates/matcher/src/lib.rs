//! # Fuzzy Label Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the signature layer (`perceptual`) and the LSH
//! layer (`index`). It turns a snapshot of labeled documents into an immutable
//! [`FuzzyMatcher`] and resolves free-text queries to the label of the most
//! similar document.
//!
//! ## Core Types
//!
//! - [`Corpus`] / [`LabeledDocument`]: the documents queries can resolve to.
//! - [`MatcherConfig`]: MinHash, banding and n-gram range knobs.
//! - [`FuzzyMatcher`]: LSH candidate retrieval followed by re-scoring with
//!   estimated Jaccard similarity.
//! - [`MatchHit`]: document id, adopted label and score.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Corpus, FuzzyMatcher, MatcherConfig};
//!
//! let corpus: Corpus = [
//!     ("computer science", "computer science"),
//!     ("civil engineering", "engineering"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let matcher = FuzzyMatcher::build(corpus, &MatcherConfig::default()).unwrap();
//! let hit = matcher.best_match("civil engineering").unwrap().unwrap();
//! assert_eq!(hit.label, "engineering");
//! ```
//!
//! ## Observability
//!
//! Building a matcher emits a `matcher_built` event at `info` level; every
//! query emits `fuzzy_query` at `debug` level.

pub mod engine;
pub mod types;

pub use crate::engine::{Corpus, FuzzyMatcher, LabeledDocument};
pub use crate::types::{MatchError, MatchHit, MatcherConfig};
