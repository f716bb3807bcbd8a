//! Label vocabularies for containment matching.
//!
//! Two vocabularies feed the containment tiers:
//!
//! - [`KeywordVocabulary`] is derived from the dataset's own labels, most
//!   frequent first.
//! - [`ReferenceVocabulary`] comes from an external list, one term per line,
//!   loaded through a [`ReferenceSource`].
//!
//! Both match the same way: the first term, in vocabulary order, that occurs
//! as a substring of the query wins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use canonical::normalize_text;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Failure to obtain a reference vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read reference vocabulary {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to do when the reference vocabulary cannot be loaded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Log the failure, skip the reference tier and record it in the report.
    Skip,
}

fn first_contained<'a>(terms: &'a [String], text: &str) -> Option<&'a str> {
    terms
        .iter()
        .find(|term| text.contains(term.as_str()))
        .map(String::as_str)
}

/// Distinct dataset labels ordered by descending frequency, ties broken by
/// ascending lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordVocabulary {
    terms: Vec<String>,
}

impl KeywordVocabulary {
    /// Build from normalized, non-missing labels. Empty labels are ignored.
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<&'a str, usize> = HashMap::new();
        for label in labels.into_iter().filter(|l| !l.is_empty()) {
            *counts.entry(label).or_default() += 1;
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Self {
            terms: ranked.into_iter().map(|(t, _)| t.to_string()).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// First term contained in `text`.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        first_contained(&self.terms, text)
    }
}

/// Externally supplied terms in source line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceVocabulary {
    terms: Vec<String>,
}

impl ReferenceVocabulary {
    /// Parse one term per line. Lines are trimmed and normalized; lines that
    /// end up empty are skipped.
    pub fn from_lines(content: &str) -> Self {
        Self::from_terms(content.lines())
    }

    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| normalize_text(t.as_ref().trim()))
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// First term contained in `text`.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        first_contained(&self.terms, text)
    }
}

/// Where the reference vocabulary comes from.
pub trait ReferenceSource {
    fn load(&self) -> Result<ReferenceVocabulary, VocabularyError>;

    /// Short human-readable origin, used in logs.
    fn describe(&self) -> String;
}

impl ReferenceSource for ReferenceVocabulary {
    fn load(&self) -> Result<ReferenceVocabulary, VocabularyError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} terms)", self.terms.len())
    }
}

/// Reference vocabulary stored as a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    path: PathBuf,
}

impl ReferenceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReferenceSource for ReferenceFile {
    fn load(&self) -> Result<ReferenceVocabulary, VocabularyError> {
        let content = fs::read_to_string(&self.path).map_err(|source| VocabularyError::Read {
            path: self.path.clone(),
            source,
        })?;
        let vocab = ReferenceVocabulary::from_lines(&content);
        info!(
            path = %self.path.display(),
            terms = vocab.len(),
            "reference_vocabulary_loaded"
        );
        Ok(vocab)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
