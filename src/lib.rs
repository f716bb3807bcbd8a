//! Workspace umbrella crate for fieldfill.
//!
//! Fills missing academic-field labels in tabular records about fields of
//! study. Three tiers run in order: keyword containment against the dataset's
//! own labels, MinHash + LSH fuzzy matching, and containment against an
//! external reference vocabulary. Whatever remains gets a fallback label.
//!
//! ```
//! use fieldfill::{fill_records, FillLevel, FillOptions, Record};
//!
//! let records = vec![
//!     Record::new(Some("BA Economics"), Some("Economics")),
//!     Record::new(Some("MSc Applied Economics"), None),
//! ];
//! let outcome = fill_records(&records, &FillOptions::new(FillLevel::Keyword), None).unwrap();
//! assert_eq!(outcome.records[1].academic_field, "economics");
//! assert_eq!(outcome.report.keyword, 1);
//! ```

pub mod config;
pub mod fill;
pub mod level;
pub mod report;
pub mod table;
pub mod vocab;

pub use canonical::{collapse_whitespace, normalize_field, normalize_label, normalize_text};
pub use index::{DocId, IndexError, LshIndex, LshIndexBuilder, LshParams};
pub use matcher::{Corpus, FuzzyMatcher, LabeledDocument, MatchError, MatchHit, MatcherConfig};
pub use perceptual::{MinHashConfig, MinHashSignature, MinHasher, NgramRange, PerceptualError};

pub use crate::config::{ConfigLoadError, FieldFillConfig};
pub use crate::fill::{
    fill_records, FillError, FillLevel, FillOptions, FillOutcome, FilledRecord, Record,
    Resolution, DEFAULT_FALLBACK_LABEL,
};
pub use crate::level::{default_level_pair, UNKNOWN};
pub use crate::report::{fill_percentage, FillReport};
pub use crate::table::{
    append_entry, labeled_entry, read_records, read_records_from, write_cleaned,
    write_cleaned_to, write_staged, write_staged_to, CleanedRow, TableError,
};
pub use crate::vocab::{
    KeywordVocabulary, ReferenceFile, ReferencePolicy, ReferenceSource, ReferenceVocabulary,
    VocabularyError,
};
