//! Three-tier filling of missing academic-field labels.
//!
//! Each record whose label is missing walks the tiers in order and stops at
//! the first one that resolves it:
//!
//! 1. **Keyword**: the most frequent dataset label contained in the
//!    normalized field of study.
//! 2. **Fuzzy** (level >= 2): MinHash + LSH match of the field of study
//!    against every labeled row, including rows resolved by tier 1.
//! 3. **Reference** (level >= 3): first reference term contained in the
//!    normalized field of study.
//!
//! Anything left over receives the fallback label. Records without a usable
//! field of study go straight to the fallback.

use std::fmt;

use canonical::{normalize_field, normalize_label};
use index::DocId;
use matcher::{Corpus, FuzzyMatcher, MatchError, MatcherConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, Level};

use crate::level::default_level_pair;
use crate::report::{fill_percentage, FillReport};
use crate::vocab::{KeywordVocabulary, ReferencePolicy, ReferenceSource, VocabularyError};

/// Label assigned when no tier resolves a record.
pub const DEFAULT_FALLBACK_LABEL: &str = "other";

/// Input row. Every column may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub level_name: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub academic_field: Option<String>,
}

impl Record {
    pub fn new(field_of_study: Option<&str>, academic_field: Option<&str>) -> Self {
        Self {
            field_of_study: field_of_study.map(str::to_string),
            academic_field: academic_field.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Option<&str>, level_name: Option<&str>) -> Self {
        self.level = level.map(str::to_string);
        self.level_name = level_name.map(str::to_string);
        self
    }
}

/// How a record obtained its final label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum Resolution {
    /// The label was present in the input.
    Original,
    Keyword,
    Fuzzy {
        label: String,
        source_doc: DocId,
        score: f64,
    },
    Reference,
    Fallback,
}

impl Resolution {
    pub fn tier_name(&self) -> &'static str {
        match self {
            Resolution::Original => "original",
            Resolution::Keyword => "keyword",
            Resolution::Fuzzy { .. } => "fuzzy",
            Resolution::Reference => "reference",
            Resolution::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tier_name())
    }
}

/// Output row. `academic_field` is never missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilledRecord {
    pub level: String,
    pub level_name: String,
    /// Field of study as read.
    pub field_of_study: Option<String>,
    /// Label as read.
    pub original_academic_field: Option<String>,
    pub field_of_study_cleaned: Option<String>,
    /// Normalized input label, or the label assigned by a tier.
    pub academic_field: String,
    pub resolution: Resolution,
}

/// Highest tier a run may escalate to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum FillLevel {
    #[default]
    Keyword = 1,
    Fuzzy = 2,
    Reference = 3,
}

impl TryFrom<u8> for FillLevel {
    type Error = FillError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FillLevel::Keyword),
            2 => Ok(FillLevel::Fuzzy),
            3 => Ok(FillLevel::Reference),
            other => Err(FillError::InvalidConfig(format!(
                "level must be 1, 2 or 3 (got {other})"
            ))),
        }
    }
}

impl From<FillLevel> for u8 {
    fn from(level: FillLevel) -> Self {
        level as u8
    }
}

/// Knobs for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOptions {
    pub level: FillLevel,
    pub matcher: MatcherConfig,
    pub reference_policy: ReferencePolicy,
    pub fallback_label: String,
}

impl FillOptions {
    pub fn new(level: FillLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_matcher(mut self, matcher: MatcherConfig) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = label.into();
        self
    }

    pub fn validate(&self) -> Result<(), FillError> {
        if self.fallback_label.trim().is_empty() {
            return Err(FillError::InvalidConfig(
                "fallback_label must not be empty".into(),
            ));
        }
        if self.level >= FillLevel::Fuzzy {
            self.matcher.validate()?;
        }
        Ok(())
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            level: FillLevel::default(),
            matcher: MatcherConfig::default(),
            reference_policy: ReferencePolicy::default(),
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FillError {
    #[error("invalid fill config: {0}")]
    InvalidConfig(String),
    #[error("fuzzy matching failed: {0}")]
    Match(#[from] MatchError),
    #[error("reference vocabulary unavailable: {0}")]
    Reference(#[from] VocabularyError),
}

/// Records and report produced by [`fill_records`].
#[derive(Debug, Clone)]
pub struct FillOutcome {
    pub records: Vec<FilledRecord>,
    pub report: FillReport,
}

/// Per-record working state.
struct Row<'a> {
    input: &'a Record,
    query: Option<String>,
    label: Option<(String, Resolution)>,
}

impl Row<'_> {
    /// Missing label with a usable field of study.
    fn pending_query(&self) -> Option<&str> {
        match (&self.label, self.query.as_deref()) {
            (None, Some(q)) if !q.is_empty() => Some(q),
            _ => None,
        }
    }
}

/// Fill every missing label in `records`.
///
/// `reference` is only consulted at [`FillLevel::Reference`], where it is
/// required. The input is not modified; the output preserves input order.
pub fn fill_records(
    records: &[Record],
    options: &FillOptions,
    reference: Option<&dyn ReferenceSource>,
) -> Result<FillOutcome, FillError> {
    options.validate()?;
    if options.level >= FillLevel::Reference && reference.is_none() {
        return Err(FillError::InvalidConfig(
            "level 3 requires a reference vocabulary".into(),
        ));
    }

    let span = tracing::span!(
        Level::INFO,
        "fieldfill.fill",
        records = records.len(),
        level = u8::from(options.level)
    );
    let _guard = span.enter();

    let mut rows: Vec<Row<'_>> = records
        .iter()
        .map(|input| Row {
            input,
            query: normalize_field(input.field_of_study.as_deref()),
            label: normalize_label(input.academic_field.as_deref())
                .map(|label| (label, Resolution::Original)),
        })
        .collect();

    let mut report = FillReport {
        total_records: rows.len(),
        missing_before: rows.iter().filter(|r| r.label.is_none()).count(),
        ..FillReport::default()
    };
    info!(
        total = report.total_records,
        missing = report.missing_before,
        "fill_started"
    );

    report.keyword = keyword_tier(&mut rows);
    info!(tier = "keyword", resolved = report.keyword, "fill_tier_complete");

    if options.level >= FillLevel::Fuzzy {
        let resolved = fuzzy_tier(&mut rows, &options.matcher)?;
        report.fuzzy = Some(resolved);
        info!(tier = "fuzzy", resolved, "fill_tier_complete");
    }

    if options.level >= FillLevel::Reference {
        if let Some(source) = reference {
            match reference_tier(&mut rows, source) {
                Ok(resolved) => {
                    report.reference = Some(resolved);
                    info!(tier = "reference", resolved, "fill_tier_complete");
                }
                Err(err) => match options.reference_policy {
                    ReferencePolicy::Abort => return Err(err.into()),
                    ReferencePolicy::Skip => {
                        error!(
                            source = %source.describe(),
                            error = %err,
                            "reference_tier_skipped"
                        );
                        report.reference_error = Some(err.to_string());
                    }
                },
            }
        }
    }

    let filled = rows.iter().filter(|r| r.label.is_some()).count();
    report.fill_percentage = fill_percentage(filled, report.total_records);

    let out: Vec<FilledRecord> = rows
        .into_iter()
        .map(|row| {
            let (academic_field, resolution) = row.label.unwrap_or_else(|| {
                report.fallback += 1;
                (options.fallback_label.clone(), Resolution::Fallback)
            });
            let (level, level_name) = default_level_pair(
                row.input.level.as_deref(),
                row.input.level_name.as_deref(),
            );
            FilledRecord {
                level,
                level_name,
                field_of_study: row.input.field_of_study.clone(),
                original_academic_field: row.input.academic_field.clone(),
                field_of_study_cleaned: row.query,
                academic_field,
                resolution,
            }
        })
        .collect();

    info!(
        fallback = report.fallback,
        fill_percentage = report.fill_percentage,
        "fill_complete"
    );
    debug_assert!(report.is_balanced());

    Ok(FillOutcome {
        records: out,
        report,
    })
}

fn keyword_tier(rows: &mut [Row<'_>]) -> usize {
    let vocab = KeywordVocabulary::from_labels(
        rows.iter()
            .filter_map(|r| r.label.as_ref().map(|(label, _)| label.as_str())),
    );

    let mut resolved = 0;
    for row in rows.iter_mut() {
        let hit = row
            .pending_query()
            .and_then(|q| vocab.find_in(q))
            .map(str::to_string);
        if let Some(label) = hit {
            row.label = Some((label, Resolution::Keyword));
            resolved += 1;
        }
    }
    resolved
}

/// Snapshot every labeled row, build the matcher once, then query the rows
/// that are still missing. Document ids are row indices.
fn fuzzy_tier(rows: &mut [Row<'_>], cfg: &MatcherConfig) -> Result<usize, FillError> {
    let mut corpus = Corpus::new();
    for (row_idx, row) in rows.iter().enumerate() {
        if let Some((label, _)) = &row.label {
            corpus.push_with_id(row_idx, label.clone(), label.clone())?;
        }
    }
    let matcher = FuzzyMatcher::build(corpus, cfg)?;

    let (positions, queries): (Vec<usize>, Vec<String>) = rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.pending_query().map(|q| (i, q.to_string())))
        .unzip();
    let hits = matcher.best_matches(&queries)?;

    let mut resolved = 0;
    for (pos, hit) in positions.into_iter().zip(hits) {
        if let Some(hit) = hit {
            rows[pos].label = Some((
                hit.label.clone(),
                Resolution::Fuzzy {
                    label: hit.label,
                    source_doc: hit.doc_id,
                    score: hit.score,
                },
            ));
            resolved += 1;
        }
    }
    Ok(resolved)
}

fn reference_tier(
    rows: &mut [Row<'_>],
    source: &dyn ReferenceSource,
) -> Result<usize, VocabularyError> {
    let vocab = source.load()?;

    let mut resolved = 0;
    for row in rows.iter_mut() {
        let hit = row
            .pending_query()
            .and_then(|q| vocab.find_in(q))
            .map(str::to_string);
        if let Some(label) = hit {
            row.label = Some((label, Resolution::Reference));
            resolved += 1;
        }
    }
    Ok(resolved)
}
