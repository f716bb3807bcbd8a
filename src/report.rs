//! Run summary for a fill.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters and fill rate for one run.
///
/// Every record missing a label before the run is resolved by exactly one
/// tier, so `keyword + fuzzy + reference + fallback == missing_before`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FillReport {
    pub total_records: usize,
    pub missing_before: usize,
    pub keyword: usize,
    /// `None` when the fuzzy tier did not run.
    pub fuzzy: Option<usize>,
    /// `None` when the reference tier did not run or was skipped.
    pub reference: Option<usize>,
    pub fallback: usize,
    /// Share of records carrying a label before the fallback, in percent,
    /// rounded to two decimals.
    pub fill_percentage: f64,
    /// Load failure of a skipped reference vocabulary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_error: Option<String>,
}

impl FillReport {
    /// Resolved by one of the matching tiers, excluding the fallback.
    pub fn matched(&self) -> usize {
        self.keyword + self.fuzzy.unwrap_or(0) + self.reference.unwrap_or(0)
    }

    /// `true` when the per-tier counters add up to `missing_before`.
    pub fn is_balanced(&self) -> bool {
        self.matched() + self.fallback == self.missing_before
    }
}

/// Percentage of `filled` over `total`, rounded to four decimals of the ratio.
/// Zero records give zero.
pub fn fill_percentage(filled: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = filled as f64 / total as f64;
    (ratio * 10_000.0).round() / 100.0
}

impl fmt::Display for FillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of records: {}", self.total_records)?;
        writeln!(f, "Number of missing academic fields: {}", self.missing_before)?;
        writeln!(f, "Number of matches using keywords: {}", self.keyword)?;
        if let Some(fuzzy) = self.fuzzy {
            writeln!(f, "Number of matches using MinHash: {fuzzy}")?;
        }
        if let Some(reference) = self.reference {
            writeln!(f, "Number of matches using reference vocabulary: {reference}")?;
        }
        if let Some(err) = &self.reference_error {
            writeln!(f, "Reference vocabulary skipped: {err}")?;
        }
        writeln!(f, "Number of fallback assignments: {}", self.fallback)?;
        write!(f, "Percentage of filled academic fields: ")?;
        write_percentage(f, self.fill_percentage)
    }
}

/// Shortest decimal form, keeping one fractional digit for whole numbers:
/// `50.0`, `66.67`, `100.0`.
fn write_percentage(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.fract() == 0.0 {
        write!(f, "{value:.1}")
    } else {
        write!(f, "{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_ratio_to_four_decimals() {
        assert_eq!(fill_percentage(3, 4), 75.0);
        assert_eq!(fill_percentage(1, 3), 33.33);
        assert_eq!(fill_percentage(2, 3), 66.67);
        assert_eq!(fill_percentage(0, 5), 0.0);
        assert_eq!(fill_percentage(5, 5), 100.0);
    }

    #[test]
    fn zero_records_give_zero_percent() {
        assert_eq!(fill_percentage(0, 0), 0.0);
    }

    #[test]
    fn display_lists_only_tiers_that_ran() {
        let report = FillReport {
            total_records: 4,
            missing_before: 2,
            keyword: 1,
            fuzzy: None,
            reference: None,
            fallback: 1,
            fill_percentage: 75.0,
            reference_error: None,
        };
        let text = report.to_string();
        assert!(text.contains("Number of missing academic fields: 2"));
        assert!(text.contains("Number of matches using keywords: 1"));
        assert!(!text.contains("MinHash"));
        assert!(!text.contains("reference"));
        assert!(text.ends_with("Percentage of filled academic fields: 75.0"));
    }

    #[test]
    fn percentage_line_uses_shortest_decimal_form() {
        let line = |pct: f64| {
            FillReport {
                fill_percentage: pct,
                ..FillReport::default()
            }
            .to_string()
            .lines()
            .last()
            .unwrap_or_default()
            .to_string()
        };
        assert_eq!(line(fill_percentage(1, 2)), "Percentage of filled academic fields: 50.0");
        assert_eq!(line(fill_percentage(2, 3)), "Percentage of filled academic fields: 66.67");
        assert_eq!(line(fill_percentage(1, 3)), "Percentage of filled academic fields: 33.33");
        assert_eq!(line(fill_percentage(4, 4)), "Percentage of filled academic fields: 100.0");
        assert_eq!(line(0.0), "Percentage of filled academic fields: 0.0");
    }

    #[test]
    fn display_includes_skipped_reference_error() {
        let report = FillReport {
            fuzzy: Some(0),
            reference_error: Some("failed to read reference vocabulary x".into()),
            ..FillReport::default()
        };
        let text = report.to_string();
        assert!(text.contains("Number of matches using MinHash: 0"));
        assert!(text.contains("Reference vocabulary skipped: failed to read"));
    }

    #[test]
    fn balance_check() {
        let report = FillReport {
            total_records: 10,
            missing_before: 6,
            keyword: 2,
            fuzzy: Some(1),
            reference: Some(1),
            fallback: 2,
            fill_percentage: 80.0,
            reference_error: None,
        };
        assert_eq!(report.matched(), 4);
        assert!(report.is_balanced());
        assert!(!FillReport { fallback: 3, ..report }.is_balanced());
    }
}
