//! CSV input and output.
//!
//! Input needs a header row; `level`, `level_name`, `field_of_study` and
//! `academic_field` are read by name, extra columns are ignored, and empty
//! cells count as missing.

use std::collections::HashSet;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::fill::{FilledRecord, Record, Resolution};
use crate::level::UNKNOWN;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read every record from a CSV file.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, TableError> {
    let file = fs::File::open(path.as_ref())?;
    let records = read_records_from(file)?;
    info!(
        path = %path.as_ref().display(),
        records = records.len(),
        "table_read"
    );
    Ok(records)
}

/// Read every record from CSV data.
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<Record>, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut out = Vec::new();
    for row in rdr.deserialize::<Record>() {
        out.push(row?);
    }
    Ok(out)
}

/// Row of the cleaned output and of the add-entry file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CleanedRow {
    pub level: String,
    pub level_name: String,
    pub field_of_study: String,
    pub academic_field: String,
}

impl From<&FilledRecord> for CleanedRow {
    fn from(rec: &FilledRecord) -> Self {
        Self {
            level: rec.level.clone(),
            level_name: rec.level_name.clone(),
            field_of_study: rec.field_of_study.clone().unwrap_or_default(),
            academic_field: rec.academic_field.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StagedRow<'a> {
    level: &'a str,
    level_name: &'a str,
    field_of_study: Option<&'a str>,
    academic_field: Option<&'a str>,
    field_of_study_cleaned: Option<&'a str>,
    academic_field_cleaned: &'a str,
    tier: &'static str,
    fuzzy_source_doc: Option<usize>,
    fuzzy_score: Option<f64>,
}

impl<'a> From<&'a FilledRecord> for StagedRow<'a> {
    fn from(rec: &'a FilledRecord) -> Self {
        let (fuzzy_source_doc, fuzzy_score) = match &rec.resolution {
            Resolution::Fuzzy {
                source_doc, score, ..
            } => (Some(*source_doc), Some(*score)),
            _ => (None, None),
        };
        Self {
            level: &rec.level,
            level_name: &rec.level_name,
            field_of_study: rec.field_of_study.as_deref(),
            academic_field: rec.original_academic_field.as_deref(),
            field_of_study_cleaned: rec.field_of_study_cleaned.as_deref(),
            academic_field_cleaned: &rec.academic_field,
            tier: rec.resolution.tier_name(),
            fuzzy_source_doc,
            fuzzy_score,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_rows<W, T, I>(writer: W, rows: I) -> Result<(), TableError>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `level, level_name, field_of_study, academic_field` for every record.
pub fn write_cleaned<P: AsRef<Path>>(path: P, records: &[FilledRecord]) -> Result<(), TableError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    write_cleaned_to(fs::File::create(path)?, records)?;
    info!(path = %path.display(), records = records.len(), "cleaned_written");
    Ok(())
}

pub fn write_cleaned_to<W: Write>(writer: W, records: &[FilledRecord]) -> Result<(), TableError> {
    write_rows(writer, records.iter().map(CleanedRow::from))
}

/// Write every intermediate column plus the resolving tier.
pub fn write_staged<P: AsRef<Path>>(path: P, records: &[FilledRecord]) -> Result<(), TableError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    write_staged_to(fs::File::create(path)?, records)?;
    info!(path = %path.display(), records = records.len(), "staged_written");
    Ok(())
}

pub fn write_staged_to<W: Write>(writer: W, records: &[FilledRecord]) -> Result<(), TableError> {
    write_rows(writer, records.iter().map(StagedRow::from))
}

/// Manually labeled entry for the cleaned file.
///
/// Level, level name and academic field are lowercased and trimmed; missing
/// level values become `unknown`. The field of study is stored as given.
pub fn labeled_entry(
    field_of_study: &str,
    academic_field: &str,
    level: Option<&str>,
    level_name: Option<&str>,
) -> CleanedRow {
    let clean = |v: Option<&str>| {
        v.map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| UNKNOWN.to_string())
    };
    CleanedRow {
        level: clean(level),
        level_name: clean(level_name),
        field_of_study: field_of_study.to_string(),
        academic_field: academic_field.trim().to_lowercase(),
    }
}

/// Append `entry` to the cleaned file at `path`, creating it if needed.
///
/// The file is rewritten with exact duplicate rows dropped, keeping the first
/// occurrence. Returns `false` when `entry` was already present.
pub fn append_entry<P: AsRef<Path>>(path: P, entry: CleanedRow) -> Result<bool, TableError> {
    let path = path.as_ref();
    let mut rows: Vec<CleanedRow> = if path.exists() {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;
        rdr.deserialize().collect::<Result<_, _>>()?
    } else {
        Vec::new()
    };

    let already_present = rows.contains(&entry);
    rows.push(entry);

    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.clone()));

    ensure_parent(path)?;
    write_rows(fs::File::create(path)?, &rows)?;
    info!(
        path = %path.display(),
        rows = rows.len(),
        added = !already_present,
        "entry_appended"
    );
    Ok(!already_present)
}
