//! YAML configuration file support for fieldfill.
//!
//! Every run setting can live in a single YAML file. Missing sections and
//! fields fall back to defaults, and command-line flags override file values.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! minhash:
//!   num_perm: 128
//!   seed: 17297687000019483309
//!   use_parallel: false
//!
//! lsh:
//!   threshold: 0.8
//!   # bands: 8
//!   # rows: 16
//!
//! matching:
//!   level: 2
//!   build_range: { min_n: 2, max_n: 2 }
//!   query_range: { min_n: 2, max_n: 4 }
//!   fallback_label: "other"
//!
//! reference:
//!   path: "csv/wiki/academic_fields.txt"
//!   on_error: "abort"
//!
//! output:
//!   cleaned: "csv/cleaned/cleaned_field_of_study.csv"
//!   staged: "csv/stg/cleaned_field_of_study.csv"
//!   report: "csv/report.txt"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use matcher::MatcherConfig;
use perceptual::{NgramRange, DEFAULT_NUM_PERM, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fill::{FillLevel, FillOptions, DEFAULT_FALLBACK_LABEL};
use crate::vocab::ReferencePolicy;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FieldFillConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub minhash: MinHashYamlConfig,

    #[serde(default)]
    pub lsh: LshYamlConfig,

    #[serde(default)]
    pub matching: MatchingYamlConfig,

    #[serde(default)]
    pub reference: ReferenceYamlConfig,

    #[serde(default)]
    pub output: OutputYamlConfig,
}

impl FieldFillConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: FieldFillConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.minhash.validate()?;
        self.lsh.validate()?;
        self.matching.validate()?;
        self.matcher_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        Ok(())
    }

    /// Matcher settings assembled from the `minhash`, `lsh` and `matching`
    /// sections.
    pub fn matcher_config(&self) -> MatcherConfig {
        let mut cfg = MatcherConfig::default()
            .with_threshold(self.lsh.threshold)
            .with_num_perm(self.minhash.num_perm)
            .with_seed(self.minhash.seed)
            .with_ranges(self.matching.build_range, self.matching.query_range)
            .with_parallel(self.minhash.use_parallel);
        cfg.bands = self.lsh.bands;
        cfg.rows = self.lsh.rows;
        cfg
    }

    /// Fill options for `level`, or for the configured level when `None`.
    pub fn fill_options(&self, level: Option<FillLevel>) -> FillOptions {
        FillOptions::new(level.unwrap_or(self.matching.level))
            .with_matcher(self.matcher_config())
            .with_reference_policy(self.reference.on_error)
            .with_fallback_label(self.matching.fallback_label.clone())
    }
}

impl Default for FieldFillConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            minhash: MinHashYamlConfig::default(),
            lsh: LshYamlConfig::default(),
            matching: MatchingYamlConfig::default(),
            reference: ReferenceYamlConfig::default(),
            output: OutputYamlConfig::default(),
        }
    }
}

/// MinHash YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinHashYamlConfig {
    #[serde(default = "default_num_perm")]
    pub num_perm: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub use_parallel: bool,
}

impl MinHashYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.num_perm == 0 {
            return Err(ConfigLoadError::Validation(
                "minhash.num_perm must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MinHashYamlConfig {
    fn default() -> Self {
        Self {
            num_perm: DEFAULT_NUM_PERM,
            seed: DEFAULT_SEED,
            use_parallel: false,
        }
    }
}

/// LSH banding YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LshYamlConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub bands: Option<usize>,

    #[serde(default)]
    pub rows: Option<usize>,
}

impl LshYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigLoadError::Validation(
                "lsh.threshold must be in (0, 1]".to_string(),
            ));
        }
        if self.bands.is_some() != self.rows.is_some() {
            return Err(ConfigLoadError::Validation(
                "lsh.bands and lsh.rows must be set together".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LshYamlConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            bands: None,
            rows: None,
        }
    }
}

/// Tier selection and matching YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingYamlConfig {
    #[serde(default)]
    pub level: FillLevel,

    #[serde(default = "default_build_range")]
    pub build_range: NgramRange,

    #[serde(default = "default_query_range")]
    pub query_range: NgramRange,

    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
}

impl MatchingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.fallback_label.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "matching.fallback_label must not be empty".to_string(),
            ));
        }
        self.build_range
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matching.build_range: {e}")))?;
        self.query_range
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matching.query_range: {e}")))?;
        Ok(())
    }
}

impl Default for MatchingYamlConfig {
    fn default() -> Self {
        Self {
            level: FillLevel::default(),
            build_range: default_build_range(),
            query_range: default_query_range(),
            fallback_label: default_fallback_label(),
        }
    }
}

/// Reference vocabulary YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceYamlConfig {
    #[serde(default = "default_reference_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub on_error: ReferencePolicy,
}

impl Default for ReferenceYamlConfig {
    fn default() -> Self {
        Self {
            path: default_reference_path(),
            on_error: ReferencePolicy::default(),
        }
    }
}

/// Output locations YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputYamlConfig {
    #[serde(default = "default_cleaned_path")]
    pub cleaned: PathBuf,

    #[serde(default = "default_staged_path")]
    pub staged: PathBuf,

    #[serde(default = "default_report_path")]
    pub report: PathBuf,
}

impl Default for OutputYamlConfig {
    fn default() -> Self {
        Self {
            cleaned: default_cleaned_path(),
            staged: default_staged_path(),
            report: default_report_path(),
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}
fn default_num_perm() -> usize {
    DEFAULT_NUM_PERM
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_threshold() -> f64 {
    0.8
}
fn default_build_range() -> NgramRange {
    NgramRange { min_n: 2, max_n: 2 }
}
fn default_query_range() -> NgramRange {
    NgramRange { min_n: 2, max_n: 4 }
}
fn default_fallback_label() -> String {
    DEFAULT_FALLBACK_LABEL.to_string()
}
fn default_reference_path() -> PathBuf {
    PathBuf::from("csv/wiki/academic_fields.txt")
}
fn default_cleaned_path() -> PathBuf {
    PathBuf::from("csv/cleaned/cleaned_field_of_study.csv")
}
fn default_staged_path() -> PathBuf {
    PathBuf::from("csv/stg/cleaned_field_of_study.csv")
}
fn default_report_path() -> PathBuf {
    PathBuf::from("csv/report.txt")
}
