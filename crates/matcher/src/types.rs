use index::{DocId, IndexError, LshParams};
use perceptual::{MinHashConfig, NgramRange, PerceptualError, DEFAULT_NUM_PERM, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration of a [`FuzzyMatcher`](crate::FuzzyMatcher).
///
/// `MatcherConfig` is cheap to clone and serde-friendly so it can be embedded
/// in higher-level YAML configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatcherConfig {
    /// Target similarity for LSH banding. Ignored when both `bands` and
    /// `rows` are set.
    pub threshold: f64,
    /// Signature length.
    pub num_perm: usize,
    /// Seed of the MinHash hash family.
    pub seed: u64,
    /// Explicit band count; must be given together with `rows`.
    pub bands: Option<usize>,
    /// Explicit rows per band; must be given together with `bands`.
    pub rows: Option<usize>,
    /// N-gram sizes used for the signatures stored in the LSH index.
    pub build_range: NgramRange,
    /// N-gram sizes used for query signatures and for re-scoring candidates.
    pub query_range: NgramRange,
    /// Compute signatures and batch queries with rayon.
    pub use_parallel: bool,
}

impl MatcherConfig {
    pub(crate) fn default_threshold() -> f64 {
        0.8
    }

    pub(crate) fn default_build_range() -> NgramRange {
        NgramRange { min_n: 2, max_n: 2 }
    }

    pub(crate) fn default_query_range() -> NgramRange {
        NgramRange { min_n: 2, max_n: 4 }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_num_perm(mut self, num_perm: usize) -> Self {
        self.num_perm = num_perm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_banding(mut self, bands: usize, rows: usize) -> Self {
        self.bands = Some(bands);
        self.rows = Some(rows);
        self
    }

    pub fn with_ranges(mut self, build_range: NgramRange, query_range: NgramRange) -> Self {
        self.build_range = build_range;
        self.query_range = query_range;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// MinHash configuration derived from this matcher config.
    pub fn minhash(&self) -> MinHashConfig {
        MinHashConfig::new()
            .with_num_perm(self.num_perm)
            .with_seed(self.seed)
            .with_parallel(self.use_parallel)
    }

    /// Banding derived from explicit `bands`/`rows` or from `threshold`.
    pub fn lsh_params(&self) -> Result<LshParams, MatchError> {
        let params = match (self.bands, self.rows) {
            (Some(bands), Some(rows)) => LshParams::new(bands, rows, self.num_perm)?,
            (None, None) => LshParams::from_threshold(self.threshold, self.num_perm)?,
            _ => {
                return Err(MatchError::InvalidConfig(
                    "bands and rows must be set together".into(),
                ))
            }
        };
        Ok(params)
    }

    /// Validate every parameter, including the derived banding.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(MatchError::InvalidConfig(format!(
                "threshold must be in (0, 1] (got {})",
                self.threshold
            )));
        }
        self.minhash().validate()?;
        self.build_range.validate()?;
        self.query_range.validate()?;
        self.lsh_params()?;
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
            num_perm: DEFAULT_NUM_PERM,
            seed: DEFAULT_SEED,
            bands: None,
            rows: None,
            build_range: Self::default_build_range(),
            query_range: Self::default_query_range(),
            use_parallel: false,
        }
    }
}

/// Best candidate for a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchHit {
    /// Identifier of the matched corpus document.
    pub doc_id: DocId,
    /// Label carried by the matched document.
    pub label: String,
    /// Estimated Jaccard similarity, always in `(0, 1]`.
    pub score: f64,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// Invalid matcher configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// Shingling or signature comparison failed.
    #[error("perceptual error: {0}")]
    Perceptual(#[from] PerceptualError),
    /// Index construction or lookup failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    /// Corpus ids must be strictly ascending.
    #[error("document id {id} does not follow the last id {last}")]
    NonIncreasingId { id: DocId, last: DocId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatcherConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.threshold, 0.8);
        assert_eq!(cfg.num_perm, 128);
        assert_eq!(cfg.build_range, NgramRange { min_n: 2, max_n: 2 });
        assert_eq!(cfg.query_range, NgramRange { min_n: 2, max_n: 4 });

        let params = cfg.lsh_params().unwrap();
        assert_eq!((params.bands(), params.rows()), (8, 16));
    }

    #[test]
    fn explicit_banding_overrides_threshold() {
        let cfg = MatcherConfig::default().with_banding(32, 4);
        let params = cfg.lsh_params().unwrap();
        assert_eq!((params.bands(), params.rows()), (32, 4));
    }

    #[test]
    fn banding_that_does_not_cover_num_perm_is_rejected() {
        let cfg = MatcherConfig::default().with_banding(10, 10);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(matches!(
            err,
            MatchError::Index(IndexError::InvalidBanding { bands: 10, rows: 10, num_perm: 128 })
        ));
    }

    #[test]
    fn half_specified_banding_rejected() {
        let cfg = MatcherConfig {
            bands: Some(8),
            ..MatcherConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("bands and rows")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_threshold_rejected() {
        for threshold in [0.0, 1.5, f64::NAN] {
            let cfg = MatcherConfig::default().with_threshold(threshold);
            let err = cfg.validate().expect_err("config should be invalid");
            match err {
                MatchError::InvalidConfig(msg) => assert!(msg.contains("threshold")),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn invalid_range_rejected() {
        let cfg = MatcherConfig {
            query_range: NgramRange { min_n: 3, max_n: 2 },
            ..MatcherConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(MatchError::Perceptual(PerceptualError::InvalidNgramRange { .. }))
        ));
    }

    #[test]
    fn yaml_style_partial_config_uses_defaults() {
        let cfg: MatcherConfig =
            serde_json::from_str(r#"{"threshold": 0.5, "use_parallel": true}"#).unwrap();
        assert_eq!(cfg.threshold, 0.5);
        assert!(cfg.use_parallel);
        assert_eq!(cfg.num_perm, DEFAULT_NUM_PERM);
        assert_eq!(cfg.query_range, MatcherConfig::default_query_range());
    }
}
