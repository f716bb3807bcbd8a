//! Configuration and error types for MinHash signatures.
//!
//! Free of I/O and environment-dependent behavior so that a signature is a
//! pure function of `(shingles, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of hash functions per signature.
pub const DEFAULT_NUM_PERM: usize = 128;

/// Default seed for the hash family.
pub const DEFAULT_SEED: u64 = 0xF00D_BAAD_F00D_BAAD;

/// Configuration of the MinHash hash family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MinHashConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect a signature must bump this
    /// version.
    pub version: u32,
    /// Number of independent hash functions, i.e. the signature length.
    ///
    /// Larger values lower the variance of the Jaccard estimate at a linear
    /// cost in time and memory.
    pub num_perm: usize,
    /// Seed for deterministic hashing.
    ///
    /// Signatures are only comparable when they were produced with the same
    /// seed and the same `num_perm`.
    pub seed: u64,
    /// Compute signature slots in parallel with rayon.
    pub use_parallel: bool,
}

impl MinHashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_perm(mut self, num_perm: usize) -> Self {
        self.num_perm = num_perm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.num_perm < 1 {
            return Err(PerceptualError::InvalidNumPerm {
                num_perm: self.num_perm,
            });
        }
        Ok(())
    }
}

impl Default for MinHashConfig {
    fn default() -> Self {
        Self {
            version: 1,
            num_perm: DEFAULT_NUM_PERM,
            seed: DEFAULT_SEED,
            use_parallel: false,
        }
    }
}

/// Errors returned by shingling and MinHash.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: num_perm must be >= 1 (got {num_perm})")]
    InvalidNumPerm { num_perm: usize },

    #[error("invalid n-gram range ({min_n}, {max_n}): need 1 <= min_n <= max_n")]
    InvalidNgramRange { min_n: usize, max_n: usize },

    #[error("signature length mismatch: {left} vs {right}")]
    SignatureLengthMismatch { left: usize, right: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = MinHashConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.num_perm, 128);
        assert_eq!(cfg.seed, 0xF00D_BAAD_F00D_BAAD);
        assert!(!cfg.use_parallel);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let cfg = MinHashConfig::new()
            .with_num_perm(64)
            .with_seed(42)
            .with_parallel(true);

        assert_eq!(cfg.num_perm, 64);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.use_parallel);
    }

    #[test]
    fn config_validate_rejects_zero_num_perm() {
        let cfg = MinHashConfig::new().with_num_perm(0);
        assert_eq!(
            cfg.validate(),
            Err(PerceptualError::InvalidNumPerm { num_perm: 0 })
        );
    }

    #[test]
    fn config_validate_rejects_version_zero() {
        let cfg = MinHashConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(PerceptualError::InvalidConfigVersion { version: 0 })
        ));
    }

    #[test]
    fn config_serde_fills_missing_fields_with_defaults() {
        let cfg: MinHashConfig = serde_json::from_str(r#"{"num_perm": 256}"#).unwrap();
        assert_eq!(cfg.num_perm, 256);
        assert_eq!(cfg.seed, DEFAULT_SEED);
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn error_display_mentions_lengths() {
        let err = PerceptualError::SignatureLengthMismatch {
            left: 128,
            right: 64,
        };
        assert!(err.to_string().contains("128 vs 64"));
    }
}
