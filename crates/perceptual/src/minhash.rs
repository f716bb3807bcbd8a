//! MinHash signature generation.
//!
//! Every slot `j` owns an independent keyed hash function derived from the
//! configured seed. A slot's value is the minimum, over all distinct shingle
//! hashes, of that function. The fraction of slots two signatures agree on is
//! an unbiased estimate of the Jaccard similarity of their shingle sets.

use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::{MinHashConfig, PerceptualError};
use crate::shingles::{shingle, NgramRange};
use crate::signature::{MinHashSignature, EMPTY_SLOT};

/// Signature generator for a fixed hash family.
#[derive(Debug, Clone)]
pub struct MinHasher {
    cfg: MinHashConfig,
    slot_keys: Vec<u64>,
}

impl MinHasher {
    pub fn new(cfg: MinHashConfig) -> Result<Self, PerceptualError> {
        cfg.validate()?;
        let slot_keys = (0..cfg.num_perm).map(|j| slot_key(cfg.seed, j)).collect();
        Ok(Self { cfg, slot_keys })
    }

    pub fn config(&self) -> &MinHashConfig {
        &self.cfg
    }

    pub fn num_perm(&self) -> usize {
        self.cfg.num_perm
    }

    /// Signature of a shingle collection. Duplicate shingles count once.
    ///
    /// Always returns exactly `num_perm` values. An empty collection produces
    /// [`MinHashSignature::empty_set`].
    pub fn signature<S: AsRef<str>>(&self, shingles: &[S]) -> MinHashSignature {
        let hashes = hash_shingles(shingles, self.cfg.seed);
        if hashes.is_empty() {
            return MinHashSignature::empty_set(self.cfg.num_perm);
        }

        let mut values = Vec::with_capacity(self.slot_keys.len());
        if self.cfg.use_parallel {
            self.slot_keys
                .par_iter()
                .map(|&key| compute_slot(&hashes, key))
                .collect_into_vec(&mut values);
        } else {
            values.extend(self.slot_keys.iter().map(|&key| compute_slot(&hashes, key)));
        }
        MinHashSignature::from_values(values)
    }

    /// Shingle `text` over `range` and sign the result.
    pub fn signature_for_text(&self, text: &str, range: NgramRange) -> MinHashSignature {
        self.signature(&shingle(text, range))
    }
}

/// Hash every shingle once, then sort and dedup so the set semantics hold.
fn hash_shingles<S: AsRef<str>>(shingles: &[S], seed: u64) -> Vec<u64> {
    let mut hashes: Vec<u64> = shingles
        .iter()
        .map(|s| xxh3_64_with_seed(s.as_ref().as_bytes(), seed))
        .collect();
    hashes.sort_unstable();
    hashes.dedup();
    hashes
}

/// Key for the hash function of slot `j`.
#[inline]
fn slot_key(seed: u64, j: usize) -> u64 {
    let step = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    splitmix64(seed.wrapping_add(step))
}

/// Minimum of the keyed hash over all shingle hashes.
#[inline]
pub(crate) fn compute_slot(shingle_hashes: &[u64], key: u64) -> u64 {
    let mut minv = EMPTY_SLOT;
    for &val in shingle_hashes {
        let h = mix_u64(val, key);
        if h < minv {
            minv = h;
        }
    }
    minv
}

/// Keyed 64-bit mixer: xxh3 over the value followed by a murmur3 finalizer.
#[inline]
pub(crate) fn mix_u64(x: u64, key: u64) -> u64 {
    let mut h = xxh3_64_with_seed(&x.to_le_bytes(), key);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^ (h >> 33)
}

#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn hasher(num_perm: usize, seed: u64) -> MinHasher {
        MinHasher::new(MinHashConfig::new().with_num_perm(num_perm).with_seed(seed))
            .expect("valid config")
    }

    fn synthetic(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("shingle-{i}")).collect()
    }

    fn true_jaccard(a: &[String], b: &[String]) -> f64 {
        let a: HashSet<&String> = a.iter().collect();
        let b: HashSet<&String> = b.iter().collect();
        a.intersection(&b).count() as f64 / a.union(&b).count() as f64
    }

    #[test]
    fn signature_length_is_num_perm_for_any_input() {
        for num_perm in [1, 16, 128, 200] {
            let h = hasher(num_perm, 7);
            let inputs: [Vec<String>; 3] = [vec![], synthetic(0..1), synthetic(0..500)];
            for shingles in &inputs {
                assert_eq!(h.signature(shingles).len(), num_perm);
            }
        }
    }

    #[test]
    fn empty_collection_yields_sentinel_signature() {
        let h = hasher(32, 1);
        let empty: [&str; 0] = [];
        let sig = h.signature(&empty);
        assert!(sig.is_empty_set());
        assert_eq!(sig, MinHashSignature::empty_set(32));
        assert!(!h.signature(&["a b"]).is_empty_set());
    }

    #[test]
    fn duplicates_do_not_change_signature() {
        let h = hasher(64, 3);
        assert_eq!(
            h.signature(&["x", "y", "x", "x"]),
            h.signature(&["y", "x"])
        );
    }

    #[test]
    fn signature_is_deterministic_and_seed_dependent() {
        let shingles = synthetic(0..20);
        assert_eq!(hasher(64, 1).signature(&shingles), hasher(64, 1).signature(&shingles));
        assert_ne!(hasher(64, 1).signature(&shingles), hasher(64, 2).signature(&shingles));
    }

    #[test]
    fn parallel_equals_sequential() {
        let shingles = synthetic(0..50);
        let seq = MinHasher::new(MinHashConfig::new().with_parallel(false)).unwrap();
        let par = MinHasher::new(MinHashConfig::new().with_parallel(true)).unwrap();
        assert_eq!(seq.signature(&shingles), par.signature(&shingles));
    }

    #[test]
    fn identical_sets_estimate_one() {
        let h = hasher(128, 11);
        let a = h.signature(&synthetic(0..40));
        let b = h.signature(&synthetic(0..40));
        assert_eq!(a.jaccard(&b), Ok(1.0));
    }

    #[test]
    fn disjoint_sets_estimate_near_zero() {
        let h = hasher(256, 5);
        let a = h.signature(&synthetic(0..100));
        let b = h.signature(&synthetic(100..200));
        assert!(a.jaccard(&b).unwrap() < 0.05);
    }

    #[test]
    fn estimation_error_shrinks_as_num_perm_grows() {
        // |A ∩ B| = 50, |A ∪ B| = 150.
        let a = synthetic(0..100);
        let b = synthetic(50..150);
        let expected = true_jaccard(&a, &b);
        assert!((expected - 1.0 / 3.0).abs() < 1e-12);

        let mean_error = |num_perm: usize| -> f64 {
            let trials = 24u64;
            let total: f64 = (0..trials)
                .map(|seed| {
                    let h = hasher(num_perm, 1_000 + seed);
                    let est = h.signature(&a).jaccard(&h.signature(&b)).unwrap();
                    (est - expected).abs()
                })
                .sum();
            total / trials as f64
        };

        let coarse = mean_error(16);
        let medium = mean_error(128);
        let fine = mean_error(1024);
        assert!(fine < coarse, "fine={fine} coarse={coarse}");
        assert!(fine < medium + 0.02, "fine={fine} medium={medium}");
        assert!(fine < 0.05, "fine={fine}");
    }

    #[test]
    fn signature_for_text_matches_manual_shingling() {
        let h = hasher(32, 9);
        let range = NgramRange::new(2, 3).unwrap();
        let text = "bachelor of computer science";
        assert_eq!(
            h.signature_for_text(text, range),
            h.signature(&shingle(text, range))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = MinHasher::new(MinHashConfig::new().with_num_perm(0)).unwrap_err();
        assert_eq!(err, PerceptualError::InvalidNumPerm { num_perm: 0 });
    }

    #[test]
    fn compute_slot_picks_the_minimum_mixed_value() {
        let hashes = [10u64, 20, 30];
        let key = slot_key(42, 3);
        let expected = hashes.iter().map(|&h| mix_u64(h, key)).min().unwrap();
        assert_eq!(compute_slot(&hashes, key), expected);
        assert_eq!(compute_slot(&[], key), EMPTY_SLOT);
    }

    #[test]
    fn slot_keys_differ_per_slot() {
        let keys: HashSet<u64> = (0..256).map(|j| slot_key(7, j)).collect();
        assert_eq!(keys.len(), 256);
    }

    #[test]
    fn splitmix64_avalanche_effect() {
        let diff_bits = (splitmix64(1000) ^ splitmix64(1001)).count_ones();
        assert!(diff_bits > 16);
    }
}
