use hashbrown::HashMap;
use perceptual::MinHashSignature;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::{DocId, IndexError, LshParams};

type Buckets = Vec<HashMap<u64, Vec<DocId>>>;

/// Mutable accumulator for an [`LshIndex`].
///
/// All inserts happen here; [`LshIndexBuilder::build`] freezes the buckets.
#[derive(Debug, Clone)]
pub struct LshIndexBuilder {
    params: LshParams,
    num_perm: usize,
    buckets: Buckets,
    indexed: usize,
    skipped_empty: usize,
}

impl LshIndexBuilder {
    /// Fails when `params` do not cover exactly `num_perm` values.
    pub fn new(params: LshParams, num_perm: usize) -> Result<Self, IndexError> {
        if params.num_perm() != num_perm {
            return Err(IndexError::InvalidBanding {
                bands: params.bands(),
                rows: params.rows(),
                num_perm,
            });
        }
        Ok(Self {
            params,
            num_perm,
            buckets: (0..params.bands()).map(|_| HashMap::new()).collect(),
            indexed: 0,
            skipped_empty: 0,
        })
    }

    /// Register `doc_id` under every band bucket of `signature`.
    ///
    /// Signatures of the empty shingle set are skipped: they would share every
    /// bucket with every other empty-set document.
    pub fn insert(&mut self, doc_id: DocId, signature: &MinHashSignature) -> Result<(), IndexError> {
        check_len(signature, self.num_perm)?;
        if signature.is_empty_set() {
            self.skipped_empty += 1;
            return Ok(());
        }
        let rows = self.params.rows();
        for (band, bucket) in self.buckets.iter_mut().enumerate() {
            let key = band_key(band, band_values(signature, band, rows));
            bucket.entry(key).or_default().push(doc_id);
        }
        self.indexed += 1;
        Ok(())
    }

    /// Number of signatures skipped because their shingle set was empty.
    pub fn skipped_empty(&self) -> usize {
        self.skipped_empty
    }

    pub fn build(self) -> LshIndex {
        LshIndex {
            params: self.params,
            num_perm: self.num_perm,
            buckets: self.buckets,
            indexed: self.indexed,
            skipped_empty: self.skipped_empty,
        }
    }
}

/// Immutable banded LSH index over MinHash signatures.
///
/// Shared freely across threads once built; there is no insert, update or
/// delete on this type.
#[derive(Debug, Clone)]
pub struct LshIndex {
    params: LshParams,
    num_perm: usize,
    buckets: Buckets,
    indexed: usize,
    skipped_empty: usize,
}

impl LshIndex {
    /// Documents sharing at least one band bucket with `signature`, sorted
    /// ascending without duplicates.
    ///
    /// Pairs that share no band are never returned, however similar they are.
    /// An empty-set query returns no candidates.
    pub fn query(&self, signature: &MinHashSignature) -> Result<Vec<DocId>, IndexError> {
        check_len(signature, self.num_perm)?;
        if signature.is_empty_set() {
            return Ok(Vec::new());
        }
        let rows = self.params.rows();
        let mut out: Vec<DocId> = Vec::new();
        for (band, bucket) in self.buckets.iter().enumerate() {
            let key = band_key(band, band_values(signature, band, rows));
            if let Some(docs) = bucket.get(&key) {
                out.extend_from_slice(docs);
            }
        }
        out.sort_unstable();
        out.dedup();
        Ok(out)
    }

    pub fn params(&self) -> LshParams {
        self.params
    }

    pub fn num_perm(&self) -> usize {
        self.num_perm
    }

    /// Number of documents present in the buckets.
    pub fn len(&self) -> usize {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    pub fn skipped_empty(&self) -> usize {
        self.skipped_empty
    }

    /// Number of buckets holding more than one document.
    pub fn num_collision_buckets(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|band| band.values())
            .filter(|docs| docs.len() > 1)
            .count()
    }
}

fn check_len(signature: &MinHashSignature, expected: usize) -> Result<(), IndexError> {
    if signature.len() != expected {
        return Err(IndexError::SignatureLength {
            expected,
            actual: signature.len(),
        });
    }
    Ok(())
}

#[inline]
fn band_values(signature: &MinHashSignature, band: usize, rows: usize) -> &[u64] {
    let start = band * rows;
    &signature.values()[start..start + rows]
}

/// Bucket key of one band: xxh3 over the little-endian bytes, seeded with the
/// band index so equal values in different bands never share a key space.
#[inline]
fn band_key(band: usize, values: &[u64]) -> u64 {
    let mut bytes = Vec::with_capacity(values.len() * 8);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    xxh3_64_with_seed(&bytes, band as u64)
}
