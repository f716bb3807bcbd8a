use index::{DocId, LshIndex, LshIndexBuilder};
use perceptual::{MinHashSignature, MinHasher};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{MatchError, MatchHit, MatcherConfig};


/// A labeled row that fuzzy queries can resolve to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabeledDocument {
    pub id: DocId,
    /// Normalized text that gets shingled and indexed.
    pub text: String,
    /// Label adopted by a query that matches this document.
    pub label: String,
}

/// Snapshot of labeled documents kept in strictly ascending id order.
///
/// [`push`](Corpus::push) assigns the id after the last one;
/// [`push_with_id`](Corpus::push_with_id) keeps a caller-chosen id such as a
/// row index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    docs: Vec<LabeledDocument>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document and return its id.
    pub fn push(&mut self, text: impl Into<String>, label: impl Into<String>) -> DocId {
        let id = self.docs.last().map_or(0, |doc| doc.id + 1);
        self.docs.push(LabeledDocument {
            id,
            text: text.into(),
            label: label.into(),
        });
        id
    }

    /// Append a document under `id`, which must exceed every id already present.
    pub fn push_with_id(
        &mut self,
        id: DocId,
        text: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<(), MatchError> {
        if let Some(last) = self.docs.last().map(|doc| doc.id) {
            if id <= last {
                return Err(MatchError::NonIncreasingId { id, last });
            }
        }
        self.docs.push(LabeledDocument {
            id,
            text: text.into(),
            label: label.into(),
        });
        Ok(())
    }

    fn position(&self, id: DocId) -> Option<usize> {
        self.docs.binary_search_by_key(&id, |doc| doc.id).ok()
    }

    pub fn get(&self, id: DocId) -> Option<&LabeledDocument> {
        self.position(id).map(|pos| &self.docs[pos])
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabeledDocument> {
        self.docs.iter()
    }
}

impl<T: Into<String>, L: Into<String>> FromIterator<(T, L)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (T, L)>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for (text, label) in iter {
            corpus.push(text, label);
        }
        corpus
    }
}

/// Immutable fuzzy matcher over a [`Corpus`].
///
/// Every document carries two signatures: one over `build_range` that lives in
/// the LSH index, and one over `query_range` used to re-score candidates.
/// `scoring` is aligned with the corpus' document order.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    cfg: MatcherConfig,
    hasher: MinHasher,
    corpus: Corpus,
    scoring: Vec<MinHashSignature>,
    index: LshIndex,
}

impl FuzzyMatcher {
    /// Sign every document once and freeze the LSH index.
    pub fn build(corpus: Corpus, cfg: &MatcherConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        let hasher = MinHasher::new(cfg.minhash())?;
        let params = cfg.lsh_params()?;

        let sign = |doc: &LabeledDocument| {
            (
                hasher.signature_for_text(&doc.text, cfg.build_range),
                hasher.signature_for_text(&doc.text, cfg.query_range),
            )
        };
        let signed: Vec<(MinHashSignature, MinHashSignature)> = if cfg.use_parallel {
            corpus.docs.par_iter().map(sign).collect()
        } else {
            corpus.docs.iter().map(sign).collect()
        };

        let mut builder = LshIndexBuilder::new(params, hasher.num_perm())?;
        let mut scoring = Vec::with_capacity(signed.len());
        for (doc, (index_sig, scoring_sig)) in corpus.docs.iter().zip(signed) {
            builder.insert(doc.id, &index_sig)?;
            scoring.push(scoring_sig);
        }
        let index = builder.build();

        info!(
            documents = corpus.len(),
            indexed = index.len(),
            skipped_empty = index.skipped_empty(),
            collision_buckets = index.num_collision_buckets(),
            bands = params.bands(),
            rows = params.rows(),
            candidate_probability_at_threshold = params.candidate_probability(cfg.threshold),
            "matcher_built"
        );

        Ok(Self {
            cfg: cfg.clone(),
            hasher,
            corpus,
            scoring,
            index,
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.cfg
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &LshIndex {
        &self.index
    }

    /// Highest-scoring LSH candidate for `query`, if any scores above zero.
    ///
    /// Candidates come back from the index in ascending id order and only a
    /// strictly greater score replaces the current best, so ties resolve to the
    /// lowest document id.
    pub fn best_match(&self, query: &str) -> Result<Option<MatchHit>, MatchError> {
        let sig = self.hasher.signature_for_text(query, self.cfg.query_range);
        let candidates = self.index.query(&sig)?;

        let mut best: Option<(usize, f64)> = None;
        for id in candidates.iter().copied() {
            let Some(pos) = self.corpus.position(id) else {
                continue;
            };
            let score = sig.jaccard(&self.scoring[pos])?;
            if score > 0.0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((pos, score));
            }
        }

        let hit = best.map(|(pos, score)| {
            let doc = &self.corpus.docs[pos];
            MatchHit {
                doc_id: doc.id,
                label: doc.label.clone(),
                score,
            }
        });
        debug!(
            candidates = candidates.len(),
            best_doc = hit.as_ref().map(|h| h.doc_id),
            "fuzzy_query"
        );
        Ok(hit)
    }

    /// [`best_match`](Self::best_match) for every query, in input order.
    pub fn best_matches<S>(&self, queries: &[S]) -> Result<Vec<Option<MatchHit>>, MatchError>
    where
        S: AsRef<str> + Sync,
    {
        if self.cfg.use_parallel {
            queries
                .par_iter()
                .map(|q| self.best_match(q.as_ref()))
                .collect()
        } else {
            queries.iter().map(|q| self.best_match(q.as_ref())).collect()
        }
    }
}
