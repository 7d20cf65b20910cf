//! Similarity backends scoring a query against section texts.
//!
//! The ranker only sees the [`SimilarityBackend`] trait. Two
//! implementations ship with the crate: a sparse TF-IDF model built from the
//! corpus being ranked, and an adapter turning any dense [`Embedder`] into a
//! backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analysis::Lexicon;
use crate::error::{Error, Result};

/// Scores how similar each text is to a query.
///
/// Implementations are shared read-only across worker threads.
pub trait SimilarityBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// One similarity per text, in input order.
    ///
    /// Returns [`Error::Vectorization`] when the corpus cannot be
    /// represented; callers fall back to keyword-only scoring.
    fn similarities(&self, query: &str, texts: &[String]) -> Result<Vec<f32>>;
}

/// Sparse vector keyed by term. Ordered so that dot products sum in a fixed order.
type SparseVector = BTreeMap<String, f32>;

/// TF-IDF with smoothed inverse document frequency and L2-normalized vectors.
pub struct TfIdfBackend {
    lexicon: Arc<Lexicon>,
    min_token_len: usize,
}

impl TfIdfBackend {
    /// Create a backend tokenizing with the given lexicon.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            min_token_len: 2,
        }
    }

    /// Set the shortest token kept as a term.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len.max(1);
        self
    }

    fn terms(&self, text: &str) -> Vec<String> {
        self.lexicon.content_tokens(text, self.min_token_len)
    }

    fn vectorize(terms: &[String], idf: &BTreeMap<String, f32>) -> SparseVector {
        let mut vector = SparseVector::new();
        for term in terms {
            if let Some(weight) = idf.get(term) {
                *vector.entry(term.clone()).or_insert(0.0) += weight;
            }
        }
        let norm = vector.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for weight in vector.values_mut() {
                *weight /= norm;
            }
        }
        vector
    }
}

impl SimilarityBackend for TfIdfBackend {
    fn name(&self) -> &str {
        "tf-idf"
    }

    fn similarities(&self, query: &str, texts: &[String]) -> Result<Vec<f32>> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| self.terms(t)).collect();

        let non_empty = docs.iter().filter(|d| !d.is_empty()).count();
        if non_empty < 2 {
            return Err(Error::Vectorization(format!(
                "need at least two non-empty sections, got {}",
                non_empty
            )));
        }

        let query_terms = self.terms(query);
        if query_terms.is_empty() {
            return Err(Error::Vectorization(
                "query has no content terms".to_string(),
            ));
        }

        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc in &docs {
            let mut seen: Vec<&String> = doc.iter().collect();
            seen.sort();
            seen.dedup();
            for term in seen {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }
        if df.is_empty() {
            return Err(Error::Vectorization("empty vocabulary".to_string()));
        }

        let n = docs.len() as f32;
        let idf: BTreeMap<String, f32> = df
            .into_iter()
            .map(|(term, count)| {
                let weight = ((1.0 + n) / (1.0 + count as f32)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        let query_vector = Self::vectorize(&query_terms, &idf);
        Ok(docs
            .iter()
            .map(|doc| sparse_dot(&query_vector, &Self::vectorize(doc, &idf)))
            .collect())
    }
}

fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    a.iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum()
}

/// Produces dense embeddings for text.
pub trait Embedder: Send + Sync {
    /// Embed one text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Similarity backend over a dense [`Embedder`].
pub struct EmbeddingBackend<E> {
    embedder: E,
}

impl<E: Embedder> EmbeddingBackend<E> {
    /// Wrap an embedder.
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }
}

impl<E: Embedder> SimilarityBackend for EmbeddingBackend<E> {
    fn name(&self) -> &str {
        "embedding"
    }

    fn similarities(&self, query: &str, texts: &[String]) -> Result<Vec<f32>> {
        let query_vector = self.embedder.embed(query)?;
        texts
            .iter()
            .map(|text| {
                let vector = self.embedder.embed(text)?;
                Ok(cosine_similarity(&query_vector, &vector))
            })
            .collect()
    }
}

/// Cosine similarity of two dense vectors; 0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
