//! Persona-driven relevance: section windows, similarity backends, ranking.

mod options;
mod ranker;
mod sections;
mod vectorizer;

pub use options::{RankOptions, SectionOptions};
pub use ranker::RelevanceRanker;
pub use sections::{extract_sections, truncate_chars};
pub use vectorizer::{cosine_similarity, Embedder, EmbeddingBackend, SimilarityBackend, TfIdfBackend};
