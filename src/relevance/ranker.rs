//! Relevance ranking of sections against a persona query.

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, warn};

use super::options::RankOptions;
use super::vectorizer::SimilarityBackend;
use crate::analysis::Lexicon;
use crate::model::{Query, Section};

/// Ranks sections by similarity to a query, weighted by domain keyword hits.
pub struct RelevanceRanker {
    backend: Arc<dyn SimilarityBackend>,
    lexicon: Arc<Lexicon>,
    options: RankOptions,
}

impl RelevanceRanker {
    /// Create a ranker over a shared backend and lexicon.
    pub fn new(
        backend: Arc<dyn SimilarityBackend>,
        lexicon: Arc<Lexicon>,
        options: RankOptions,
    ) -> Self {
        Self {
            backend,
            lexicon,
            options,
        }
    }

    /// Ranking options in use.
    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Keyword boost multiplier for a section.
    ///
    /// Each distinct domain keyword in the title adds `title_boost`; each one
    /// found only in the body adds `body_boost`. Capped at `max_boost`.
    pub fn boost(&self, section: &Section) -> f32 {
        let in_title = self.lexicon.matched_domain_keywords(&section.title);
        let body_only = self
            .lexicon
            .matched_domain_keywords(&section.body)
            .into_iter()
            .filter(|kw| !in_title.contains(kw))
            .count();

        let boost = 1.0
            + self.options.title_boost * in_title.len() as f32
            + self.options.body_boost * body_only as f32;
        boost.min(self.options.max_boost)
    }

    /// Score, sort, filter and truncate sections.
    ///
    /// Ties keep extraction order. Falls back to the boost alone when the
    /// backend cannot vectorize the corpus or finds no overlap at all.
    pub fn rank(&self, query: &Query, mut sections: Vec<Section>) -> Vec<Section> {
        if sections.is_empty() {
            return sections;
        }

        let texts: Vec<String> = sections.iter().map(Section::full_text).collect();
        let similarities = match self.backend.similarities(&query.text(), &texts) {
            Ok(scores) if scores.len() != sections.len() => {
                warn!(
                    "{} backend returned {} scores for {} sections, using keyword boost only",
                    self.backend.name(),
                    scores.len(),
                    sections.len()
                );
                None
            }
            Ok(scores) if scores.iter().all(|s| !s.is_finite() || *s <= 0.0) => {
                debug!("No lexical overlap with query, using keyword boost only");
                None
            }
            Ok(scores) => Some(scores),
            Err(e) => {
                debug!("{} backend unavailable ({}), using keyword boost only", self.backend.name(), e);
                None
            }
        };

        for (i, section) in sections.iter_mut().enumerate() {
            let boost = self.boost(section);
            section.keyword_hit = boost > 1.0;
            let score = match &similarities {
                Some(scores) => sanitize(scores[i]) * boost,
                None => boost,
            };
            section.importance_rank = sanitize(score);
        }

        sections.sort_by(|a, b| {
            b.importance_rank
                .partial_cmp(&a.importance_rank)
                .unwrap_or(Ordering::Equal)
                .then(a.order.cmp(&b.order))
        });

        if let Some(floor) = self.options.min_score {
            sections.retain(|s| s.importance_rank >= floor);
        }
        sections.truncate(self.options.top_k);

        debug!(
            "Ranked sections, kept {} (top {})",
            sections.len(),
            self.options.top_k
        );
        sections
    }
}

fn sanitize(score: f32) -> f32 {
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}
