//! Persona configuration and pipeline options.

use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::analysis::{ExtractOptions, OutlineOptions, ScoringWeights, DEFAULT_DOMAIN_KEYWORDS};
use crate::error::{Error, Result};
use crate::model::Query;
use crate::relevance::{RankOptions, SectionOptions};
use crate::summarize::SummaryOptions;

/// Persona used when none is configured.
pub const DEFAULT_PERSONA: &str = "General Reader";

/// Job used when none is configured.
pub const DEFAULT_JOB: &str = "Identify and summarize the most relevant sections of the documents.";

/// A text field given either as a plain string or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextField {
    Text(String),
    Role { role: String },
    Task { task: String },
}

impl TextField {
    fn into_text(self) -> String {
        match self {
            TextField::Text(s) | TextField::Role { role: s } | TextField::Task { task: s } => s,
        }
    }
}

/// A document entry given as a file name or `{ "filename": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentEntry {
    Name(String),
    File { filename: String },
}

#[derive(Debug, Deserialize)]
struct RawPersonaConfig {
    persona: Option<TextField>,
    job: Option<TextField>,
    job_to_be_done: Option<TextField>,
    documents: Option<Vec<DocumentEntry>>,
}

/// Who is reading, what they want, and optionally which files to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaConfig {
    /// Persona description
    pub persona: String,
    /// Job to be done
    pub job: String,
    /// Restrict processing to these file names
    pub documents: Option<Vec<String>>,
}

impl PersonaConfig {
    /// Parse a persona configuration from JSON.
    ///
    /// Empty or missing persona/job fields take the defaults individually.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawPersonaConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;

        let persona = raw
            .persona
            .map(TextField::into_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        let job = raw
            .job
            .or(raw.job_to_be_done)
            .map(TextField::into_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_JOB.to_string());

        let documents = raw.documents.map(|docs| {
            docs.into_iter()
                .map(|d| match d {
                    DocumentEntry::Name(name) | DocumentEntry::File { filename: name } => name,
                })
                .collect()
        });

        Ok(Self {
            persona,
            job,
            documents,
        })
    }

    /// Read a persona configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Read a persona configuration file, falling back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                warn!("{}; using default persona and job", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// The ranking query for this configuration.
    pub fn query(&self) -> Query {
        Query::new(&self.persona, &self.job)
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            job: DEFAULT_JOB.to_string(),
            documents: None,
        }
    }
}

/// Options for every pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Layout feature extraction
    pub extract: ExtractOptions,

    /// Heading score weights and threshold
    pub weights: ScoringWeights,

    /// Outline assembly
    pub outline: OutlineOptions,

    /// Section body windows
    pub sections: SectionOptions,

    /// Relevance ranking
    pub rank: RankOptions,

    /// Keywords and summaries
    pub summary: SummaryOptions,

    /// Domain keywords for boosting and sentence scoring
    pub domain_keywords: Vec<String>,

    /// Whether to process documents in parallel
    pub parallel: bool,

    /// Whether to include a global summary in relevance reports
    pub global_summary: bool,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set feature extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set the heading score weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set outline options.
    pub fn with_outline(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    /// Set section window options.
    pub fn with_sections(mut self, sections: SectionOptions) -> Self {
        self.sections = sections;
        self
    }

    /// Set ranking options.
    pub fn with_rank(mut self, rank: RankOptions) -> Self {
        self.rank = rank;
        self
    }

    /// Set summary options.
    pub fn with_summary(mut self, summary: SummaryOptions) -> Self {
        self.summary = summary;
        self
    }

    /// Replace the domain keyword list.
    pub fn with_domain_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable the global summary.
    pub fn with_global_summary(mut self, enabled: bool) -> Self {
        self.global_summary = enabled;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            weights: ScoringWeights::default(),
            outline: OutlineOptions::default(),
            sections: SectionOptions::default(),
            rank: RankOptions::default(),
            summary: SummaryOptions::default(),
            domain_keywords: DEFAULT_DOMAIN_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            parallel: true,
            global_summary: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_plain_fields() {
        let config = PersonaConfig::from_json(
            r#"{"persona": "Investment Analyst", "job": "Assess fraud risk"}"#,
        )
        .unwrap();
        assert_eq!(config.persona, "Investment Analyst");
        assert_eq!(config.job, "Assess fraud risk");
        assert!(config.documents.is_none());
    }

    #[test]
    fn test_object_fields_and_documents() {
        let json = r#"{
            "challenge_info": {"challenge_id": "round_1b_002"},
            "documents": [{"filename": "a.pdf", "title": "A"}, "b.pdf"],
            "persona": {"role": "PhD Researcher"},
            "job_to_be_done": {"task": "Prepare a literature review"}
        }"#;
        let config = PersonaConfig::from_json(json).unwrap();
        assert_eq!(config.persona, "PhD Researcher");
        assert_eq!(config.job, "Prepare a literature review");
        assert_eq!(
            config.documents,
            Some(vec!["a.pdf".to_string(), "b.pdf".to_string()])
        );
        assert_eq!(
            config.query().text(),
            "PhD Researcher. Prepare a literature review"
        );
    }

    #[test]
    fn test_empty_fields_fall_back_individually() {
        let config = PersonaConfig::from_json(r#"{"persona": "  ", "job": "Audit"}"#).unwrap();
        assert_eq!(config.persona, DEFAULT_PERSONA);
        assert_eq!(config.job, "Audit");
    }

    #[test]
    fn test_malformed_is_config_error() {
        let err = PersonaConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_or_default() {
        let missing = PersonaConfig::load_or_default(Some(Path::new("/nonexistent/persona.json")));
        assert_eq!(missing, PersonaConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"persona": "Student", "job_to_be_done": "Revise"}}"#).unwrap();
        let loaded = PersonaConfig::load_or_default(Some(file.path()));
        assert_eq!(loaded.persona, "Student");
        assert_eq!(loaded.job, "Revise");
    }

    #[test]
    fn test_pipeline_options_builders() {
        let options = PipelineOptions::new()
            .sequential()
            .with_global_summary(true)
            .with_rank(RankOptions::new().with_top_k(5))
            .with_domain_keywords(["fraud"]);
        assert!(!options.parallel);
        assert!(options.global_summary);
        assert_eq!(options.rank.top_k, 5);
        assert_eq!(options.domain_keywords, vec!["fraud".to_string()]);
    }
}
