//! Per-document analysis and the two batch modes.
//!
//! Outline mode runs feature extraction, heading scoring and outline
//! building for every document in a directory. Relevance mode continues with
//! section extraction, ranking against a persona query and summarization,
//! producing one aggregate report.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::{FeatureExtractor, HeadingScorer, Lexicon, OutlineBuilder};
use crate::config::{PersonaConfig, PipelineOptions};
use crate::error::{Error, Result};
use crate::model::{Document, Heading, LineFeature, Query, RelevanceReport, SpanDocument};
use crate::relevance::{extract_sections, RelevanceRanker, SimilarityBackend, TfIdfBackend};
use crate::render::{assemble_report, global_summary, processing_timestamp, write_json, JsonFormat};
use crate::source::SourceRegistry;
use crate::summarize::Summarizer;

/// Everything learned about one document up to the outline.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Title and outline
    pub document: Document,
    /// Scored line features in document order
    pub lines: Vec<LineFeature>,
    /// Leveled headings in (page, position) order
    pub headings: Vec<Heading>,
    /// Line indices of consumed or discarded heading candidates
    pub suppressed: HashSet<usize>,
    /// The title line, when it was taken out of the outline
    pub title_heading: Option<Heading>,
}

impl Analysis {
    /// Headings that open a relevance section, in (page, position) order.
    ///
    /// This is the outline's headings plus the title line, so the content
    /// under a typographic title still takes part in ranking.
    pub fn section_headings(&self) -> Vec<Heading> {
        let mut headings = self.headings.clone();
        if let Some(title) = &self.title_heading {
            headings.push(title.clone());
            headings.sort_by(|a, b| {
                a.page
                    .cmp(&b.page)
                    .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
                    .then(a.line_index.cmp(&b.line_index))
            });
        }
        headings
    }
}

/// Runs feature extraction, scoring and outline building on one document.
pub struct Analyzer {
    extractor: FeatureExtractor,
    scorer: HeadingScorer,
    builder: OutlineBuilder,
}

impl Analyzer {
    /// Create an analyzer sharing `lexicon`.
    pub fn new(lexicon: Arc<Lexicon>, options: &PipelineOptions) -> Self {
        Self {
            extractor: FeatureExtractor::new(lexicon.clone(), options.extract.clone()),
            scorer: HeadingScorer::new(lexicon.clone(), options.weights.clone()),
            builder: OutlineBuilder::new(lexicon, options.outline.clone()),
        }
    }

    /// Analyze a span document named `name`.
    pub fn analyze(&self, name: &str, doc: &SpanDocument) -> Analysis {
        let mut lines = self.extractor.extract(doc);
        let body_size = self.extractor.body_size(&lines);
        let candidates = self.scorer.candidates(&mut lines, body_size);
        debug!("{}: {} heading candidates", name, candidates.len());

        let build = self.builder.build(candidates, doc.title.as_deref(), name);

        let mut document = Document::new(name);
        document.title = build.title;
        document.body_size = body_size;
        document.outline = build.outline;

        Analysis {
            document,
            lines,
            headings: build.headings,
            suppressed: build.suppressed,
            title_heading: build.title_heading,
        }
    }
}

/// Batch driver over a directory of documents.
///
/// # Example
///
/// ```no_run
/// use docsift::{Pipeline, PipelineOptions, PersonaConfig};
/// use std::path::Path;
///
/// let pipeline = Pipeline::new(PipelineOptions::default());
/// let persona = PersonaConfig::load_or_default(Some(Path::new("persona.json")));
/// let report = pipeline.run_relevance(Path::new("input"), &persona)?;
/// println!("{} sections", report.extracted_sections.len());
/// # Ok::<(), docsift::Error>(())
/// ```
pub struct Pipeline {
    registry: SourceRegistry,
    lexicon: Arc<Lexicon>,
    backend: Arc<dyn SimilarityBackend>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline with the default sources and TF-IDF similarity.
    pub fn new(options: PipelineOptions) -> Self {
        let lexicon =
            Arc::new(Lexicon::new().with_domain_keywords(options.domain_keywords.iter().cloned()));
        Self {
            registry: SourceRegistry::with_defaults(),
            backend: Arc::new(TfIdfBackend::new(lexicon.clone())),
            lexicon,
            options,
        }
    }

    /// Replace the source registry.
    pub fn with_registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the similarity backend.
    pub fn with_backend(mut self, backend: Arc<dyn SimilarityBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Pipeline options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Shared lexicon.
    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Source registry.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// An analyzer configured like this pipeline.
    pub fn analyzer(&self) -> Analyzer {
        Analyzer::new(self.lexicon.clone(), &self.options)
    }

    /// Supported files in `dir`, sorted by file name.
    ///
    /// With `only`, files whose names are not listed are skipped. An
    /// unreadable directory is the one fatal error of a run.
    pub fn list_inputs(&self, dir: &Path, only: Option<&[String]>) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|source| Error::InputDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && self.registry.supports_path(path))
            .filter(|path| match only {
                Some(names) => names.iter().any(|n| Some(n.as_str()) == file_name(path)),
                None => true,
            })
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Load and analyze one file.
    pub fn analyze_file(&self, path: &Path) -> Result<Analysis> {
        let doc = self.registry.load(path)?;
        let name = file_name(path).unwrap_or_default();
        Ok(self.analyzer().analyze(name, &doc))
    }

    /// Analyze files, skipping the ones that fail to load.
    ///
    /// `progress` is called once per file after it is processed.
    pub fn analyze_files<F>(&self, paths: &[PathBuf], progress: F) -> Vec<Analysis>
    where
        F: Fn(&Path) + Sync,
    {
        let analyzer = self.analyzer();
        let analyze = |path: &PathBuf| -> Option<Analysis> {
            let result = self.registry.load(path).map(|doc| {
                let name = file_name(path).unwrap_or_default();
                analyzer.analyze(name, &doc)
            });
            progress(path);
            match result {
                Ok(analysis) => {
                    info!(
                        "Analyzed {}: {} headings",
                        path.display(),
                        analysis.headings.len()
                    );
                    Some(analysis)
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        };

        if self.options.parallel {
            paths.par_iter().filter_map(analyze).collect()
        } else {
            paths.iter().filter_map(analyze).collect()
        }
    }

    /// Outline mode: one titled outline per document in `dir`.
    ///
    /// Returns [`Error::EmptyResult`] when no document has any heading.
    pub fn run_outline(&self, dir: &Path) -> Result<Vec<Document>> {
        self.run_outline_with_progress(dir, |_| {})
    }

    /// Outline mode with a per-file progress callback.
    pub fn run_outline_with_progress<F>(&self, dir: &Path, progress: F) -> Result<Vec<Document>>
    where
        F: Fn(&Path) + Sync,
    {
        let paths = self.list_inputs(dir, None)?;
        let documents: Vec<Document> = self
            .analyze_files(&paths, progress)
            .into_iter()
            .map(|a| a.document)
            .collect();

        if documents.iter().all(Document::is_empty) {
            return Err(Error::EmptyResult);
        }
        Ok(documents)
    }

    /// Write each outline to `<out_dir>/<stem>.json`.
    pub fn write_outlines(
        documents: &[Document],
        out_dir: &Path,
        format: JsonFormat,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(out_dir)?;
        documents
            .iter()
            .map(|doc| {
                let stem = Path::new(&doc.name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "document".to_string());
                let path = out_dir.join(format!("{}.json", stem));
                write_json(doc, &path, format)?;
                Ok(path)
            })
            .collect()
    }

    /// Relevance mode: rank the sections of every document in `dir` for a persona.
    ///
    /// Returns [`Error::EmptyResult`] when no document has any section.
    pub fn run_relevance(&self, dir: &Path, persona: &PersonaConfig) -> Result<RelevanceReport> {
        self.run_relevance_with_progress(dir, persona, |_| {})
    }

    /// Relevance mode with a per-file progress callback.
    pub fn run_relevance_with_progress<F>(
        &self,
        dir: &Path,
        persona: &PersonaConfig,
        progress: F,
    ) -> Result<RelevanceReport>
    where
        F: Fn(&Path) + Sync,
    {
        let paths = self.list_inputs(dir, persona.documents.as_deref())?;
        let analyses = self.analyze_files(&paths, progress);
        self.relevance_from_analyses(&analyses, &persona.query())
    }

    /// Rank, summarize and assemble the report from analyzed documents.
    pub fn relevance_from_analyses(
        &self,
        analyses: &[Analysis],
        query: &Query,
    ) -> Result<RelevanceReport> {
        let mut sections = Vec::new();
        for analysis in analyses {
            sections.extend(extract_sections(
                &analysis.document.name,
                &analysis.lines,
                &analysis.section_headings(),
                &analysis.suppressed,
                &self.options.sections,
            ));
        }
        if sections.is_empty() {
            return Err(Error::EmptyResult);
        }
        for (order, section) in sections.iter_mut().enumerate() {
            section.order = order;
        }
        debug!("Ranking {} sections", sections.len());

        let ranker = RelevanceRanker::new(
            self.backend.clone(),
            self.lexicon.clone(),
            self.options.rank.clone(),
        );
        let summarizer = Summarizer::new(self.lexicon.clone(), self.options.summary.clone());
        let ranked: Vec<_> = ranker
            .rank(query, sections)
            .into_iter()
            .map(|s| summarizer.enrich(s))
            .collect();

        let input_documents = analyses.iter().map(|a| a.document.name.clone()).collect();
        let mut report = assemble_report(input_documents, query, &ranked, processing_timestamp());
        if self.options.global_summary {
            report.global_summary = Some(global_summary(query, &ranked));
        }
        Ok(report)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
