//! docsift CLI - PDF outline and persona relevance tool

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use docsift::relevance::{RankOptions, SectionOptions};
use docsift::render::write_json;
use docsift::summarize::{SummaryOptions, SummaryOrder};
use docsift::{Error, JsonFormat, PersonaConfig, Pipeline, PipelineOptions, ScoringWeights};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Build PDF outlines and rank sections for a reader persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a title and heading outline for every document in a directory
    Outline {
        /// Directory of input documents
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "DOCSIFT_OUTPUT", default_value = "output")]
        output: PathBuf,

        /// Minimum heading score
        #[arg(long, env = "DOCSIFT_HEADING_THRESHOLD", default_value = "0.5")]
        threshold: f32,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Rank the sections of every document for a persona and summarize them
    Analyze {
        /// Directory of input documents
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "DOCSIFT_OUTPUT", default_value = "output")]
        output: PathBuf,

        /// Persona/job configuration file (JSON)
        #[arg(short, long, value_name = "FILE", env = "DOCSIFT_PERSONA")]
        persona: Option<PathBuf>,

        /// Number of sections to keep
        #[arg(long, env = "DOCSIFT_TOP_K", default_value = "10")]
        top_k: usize,

        /// Discard sections scoring below this
        #[arg(long, env = "DOCSIFT_MIN_SCORE")]
        min_score: Option<f32>,

        /// Lines of body text following each heading
        #[arg(long, env = "DOCSIFT_WINDOW_LINES", default_value = "40")]
        window_lines: usize,

        /// Maximum body length in characters
        #[arg(long, env = "DOCSIFT_MAX_CHARS", default_value = "2000")]
        max_chars: usize,

        /// Summary sentences per section
        #[arg(long, env = "DOCSIFT_SUMMARY_SENTENCES", default_value = "2")]
        summary_sentences: usize,

        /// Keywords per section
        #[arg(long, env = "DOCSIFT_KEYWORDS", default_value = "5")]
        keywords: usize,

        /// Order of summary sentences
        #[arg(long, value_enum, default_value = "source")]
        summary_order: OrderArg,

        /// Add a one-paragraph digest of the keyword-matching sections
        #[arg(long)]
        global_summary: bool,

        /// Name of the report file
        #[arg(long, value_name = "NAME", default_value = "result.json")]
        output_file: String,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show per-line features and heading scores of one document
    Inspect {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show heading candidates
        #[arg(long)]
        headings: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    /// As they appear in the section
    Source,
    /// Highest scoring first
    Score,
}

impl From<OrderArg> for SummaryOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Source => SummaryOrder::Source,
            OrderArg::Score => SummaryOrder::Score,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            threshold,
            sequential,
            compact,
        } => {
            let options = PipelineOptions::new()
                .with_weights(ScoringWeights::new().with_threshold(threshold))
                .with_parallel(!sequential);
            cmd_outline(&input, &output, options, json_format(compact))
        }
        Commands::Analyze {
            input,
            output,
            persona,
            top_k,
            min_score,
            window_lines,
            max_chars,
            summary_sentences,
            keywords,
            summary_order,
            global_summary,
            output_file,
            sequential,
            compact,
        } => {
            let mut rank = RankOptions::new().with_top_k(top_k);
            if let Some(floor) = min_score {
                rank = rank.with_min_score(floor);
            }
            let options = PipelineOptions::new()
                .with_rank(rank)
                .with_sections(
                    SectionOptions::new()
                        .with_window_lines(window_lines)
                        .with_max_chars(max_chars),
                )
                .with_summary(
                    SummaryOptions::new()
                        .with_sentences(summary_sentences)
                        .with_keywords(keywords)
                        .with_order(summary_order.into()),
                )
                .with_global_summary(global_summary)
                .with_parallel(!sequential);
            let persona = PersonaConfig::load_or_default(persona.as_deref());
            cmd_analyze(
                &input,
                &output.join(output_file),
                &persona,
                options,
                json_format(compact),
            )
        }
        Commands::Inspect { input, headings } => cmd_inspect(&input, headings),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => {}
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::EmptyResult)) => {
            println!("{} {}", "Nothing written:".yellow().bold(), e);
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    options: PipelineOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(options);
    let total = pipeline.list_inputs(input, None)?.len();
    debug!("Outlining {} documents from {}", total, input.display());

    let pb = progress_bar(total);
    pb.set_message("Building outlines...");
    let result = pipeline.run_outline_with_progress(input, |_| pb.inc(1));
    pb.finish_and_clear();
    let documents = result?;

    let written = Pipeline::write_outlines(&documents, output, format)?;
    debug!("Wrote {} outline files to {}", written.len(), output.display());

    println!("{}", "Outlines:".green().bold());
    for (i, (doc, path)) in documents.iter().zip(&written).enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!(
            "  {} {} ({} headings) -> {}",
            branch.dimmed(),
            doc.title,
            doc.outline.total_items(),
            path.display()
        );
    }

    Ok(())
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    persona: &PersonaConfig,
    options: PipelineOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(options);
    let total = pipeline
        .list_inputs(input, persona.documents.as_deref())?
        .len();
    debug!(
        "Ranking sections of {} documents from {} with the {} lexicon keywords",
        total,
        input.display(),
        pipeline.lexicon().domain_keywords().len()
    );

    println!("{}: {}", "Persona".bold(), persona.persona);
    println!("{}: {}", "Job".bold(), persona.job);

    let pb = progress_bar(total);
    pb.set_message("Analyzing documents...");
    let result = pipeline.run_relevance_with_progress(input, persona, |_| pb.inc(1));
    pb.finish_and_clear();
    let report = result?;

    write_json(&report, output, format)?;

    println!("\n{}", "Top sections:".green().bold());
    for section in &report.extracted_sections {
        println!(
            "  {:>6.3}  {} {}",
            section.importance_rank,
            section.section_title,
            format!("({} p.{})", section.document, section.page).dimmed()
        );
    }
    println!("\n{} {}", "Saved to".green(), output.display());

    Ok(())
}

fn cmd_inspect(input: &Path, headings_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::default();
    let analysis = pipeline.analyze_file(input)?;
    debug!(
        "{}: {} lines, {} suppressed candidates",
        input.display(),
        analysis.lines.len(),
        analysis.suppressed.len()
    );

    println!("{}", "Document Analysis".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Title".bold(), analysis.document.title);
    println!("{}: {}", "Body size".bold(), analysis.document.body_size);
    println!("{}: {}", "Lines".bold(), analysis.lines.len());
    println!(
        "{}: {}",
        "Headings".bold(),
        analysis.document.outline.total_items()
    );
    println!();

    let levels: HashMap<usize, String> = analysis
        .headings
        .iter()
        .map(|h| (h.line_index, h.level.to_string()))
        .collect();
    let threshold = pipeline.options().weights.threshold;

    println!(
        "{}",
        format!("{:>4} {:>6} {:>6} {:<6} {:<3} TEXT", "PAGE", "SIZE", "SCORE", "FLAGS", "LVL").bold()
    );
    for line in &analysis.lines {
        let level = levels.get(&line.index);
        if headings_only && level.is_none() {
            continue;
        }
        let flags: String = [
            (line.bold, 'B'),
            (line.centered, 'C'),
            (line.underlined, 'U'),
            (line.all_caps, 'A'),
            (line.colored, 'K'),
        ]
        .iter()
        .map(|&(set, c)| if set { c } else { '.' })
        .collect();

        let row = format!(
            "{:>4} {:>6.1} {:>6.2} {:<6} {:<3} {}",
            line.page,
            line.font_size,
            line.score,
            flags,
            level.map(String::as_str).unwrap_or(""),
            line.text
        );
        if level.is_some() {
            println!("{}", row.green());
        } else if line.score >= threshold {
            println!("{}", row.yellow());
        } else {
            println!("{}", row);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline and persona relevance tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docsift".dimmed());
    println!("License: MIT");
}
