//! CLI command definitions and handlers

mod chapters;
mod evaluate;
mod init;
mod report;

pub use chapters::{load_chapters, split_chapters};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a section length (at least 1 character)
fn parse_section_length(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("section length must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// Parse a score threshold in [0, 100]
fn parse_threshold(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if (0.0..=100.0).contains(&t) {
        Ok(t)
    } else {
        Err("threshold must be between 0 and 100".to_string())
    }
}

/// novel-quality - Quality evaluation for long-form fiction
#[derive(Parser, Debug)]
#[command(name = "novel-quality")]
#[command(
    version,
    about = "Score novel chapters on readability, coherence, canon consistency and genre fit",
    long_about = "novel-quality splits chapters into sections, scores each section with \
heuristic text metrics (optionally with an LLM, within a fixed budget) and rolls the \
scores up into chapter and document reports.",
    after_help = "\
Examples:
  novel-quality evaluate chapters/ --genre 奇幻冒险        Directory of .txt chapters
  novel-quality evaluate novel.txt --format markdown -o report.md
  novel-quality evaluate novel.txt --format json -o report.json --llm --budget 5
  novel-quality report report.json --threshold 60         Re-render a saved report"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a novel: a directory of .txt chapters or one file with chapter headings
    Evaluate {
        /// Chapter directory or novel file
        path: PathBuf,

        /// Genre used for genre-fit scoring (e.g. 奇幻冒险, 言情)
        #[arg(long, short = 'g')]
        genre: Option<String>,

        /// Language tag stored in the report
        #[arg(long)]
        language: Option<String>,

        /// Document id (default: file or directory name)
        #[arg(long)]
        doc_id: Option<String>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Sections scoring below this are listed as low-scoring
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Target section length in characters
        #[arg(long, value_parser = parse_section_length)]
        max_section_length: Option<usize>,

        /// Score with the LLM while budget remains (needs an API key)
        #[arg(long)]
        llm: bool,

        /// Maximum successful LLM evaluations
        #[arg(long)]
        budget: Option<u32>,
    },

    /// Re-render a saved JSON report
    Report {
        /// Report written by `evaluate --format json`
        input: PathBuf,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "markdown", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Sections scoring below this are listed as low-scoring
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Create ~/.config/novel-quality/config.toml with example settings
    Init,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            path,
            genre,
            language,
            doc_id,
            format,
            output,
            threshold,
            max_section_length,
            llm,
            budget,
        } => evaluate::run(evaluate::EvaluateArgs {
            path,
            genre,
            language,
            doc_id,
            format: format.parse()?,
            output,
            threshold,
            max_section_length,
            llm,
            budget,
        }),

        Commands::Report {
            input,
            format,
            threshold,
            output,
        } => report::run(&input, format.parse()?, threshold, output.as_deref()),

        Commands::Init => init::run(),
    }
}

/// Write rendered output to `output`, or stdout when none is given
fn emit(rendered: &str, output: Option<&std::path::Path>) -> Result<()> {
    use anyhow::Context;
    use console::style;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
