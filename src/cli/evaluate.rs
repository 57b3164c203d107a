//! Evaluate command - score a novel and render the report

use super::{chapters, emit};
use crate::config::UserConfig;
use crate::models::{DocumentQuality, DEFAULT_LANGUAGE};
use crate::reporters::{self, OutputFormat};
use crate::scoring::{QualityScorer, ScorerConfig};
use crate::telemetry;
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use tracing::info;

pub(crate) struct EvaluateArgs {
    pub path: PathBuf,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub doc_id: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub max_section_length: Option<usize>,
    pub llm: bool,
    pub budget: Option<u32>,
}

/// Run the evaluate command
pub(crate) fn run(args: EvaluateArgs) -> Result<()> {
    let user_config = UserConfig::load().context("Failed to load user config")?;
    let config = scorer_config(&user_config, &args);

    if args.llm && !user_config.has_api_key() {
        eprintln!(
            "{} --llm given but no API key is configured; scoring heuristically",
            style("!").yellow()
        );
    }

    let chapters = chapters::load_chapters(&args.path)?;
    if chapters.is_empty() {
        anyhow::bail!("No chapters found in {}", args.path.display());
    }

    let doc_id = args.doc_id.clone().unwrap_or_else(|| default_doc_id(&args.path));
    let genre = args
        .genre
        .clone()
        .or_else(|| user_config.evaluation.genre.clone())
        .unwrap_or_default();
    let language = args
        .language
        .clone()
        .or_else(|| user_config.evaluation.language.clone())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    info!(
        "Evaluating {} chapters from {}",
        chapters.len(),
        args.path.display()
    );
    let threshold = config.low_score_threshold;
    let scorer = QualityScorer::new(config);
    let doc = scorer.evaluate_document(&doc_id, &chapters, &genre, &language);

    flag_low_sections(&doc, threshold);
    if let Some(budget) = scorer.budget().filter(|_| scorer.remote_enabled()) {
        info!("LLM evaluations used: {}/{}", budget.used(), budget.limit());
    }

    let rendered = reporters::report(&doc, args.format, threshold)?;
    emit(&rendered, args.output.as_deref())
}

/// Command-line flags take priority over the user config
fn scorer_config(user_config: &UserConfig, args: &EvaluateArgs) -> ScorerConfig {
    let mut config = user_config.scorer_config();
    if args.llm {
        config.use_llm_evaluation = true;
    }
    if let Some(budget) = args.budget {
        config.llm_budget_limit = budget;
    }
    if let Some(max) = args.max_section_length {
        config.max_section_length = max;
    }
    if let Some(threshold) = args.threshold {
        config.low_score_threshold = threshold;
    }
    config
}

fn flag_low_sections(doc: &DocumentQuality, threshold: f64) {
    for (chapter_idx, section) in doc.low_scoring_sections(threshold) {
        telemetry::log_rewrite_event(
            &doc.doc_id,
            chapter_idx,
            section.idx,
            section.score.overall,
            "flagged",
        );
    }
}

/// File stem for files, directory name for directories
fn default_doc_id(path: &Path) -> String {
    let name = if path.is_dir() {
        path.file_name()
    } else {
        path.file_stem()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> EvaluateArgs {
        EvaluateArgs {
            path: PathBuf::from("novel.txt"),
            genre: None,
            language: None,
            doc_id: None,
            format: OutputFormat::Text,
            output: None,
            threshold: None,
            max_section_length: None,
            llm: false,
            budget: None,
        }
    }

    #[test]
    fn test_flags_override_user_config() {
        let mut user = UserConfig::default();
        user.evaluation.llm_budget = Some(4);
        user.evaluation.max_section_length = Some(300);

        let config = scorer_config(&user, &args());
        assert!(!config.use_llm_evaluation);
        assert_eq!(config.llm_budget_limit, 4);
        assert_eq!(config.max_section_length, 300);

        let flagged = EvaluateArgs {
            llm: true,
            budget: Some(1),
            threshold: Some(55.0),
            ..args()
        };
        let config = scorer_config(&user, &flagged);
        assert!(config.use_llm_evaluation);
        assert_eq!(config.llm_budget_limit, 1);
        assert_eq!(config.low_score_threshold, 55.0);
        assert_eq!(config.max_section_length, 300);
    }

    #[test]
    fn test_default_doc_id() {
        assert_eq!(default_doc_id(Path::new("books/dragon.txt")), "dragon");
        let dir = tempfile::tempdir().unwrap();
        let chapters = dir.path().join("saga");
        std::fs::create_dir(&chapters).unwrap();
        assert_eq!(default_doc_id(&chapters), "saga");
    }
}
