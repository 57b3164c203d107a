//! Report command - re-render a saved JSON report

use super::emit;
use crate::config::UserConfig;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the report command
pub(crate) fn run(
    input: &Path,
    format: OutputFormat,
    threshold: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let doc = reporters::load_report(input)
        .with_context(|| format!("Failed to load report {}", input.display()))?;

    let threshold = match threshold {
        Some(t) => t,
        None => UserConfig::load()?.scorer_config().low_score_threshold,
    };

    let rendered = reporters::report(&doc, format, threshold)?;
    emit(&rendered, output)
}
