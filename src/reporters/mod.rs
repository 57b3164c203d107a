//! Output reporters for quality evaluation results
//!
//! Supports multiple output formats:
//! - `text` - Terminal summary with colors
//! - `json` - Full result tree, loadable again with [`json::load_report`]
//! - `markdown` - Chapter table, low-scoring sections and improvement advice

pub mod json;
pub mod markdown;
mod text;

pub use json::{from_dict, load_report, save_report, to_dict, QualityError};
pub use markdown::generate_markdown_report;

use crate::models::DocumentQuality;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a document result in the specified format.
/// `threshold` marks the sections listed as low-scoring.
pub fn report(doc: &DocumentQuality, format: OutputFormat, threshold: f64) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(doc, threshold),
        OutputFormat::Json => json::render(doc),
        OutputFormat::Markdown => markdown::render(doc, threshold),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{ChapterQuality, QualityScore, SectionQuality};

    fn score(overall: f64, dims: [f64; 4], suggestion: &str, word_count: usize) -> QualityScore {
        QualityScore {
            overall,
            readability: dims[0],
            coherence: dims[1],
            canon_consistency: dims[2],
            genre_fit: dims[3],
            rewrite_suggestion: suggestion.into(),
            word_count,
            processing_time: 0.25,
        }
    }

    /// One chapter, two sections; section 2 scores 40 with coherence weakest
    pub(crate) fn test_document() -> DocumentQuality {
        let sections = vec![
            SectionQuality {
                idx: 1,
                score: score(80.0, [80.0; 4], "调整句式结构，增加段落层次", 6000),
                text: "艾琳站在山顶。".into(),
                start_pos: 0,
                end_pos: 7,
            },
            SectionQuality {
                idx: 2,
                score: score(40.0, [50.0, 20.0, 60.0, 40.0], "加强逻辑衔接，补充过渡词句", 6345),
                text: "精灵拔出了剑。".into(),
                start_pos: 9,
                end_pos: 16,
            },
        ];
        DocumentQuality {
            doc_id: "novel-1".into(),
            chapters: vec![ChapterQuality {
                idx: 1,
                score: score(60.0, [65.0, 50.0, 70.0, 60.0], "加强逻辑衔接，补充过渡词句", 12345),
                sections,
                text: "艾琳站在山顶。\n\n精灵拔出了剑。".into(),
            }],
            overall_score: 60.0,
            total_word_count: 12345,
            genre: "奇幻冒险".into(),
            language: "中文".into(),
            created_at: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert!(OutputFormat::from_str("sarif").is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_report_dispatch() {
        let doc = test_document();
        let json = report(&doc, OutputFormat::Json, 70.0).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let md = report(&doc, OutputFormat::Markdown, 70.0).unwrap();
        assert!(md.starts_with("# Novel Quality Report"));
    }
}
