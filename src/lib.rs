//! novel-quality - quality evaluation for long-form fiction
//!
//! Scores chapters section by section on readability, coherence, canon
//! consistency and genre fit, with optional budget-limited LLM scoring that
//! falls back to heuristics on any failure.
//!
//! ```rust,ignore
//! use novel_quality::scoring::{QualityScorer, ScorerConfig};
//! use novel_quality::reporters::generate_markdown_report;
//!
//! let scorer = QualityScorer::new(ScorerConfig::default());
//! let doc = scorer.evaluate_document("novel-1", &[(1, chapter_one)], "奇幻冒险", "中文");
//! println!("{}", generate_markdown_report(&doc, 70.0));
//! ```

pub mod ai;
pub mod cli;
pub mod config;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod telemetry;

pub use models::{ChapterQuality, Dimension, DocumentQuality, QualityScore, SectionQuality};
pub use reporters::QualityError;
pub use scoring::{QualityScorer, ScorerConfig};
