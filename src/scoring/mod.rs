//! Novel Quality Scoring
//!
//! Scores prose on four dimensions, each in `[0, 100]`:
//!
//! ```text
//! Overall = Readability × 0.3 + Coherence × 0.3 + Canon × 0.2 + GenreFit × 0.2
//! ```
//!
//! - **Readability**: sentence length and its variance, paragraphing, dialogue balance
//! - **Coherence**: transition words, sentence-length extremity, token repetition
//! - **Canon consistency**: names carried over from context, contradiction density
//! - **Genre fit**: keyword presence for known genres plus genre-specific bonuses
//!
//! Chapters are split into sections (see [`splitter`]), each section is scored
//! with everything before it as context, and scores roll up section → chapter
//! → document as unweighted means.

pub mod genre;
pub mod metrics;
mod scorer;
pub mod splitter;

pub use scorer::{QualityScorer, ScorerConfig};
pub use splitter::{split, split_spans, SectionSpan};
