//! Quality scorer: section → chapter → document aggregation
//!
//! Evaluation is strictly sequential. Each section is scored with the text of
//! the sections before it (plus the document context handed in by the caller),
//! and each chapter with a rolling excerpt of the chapters before it.

use super::{metrics, splitter};
use crate::ai::prompts::truncate_chars;
use crate::ai::{LlmBudget, LlmEvaluator, RemoteFailure};
use crate::models::{ChapterQuality, Dimension, DocumentQuality, QualityScore, SectionQuality};
use crate::telemetry;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Runtime configuration of a [`QualityScorer`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    pub use_llm_evaluation: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    /// Maximum successful remote evaluations. Kept small: heuristic-first.
    pub llm_budget_limit: u32,
    pub max_section_length: usize,
    /// Sections scoring below this are counted as rewrite candidates
    pub low_score_threshold: f64,
    /// Approximate cap (characters) of the cross-chapter context
    pub context_limit: usize,
    /// Characters of each chapter kept in the cross-chapter context
    pub excerpt_length: usize,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            use_llm_evaluation: false,
            api_key: None,
            model: crate::ai::AiConfig::default().model,
            base_url: None,
            llm_budget_limit: 10,
            max_section_length: 1000,
            low_score_threshold: 70.0,
            context_limit: 2000,
            excerpt_length: 500,
        }
    }
}

pub struct QualityScorer {
    config: ScorerConfig,
    remote: Option<LlmEvaluator>,
}

impl QualityScorer {
    /// Build a scorer. A remote evaluator is set up when an API key is configured;
    /// it is used only while `use_llm_evaluation` (or a per-call override) is on.
    pub fn new(config: ScorerConfig) -> Self {
        let budget = LlmBudget::shared(config.llm_budget_limit);
        Self::with_budget(config, budget)
    }

    /// Like [`QualityScorer::new`], drawing remote evaluations from a shared budget
    pub fn with_budget(config: ScorerConfig, budget: Arc<LlmBudget>) -> Self {
        let remote = remote_from_config(&config, budget);
        Self { config, remote }
    }

    /// Use `evaluator` for remote scoring regardless of the configured API key
    pub fn with_evaluator(config: ScorerConfig, evaluator: LlmEvaluator) -> Self {
        Self {
            config,
            remote: Some(evaluator),
        }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Budget of the remote evaluator, if there is one
    pub fn budget(&self) -> Option<&Arc<LlmBudget>> {
        self.remote.as_ref().map(|r| r.budget())
    }

    pub fn remote_enabled(&self) -> bool {
        self.config.use_llm_evaluation && self.remote.is_some()
    }

    /// Evaluate one unit of text. Empty text scores all zeros.
    /// `use_llm` overrides the configured `use_llm_evaluation` for this call.
    pub fn evaluate_text(
        &self,
        text: &str,
        context: Option<&str>,
        genre: &str,
        use_llm: Option<bool>,
    ) -> QualityScore {
        self.evaluate_unit(text, context, genre, use_llm, "section")
    }

    /// Score with the heuristic metrics only
    pub fn evaluate_heuristic(&self, text: &str, context: Option<&str>, genre: &str) -> QualityScore {
        if text.is_empty() {
            return QualityScore::zero();
        }
        let start = Instant::now();

        let mut score = QualityScore::from_dimensions(
            metrics::readability(text),
            metrics::coherence(text),
            metrics::canon_consistency(text, context),
            metrics::genre_fit(text, genre),
        );
        score.word_count = text.chars().count();
        score.processing_time = start.elapsed().as_secs_f64();
        score
    }

    /// Score remotely without falling back
    pub fn evaluate_remote(
        &self,
        text: &str,
        context: Option<&str>,
        genre: &str,
        section_type: &str,
    ) -> Result<QualityScore, RemoteFailure> {
        let remote = self.remote.as_ref().ok_or_else(|| {
            RemoteFailure::Unavailable("no API key or remote evaluator configured".to_string())
        })?;
        remote.evaluate(text, context, genre, section_type)
    }

    fn evaluate_unit(
        &self,
        text: &str,
        context: Option<&str>,
        genre: &str,
        use_llm: Option<bool>,
        section_type: &str,
    ) -> QualityScore {
        if text.is_empty() {
            return QualityScore::zero();
        }

        let use_llm = use_llm.unwrap_or(self.config.use_llm_evaluation);
        if !use_llm || self.remote.is_none() {
            return self.evaluate_heuristic(text, context, genre);
        }

        match self.evaluate_remote(text, context, genre, section_type) {
            Ok(score) => score,
            Err(failure) => {
                match &failure {
                    RemoteFailure::BudgetExhausted { .. } => {
                        warn!("{failure}, falling back to heuristic")
                    }
                    _ => error!("LLM evaluation failed: {failure}, falling back to heuristic"),
                }
                self.evaluate_heuristic(text, context, genre)
            }
        }
    }

    /// Split a chapter into sections, score them in order and average the result.
    /// A chapter that yields no sections is scored directly as one unit.
    pub fn evaluate_chapter(
        &self,
        chapter_text: &str,
        chapter_idx: u32,
        context: Option<&str>,
        genre: &str,
    ) -> ChapterQuality {
        let spans = splitter::split_spans(chapter_text, self.config.max_section_length);
        let mut sections = Vec::with_capacity(spans.len());
        let mut running = context.unwrap_or_default().to_string();

        for (i, span) in spans.into_iter().enumerate() {
            let section_context = (!running.is_empty()).then_some(running.as_str());
            let score = self.evaluate_unit(&span.text, section_context, genre, None, "section");
            debug!(
                "Chapter {} section {}: {:.1} ({} chars)",
                chapter_idx,
                i + 1,
                score.overall,
                score.word_count
            );

            if !running.is_empty() {
                running.push_str("\n\n");
            }
            running.push_str(&span.text);

            sections.push(SectionQuality {
                idx: i as u32 + 1,
                score,
                text: span.text,
                start_pos: span.start,
                end_pos: span.end,
            });
        }

        let score = if sections.is_empty() {
            self.evaluate_unit(chapter_text, context, genre, None, "chapter")
        } else {
            aggregate_sections(&sections)
        };

        ChapterQuality {
            idx: chapter_idx,
            score,
            sections,
            text: chapter_text.to_string(),
        }
    }

    /// Evaluate chapters in the given order. The document score is the
    /// unweighted mean of chapter scores.
    pub fn evaluate_document<S: AsRef<str>>(
        &self,
        doc_id: &str,
        chapters: &[(u32, S)],
        genre: &str,
        language: &str,
    ) -> DocumentQuality {
        let start = Instant::now();
        info!("Starting quality evaluation for document: {doc_id}");

        let mut context =
            RollingContext::new(self.config.context_limit, self.config.excerpt_length);
        let mut chapter_qualities = Vec::with_capacity(chapters.len());

        for (chapter_idx, chapter_text) in chapters {
            let chapter_text = chapter_text.as_ref();
            let chapter_context = context.text();
            let chapter =
                self.evaluate_chapter(chapter_text, *chapter_idx, chapter_context.as_deref(), genre);
            context.push(*chapter_idx, chapter_text);
            chapter_qualities.push(chapter);
        }

        let total_word_count: usize = chapter_qualities.iter().map(|c| c.score.word_count).sum();
        let overall_score = if chapter_qualities.is_empty() {
            0.0
        } else {
            chapter_qualities.iter().map(|c| c.score.overall).sum::<f64>()
                / chapter_qualities.len() as f64
        };

        let doc = DocumentQuality {
            doc_id: doc_id.to_string(),
            chapters: chapter_qualities,
            overall_score,
            total_word_count,
            genre: genre.to_string(),
            language: language.to_string(),
            created_at: chrono::Local::now().to_rfc3339(),
        };

        let rewrites = doc.low_scoring_sections(self.config.low_score_threshold).len();
        telemetry::log_quality_metrics(
            doc_id,
            overall_score,
            total_word_count,
            start.elapsed().as_secs_f64(),
            rewrites,
        );
        info!(
            "Quality evaluation completed for {}: {:.1}/100, {} chapters, {} words",
            doc_id,
            overall_score,
            doc.chapters.len(),
            total_word_count
        );

        doc
    }
}

#[cfg(feature = "remote")]
fn remote_from_config(config: &ScorerConfig, budget: Arc<LlmBudget>) -> Option<LlmEvaluator> {
    use crate::ai::{AiClient, AiConfig};

    let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty())?;
    let ai_config = AiConfig {
        model: config.model.clone(),
        base_url: config.base_url.clone(),
        ..Default::default()
    };
    Some(LlmEvaluator::new(AiClient::new(ai_config, api_key), budget))
}

#[cfg(not(feature = "remote"))]
fn remote_from_config(config: &ScorerConfig, _budget: Arc<LlmBudget>) -> Option<LlmEvaluator> {
    if config.use_llm_evaluation {
        warn!("Built without the `remote` feature, all evaluation is heuristic");
    }
    None
}

/// Chapter score from its sections: dimension means, summed provenance
pub(crate) fn aggregate_sections(sections: &[SectionQuality]) -> QualityScore {
    if sections.is_empty() {
        return QualityScore::zero();
    }
    let n = sections.len() as f64;
    let mean = |f: fn(&QualityScore) -> f64| sections.iter().map(|s| f(&s.score)).sum::<f64>() / n;

    let mut score = QualityScore {
        overall: mean(|s| s.overall),
        readability: mean(|s| s.readability),
        coherence: mean(|s| s.coherence),
        canon_consistency: mean(|s| s.canon_consistency),
        genre_fit: mean(|s| s.genre_fit),
        word_count: sections.iter().map(|s| s.score.word_count).sum(),
        processing_time: sections.iter().map(|s| s.score.processing_time).sum(),
        ..Default::default()
    };
    score.rewrite_suggestion = Dimension::weakest(&score).rewrite_suggestion().to_string();
    score
}

/// Cross-chapter context: excerpts of recent chapters, oldest dropped first
struct RollingContext {
    excerpts: VecDeque<(String, usize)>,
    chars: usize,
    limit: usize,
    excerpt_length: usize,
}

impl RollingContext {
    fn new(limit: usize, excerpt_length: usize) -> Self {
        Self {
            excerpts: VecDeque::new(),
            chars: 0,
            limit,
            excerpt_length,
        }
    }

    fn push(&mut self, chapter_idx: u32, chapter_text: &str) {
        let excerpt = format!(
            "第{}章: {}...",
            chapter_idx,
            truncate_chars(chapter_text, self.excerpt_length)
        );
        // +2 for the blank line joining excerpts
        let len = excerpt.chars().count() + 2;
        self.chars += len;
        self.excerpts.push_back((excerpt, len));

        // The newest excerpt is always kept
        while self.chars > self.limit && self.excerpts.len() > 1 {
            if let Some((_, dropped)) = self.excerpts.pop_front() {
                self.chars -= dropped;
            }
        }
    }

    fn text(&self) -> Option<String> {
        if self.excerpts.is_empty() {
            return None;
        }
        Some(
            self.excerpts
                .iter()
                .map(|(e, _)| e.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiError, AiResult, ChatTransport, Message};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FANTASY: &str = "奇幻冒险";

    fn chapter_text() -> String {
        [
            "艾琳站在山顶，望着远方的城堡。她知道，这次冒险将改变一切。",
            "「我们必须在天黑前赶到。」她对身边的精灵说道。精灵点了点头，然后拔出了剑。",
            "然而，山路比想象中更加崎岖。他们走了很久，终于看到了城门。",
        ]
        .join("\n\n")
    }

    fn scorer(max_section_length: usize) -> QualityScorer {
        QualityScorer::new(ScorerConfig {
            max_section_length,
            ..Default::default()
        })
    }

    struct AlwaysFails {
        calls: Arc<AtomicUsize>,
    }

    impl ChatTransport for AlwaysFails {
        fn complete(&self, _messages: &[Message]) -> AiResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AiError::ApiError {
                status: 0,
                message: "unreachable".into(),
            })
        }
    }

    fn assert_same_scores(a: &QualityScore, b: &QualityScore) {
        assert_eq!(a.overall, b.overall);
        assert_eq!(a.readability, b.readability);
        assert_eq!(a.coherence, b.coherence);
        assert_eq!(a.canon_consistency, b.canon_consistency);
        assert_eq!(a.genre_fit, b.genre_fit);
        assert_eq!(a.rewrite_suggestion, b.rewrite_suggestion);
        assert_eq!(a.word_count, b.word_count);
    }

    #[test]
    fn test_empty_text_is_all_zero() {
        let score = scorer(1000).evaluate_text("", None, FANTASY, None);
        assert_eq!(score, QualityScore::zero());
    }

    #[test]
    fn test_heuristic_weight_law() {
        let score = scorer(1000).evaluate_text(&chapter_text(), Some("艾琳"), FANTASY, None);
        let expected = QualityScore::weighted_overall(
            score.readability,
            score.coherence,
            score.canon_consistency,
            score.genre_fit,
        );
        assert!((score.overall - expected).abs() < 1e-9);
        assert!(!score.rewrite_suggestion.is_empty());
        assert_eq!(score.word_count, chapter_text().chars().count());
    }

    #[test]
    fn test_no_key_means_heuristic_even_when_enabled() {
        let scorer = QualityScorer::new(ScorerConfig {
            use_llm_evaluation: true,
            ..Default::default()
        });
        assert!(!scorer.remote_enabled());
        assert!(scorer.budget().is_none());
        let text = chapter_text();
        assert_same_scores(
            &scorer.evaluate_text(&text, None, FANTASY, None),
            &scorer.evaluate_heuristic(&text, None, FANTASY),
        );
        assert!(matches!(
            scorer.evaluate_remote(&text, None, FANTASY, "section"),
            Err(RemoteFailure::Unavailable(_))
        ));
    }

    #[test]
    fn test_remote_failure_falls_back() {
        let calls = Arc::new(AtomicUsize::new(0));
        let evaluator = LlmEvaluator::new(
            AlwaysFails {
                calls: Arc::clone(&calls),
            },
            LlmBudget::shared(5),
        );
        let scorer = QualityScorer::with_evaluator(ScorerConfig::default(), evaluator);
        let text = chapter_text();

        let score = scorer.evaluate_text(&text, None, FANTASY, Some(true));
        assert_same_scores(&score, &scorer.evaluate_heuristic(&text, None, FANTASY));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(scorer.budget().unwrap().used(), 0);

        // Without the override the configured flag (off) wins
        scorer.evaluate_text(&text, None, FANTASY, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_chapter_aggregates_sections() {
        let chapter = scorer(40).evaluate_chapter(&chapter_text(), 7, None, FANTASY);
        assert_eq!(chapter.idx, 7);
        assert!(chapter.sections.len() > 1);

        let n = chapter.sections.len() as f64;
        let mean_overall = chapter.sections.iter().map(|s| s.score.overall).sum::<f64>() / n;
        let words: usize = chapter.sections.iter().map(|s| s.score.word_count).sum();
        assert!((chapter.score.overall - mean_overall).abs() < 1e-9);
        assert_eq!(chapter.score.word_count, words);

        for (i, section) in chapter.sections.iter().enumerate() {
            assert_eq!(section.idx as usize, i + 1);
            assert!(section.end_pos <= chapter.text.chars().count());
            assert!(section.start_pos < section.end_pos);
        }
    }

    #[test]
    fn test_sections_see_prior_sections_as_context() {
        // Context names that never reappear are penalized only when context exists:
        // the first section has none, later sections carry earlier ones.
        let text = "张三走进房间。\n\nabc def ghi.";
        let chapter = scorer(8).evaluate_chapter(text, 1, None, "");
        assert_eq!(chapter.sections.len(), 2);
        assert_eq!(chapter.sections[0].score.canon_consistency, 70.0);
        assert_eq!(chapter.sections[1].score.canon_consistency, 50.0);
    }

    #[test]
    fn test_blank_chapter_is_scored_directly() {
        let chapter = scorer(1000).evaluate_chapter("   ", 2, None, "");
        assert!(chapter.sections.is_empty());
        assert_eq!(chapter.score.word_count, 3);
    }

    #[test]
    fn test_document_mean_of_chapters() {
        let long = chapter_text();
        let short = "平凡的一天。".to_string();
        let chapters = vec![(1, long), (2, short), (5, String::new())];
        let doc = scorer(1000).evaluate_document("doc-1", &chapters, FANTASY, "中文");

        assert_eq!(doc.doc_id, "doc-1");
        assert_eq!(
            doc.chapters.iter().map(|c| c.idx).collect::<Vec<_>>(),
            vec![1, 2, 5]
        );
        let mean = doc.chapters.iter().map(|c| c.score.overall).sum::<f64>() / 3.0;
        assert!((doc.overall_score - mean).abs() < 1e-9);
        assert_eq!(
            doc.total_word_count,
            doc.chapters.iter().map(|c| c.score.word_count).sum::<usize>()
        );
        assert_eq!(doc.chapters[2].score, QualityScore::zero());
        assert!(!doc.created_at.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let chapters: Vec<(u32, &str)> = vec![];
        let doc = scorer(1000).evaluate_document("empty", &chapters, "", "中文");
        assert_eq!(doc.overall_score, 0.0);
        assert_eq!(doc.total_word_count, 0);
    }

    #[test]
    fn test_rolling_context_drops_oldest() {
        let mut context = RollingContext::new(100, 30);
        assert!(context.text().is_none());
        for idx in 1..=5 {
            context.push(idx, &"字".repeat(60));
        }
        let text = context.text().unwrap();
        assert!(text.chars().count() <= 100);
        assert!(text.contains("第5章"));
        assert!(!text.contains("第1章"));
    }

    #[test]
    fn test_rolling_context_keeps_newest_even_if_oversized() {
        let mut context = RollingContext::new(10, 500);
        context.push(1, &"字".repeat(100));
        context.push(2, &"字".repeat(100));
        let text = context.text().unwrap();
        assert!(text.starts_with("第2章"));
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        assert_eq!(aggregate_sections(&[]), QualityScore::zero());
    }
}
