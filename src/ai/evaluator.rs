//! Budget-limited remote evaluator
//!
//! Turns one LLM chat round-trip into a [`QualityScore`]. The model's numbers
//! are taken only for the four dimensions; `overall` is recomputed locally.

use crate::ai::prompts;
use crate::ai::{AiError, ChatTransport, LlmBudget, Message};
use crate::models::QualityScore;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Why a remote evaluation produced no score
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteFailure {
    #[error("LLM budget limit reached ({limit})")]
    BudgetExhausted { limit: u32 },

    #[error("LLM transport failed: {0}")]
    Transport(String),

    #[error("LLM API request failed: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse LLM response: {0}")]
    MalformedResponse(String),

    #[error("LLM evaluation unavailable: {0}")]
    Unavailable(String),
}

impl From<AiError> for RemoteFailure {
    fn from(err: AiError) -> Self {
        match err {
            AiError::ApiError { status: 0, message } => RemoteFailure::Transport(message),
            AiError::ApiError { status, message } => RemoteFailure::Status { status, message },
            AiError::ParseError(message) => RemoteFailure::MalformedResponse(message),
        }
    }
}

pub struct LlmEvaluator {
    transport: Box<dyn ChatTransport>,
    budget: Arc<LlmBudget>,
}

impl LlmEvaluator {
    pub fn new(transport: impl ChatTransport + 'static, budget: Arc<LlmBudget>) -> Self {
        Self {
            transport: Box::new(transport),
            budget,
        }
    }

    pub fn budget(&self) -> &Arc<LlmBudget> {
        &self.budget
    }

    /// Score `text` remotely. Spends one unit of budget only on success.
    pub fn evaluate(
        &self,
        text: &str,
        context: Option<&str>,
        genre: &str,
        section_type: &str,
    ) -> Result<QualityScore, RemoteFailure> {
        let permit = self.budget.try_acquire().ok_or(RemoteFailure::BudgetExhausted {
            limit: self.budget.limit(),
        })?;

        let start = Instant::now();
        let prompt = prompts::evaluation_prompt(text, context, genre, section_type);
        let content = self.transport.complete(&[Message::user(prompt)])?;
        let reply = prompts::parse_evaluation(&content)?;
        permit.commit();

        debug!(
            "Remote evaluation {}/{} used",
            self.budget.used(),
            self.budget.limit()
        );

        Ok(QualityScore {
            overall: QualityScore::weighted_overall(
                reply.readability,
                reply.coherence,
                reply.canon_consistency,
                reply.genre_fit,
            ),
            readability: reply.readability,
            coherence: reply.coherence,
            canon_consistency: reply.canon_consistency,
            genre_fit: reply.genre_fit,
            rewrite_suggestion: reply.rewrite_suggestion,
            word_count: text.chars().count(),
            processing_time: start.elapsed().as_secs_f64(),
        })
    }
}
