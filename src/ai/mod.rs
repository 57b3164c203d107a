//! LLM-assisted quality evaluation
//!
//! Remote evaluation is optional and budget-limited. Every failure mode
//! (transport, HTTP status, unparseable reply, exhausted budget) surfaces as a
//! [`RemoteFailure`] so the scorer can fall back to the heuristic metrics.
//!
//! # Environment Variables
//!
//! - `NOVEL_QUALITY_API_KEY` (or `OPENAI_API_KEY`): key for the chat-completions endpoint
//! - `NOVEL_QUALITY_BASE_URL`: OpenAI-compatible base URL (e.g. a local Ollama `/v1`)
//!
//! # Example
//!
//! ```rust,ignore
//! use novel_quality::ai::{AiClient, AiConfig, LlmBudget, LlmEvaluator};
//!
//! let client = AiClient::new(AiConfig::default(), api_key);
//! let evaluator = LlmEvaluator::new(client, LlmBudget::shared(10));
//! let score = evaluator.evaluate(text, None, "奇幻冒险", "section")?;
//! ```

mod budget;
mod client;
mod evaluator;
pub mod prompts;

pub use budget::{BudgetPermit, LlmBudget};
#[cfg(feature = "remote")]
pub use client::AiClient;
pub use client::{AiConfig, ChatTransport, Message, Role};
pub use evaluator::{LlmEvaluator, RemoteFailure};

use thiserror::Error;

/// Errors that can occur talking to the LLM endpoint
#[derive(Error, Debug)]
pub enum AiError {
    /// `status` is 0 when no HTTP response was received
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

pub type AiResult<T> = Result<T, AiError>;
