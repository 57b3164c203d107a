//! Chat-completions client
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol, which also covers
//! DeepInfra, OpenRouter and a local Ollama. Uses ureq (sync HTTP), so no async
//! runtime is needed; evaluation is sequential anyway.

use crate::ai::AiResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint used when no base URL is configured
pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Anything that can answer a chat-completion request with the reply text.
///
/// [`AiClient`] is the network implementation; tests substitute stubs.
pub trait ChatTransport: Send + Sync {
    fn complete(&self, messages: &[Message]) -> AiResult<String>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub model: String,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            max_tokens: 500,
            temperature: 0.3,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AiConfig {
    /// Full chat-completions URL
    pub fn endpoint(&self) -> String {
        match self.base_url.as_deref() {
            Some(base) if !base.trim().is_empty() => {
                format!("{}/chat/completions", base.trim_end_matches('/'))
            }
            _ => DEFAULT_CHAT_URL.to_string(),
        }
    }
}

#[cfg(feature = "remote")]
pub use http::AiClient;

#[cfg(feature = "remote")]
mod http {
    use super::{AiConfig, ChatTransport, Message};
    use crate::ai::{AiError, AiResult};
    use serde::{Deserialize, Serialize};

    /// Chat-completions client over sync HTTP
    pub struct AiClient {
        config: AiConfig,
        api_key: String,
        agent: ureq::Agent,
    }

    fn make_agent(config: &AiConfig) -> ureq::Agent {
        ureq::config::Config::builder()
            .http_status_as_error(false) // status codes are mapped to AiError below
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent()
    }

    impl AiClient {
        pub fn new(config: AiConfig, api_key: impl Into<String>) -> Self {
            let agent = make_agent(&config);
            Self {
                config,
                api_key: api_key.into(),
                agent,
            }
        }

        /// Send a chat-completion request and return the first choice's content
        pub fn generate(&self, messages: Vec<Message>) -> AiResult<String> {
            let body = ChatRequest {
                model: self.config.model.clone(),
                messages,
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            };

            let response = self
                .agent
                .post(self.config.endpoint())
                .header("Content-Type", "application/json")
                .header("Authorization", &format!("Bearer {}", self.api_key))
                .send_json(&body)
                .map_err(|e| AiError::ApiError {
                    status: 0,
                    message: e.to_string(),
                })?;

            let status = response.status().as_u16();
            if !(200..300).contains(&status) {
                let error_text = response.into_body().read_to_string().unwrap_or_default();
                return Err(AiError::ApiError {
                    status,
                    message: error_text,
                });
            }

            let resp: ChatResponse = response
                .into_body()
                .read_json()
                .map_err(|e| AiError::ParseError(e.to_string()))?;

            resp.choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| AiError::ParseError("No response choices".to_string()))
        }
    }

    impl ChatTransport for AiClient {
        fn complete(&self, messages: &[Message]) -> AiResult<String> {
            self.generate(messages.to_vec())
        }
    }

    #[derive(Serialize)]
    struct ChatRequest {
        model: String,
        messages: Vec<Message>,
        max_tokens: u32,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<ChatChoice>,
    }

    #[derive(Deserialize)]
    struct ChatChoice {
        message: ChatMessage,
    }

    #[derive(Deserialize)]
    struct ChatMessage {
        content: String,
    }
}
