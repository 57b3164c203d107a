//! Configuration module for novel-quality
//!
//! User-level settings (API credentials, evaluation defaults) live in
//! `~/.config/novel-quality/config.toml`; environment variables override them.

mod user_config;

pub use user_config::{
    AiSettings, EvaluationConfig, UserConfig, API_KEY_ENV, BASE_URL_ENV, MODEL_ENV,
    OPENAI_API_KEY_ENV,
};
