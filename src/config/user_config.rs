//! User-level configuration for novel-quality
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/novel-quality/config.toml

use crate::scoring::ScorerConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "NOVEL_QUALITY_API_KEY";
/// Fallback API key variable
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "NOVEL_QUALITY_BASE_URL";
pub const MODEL_ENV: &str = "NOVEL_QUALITY_MODEL";

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct AiSettings {
    /// Key for the chat-completions endpoint
    pub api_key: Option<String>,

    /// Model name (default: gpt-3.5-turbo)
    pub model: Option<String>,

    /// OpenAI-compatible base URL, e.g. http://localhost:11434/v1 for Ollama
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// Use the LLM when an API key is available (default: false)
    pub use_llm: Option<bool>,

    /// Maximum successful LLM evaluations per run (default: 10)
    pub llm_budget: Option<u32>,

    /// Target section length in characters (default: 1000)
    pub max_section_length: Option<usize>,

    /// Sections below this score are reported (default: 70)
    pub low_score_threshold: Option<f64>,

    /// Default genre when none is given on the command line
    pub genre: Option<String>,

    /// Default language tag (default: 中文)
    pub language: Option<String>,

    /// Approximate cap in characters of the cross-chapter context (default: 2000)
    pub context_limit: Option<usize>,

    /// Characters of each chapter kept in the cross-chapter context (default: 500)
    pub excerpt_length: Option<usize>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/novel-quality/config.toml)
    pub fn load() -> Result<Self> {
        Self::load_from(Self::user_config_path(), |name| std::env::var(name).ok())
    }

    fn load_from(
        path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(path) = path.filter(|p| p.exists()) {
            let content = std::fs::read_to_string(&path)?;
            match toml::from_str::<UserConfig>(&content) {
                Ok(user_config) => config.merge(user_config),
                Err(e) => warn!("Ignoring invalid config {}: {}", path.display(), e),
            }
        }

        // Environment variables override everything
        config.apply_env(lookup);

        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("novel-quality").join("config.toml"))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV).or_else(|| non_empty(OPENAI_API_KEY_ENV)) {
            self.ai.api_key = Some(key);
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            self.ai.base_url = Some(url);
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            self.ai.model = Some(model);
        }
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        fn take<T>(slot: &mut Option<T>, other: Option<T>) {
            if other.is_some() {
                *slot = other;
            }
        }

        take(&mut self.ai.api_key, other.ai.api_key);
        take(&mut self.ai.model, other.ai.model);
        take(&mut self.ai.base_url, other.ai.base_url);

        let (ev, o) = (&mut self.evaluation, other.evaluation);
        take(&mut ev.use_llm, o.use_llm);
        take(&mut ev.llm_budget, o.llm_budget);
        take(&mut ev.max_section_length, o.max_section_length);
        take(&mut ev.low_score_threshold, o.low_score_threshold);
        take(&mut ev.genre, o.genre);
        take(&mut ev.language, o.language);
        take(&mut ev.context_limit, o.context_limit);
        take(&mut ev.excerpt_length, o.excerpt_length);
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.ai.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Scorer configuration, with defaults for everything not set
    pub fn scorer_config(&self) -> ScorerConfig {
        let defaults = ScorerConfig::default();
        let ev = &self.evaluation;
        ScorerConfig {
            use_llm_evaluation: ev.use_llm.unwrap_or(defaults.use_llm_evaluation),
            api_key: self.ai.api_key.clone(),
            model: self.ai.model.clone().unwrap_or(defaults.model),
            base_url: self.ai.base_url.clone(),
            llm_budget_limit: ev.llm_budget.unwrap_or(defaults.llm_budget_limit),
            max_section_length: ev.max_section_length.unwrap_or(defaults.max_section_length),
            low_score_threshold: ev.low_score_threshold.unwrap_or(defaults.low_score_threshold),
            context_limit: ev.context_limit.unwrap_or(defaults.context_limit),
            excerpt_length: ev.excerpt_length.unwrap_or(defaults.excerpt_length),
            ..defaults
        }
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, EXAMPLE_CONFIG)?;
        }

        Ok(config_path)
    }
}

const EXAMPLE_CONFIG: &str = r#"# novel-quality User Configuration

[ai]
# Any OpenAI-compatible endpoint. Env: NOVEL_QUALITY_API_KEY (or OPENAI_API_KEY)
# api_key = "sk-..."
# model = "gpt-3.5-turbo"

# Local Ollama (free): base_url = "http://localhost:11434/v1"
# base_url = "https://api.openai.com/v1"

[evaluation]
# Score with the LLM while budget remains, heuristics otherwise
# use_llm = false
# llm_budget = 10
# max_section_length = 1000
# low_score_threshold = 70
# genre = "奇幻冒险"
# language = "中文"
# context_limit = 2000
# excerpt_length = 500
"#;
