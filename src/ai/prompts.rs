//! Evaluation prompt and reply parsing
//!
//! The prompt asks for the four dimension scores plus a short rewrite
//! suggestion as a JSON object. The model's `overall` is never requested;
//! the scorer recomputes it locally.

use crate::ai::{AiError, AiResult};
use serde::Deserialize;

/// Characters of the evaluated text sent to the model
pub const MAX_PROMPT_TEXT_CHARS: usize = 2000;
/// Characters of preceding context sent to the model
pub const MAX_PROMPT_CONTEXT_CHARS: usize = 500;
/// Longest rewrite suggestion kept from a reply
pub const MAX_SUGGESTION_CHARS: usize = 50;

const NEUTRAL: f64 = 50.0;

fn neutral() -> f64 {
    NEUTRAL
}

/// Dimension scores as returned by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationReply {
    #[serde(default = "neutral")]
    pub readability: f64,
    #[serde(default = "neutral")]
    pub coherence: f64,
    #[serde(default = "neutral")]
    pub canon_consistency: f64,
    #[serde(default = "neutral")]
    pub genre_fit: f64,
    #[serde(default)]
    pub rewrite_suggestion: String,
}

impl EvaluationReply {
    fn normalized(mut self) -> Self {
        for value in [
            &mut self.readability,
            &mut self.coherence,
            &mut self.canon_consistency,
            &mut self.genre_fit,
        ] {
            *value = value.clamp(0.0, 100.0);
        }
        self.rewrite_suggestion = truncate_chars(self.rewrite_suggestion.trim(), MAX_SUGGESTION_CHARS);
        self
    }
}

/// Build the evaluation prompt for one unit of text
pub fn evaluation_prompt(
    text: &str,
    context: Option<&str>,
    genre: &str,
    section_type: &str,
) -> String {
    let genre = if genre.is_empty() { "小说" } else { genre };
    let text = truncate_chars(text, MAX_PROMPT_TEXT_CHARS);
    let context = context
        .filter(|c| !c.is_empty())
        .map(|c| format!("前文上下文：{}\n", truncate_chars(c, MAX_PROMPT_CONTEXT_CHARS)))
        .unwrap_or_default();

    format!(
        r#"请评估以下{section_type}文本的质量，从4个维度打分（0-100分）：

1. 可读性 (Readability) - 文字是否流畅易懂，句子结构是否合理
2. 连贯性 (Coherence) - 逻辑是否清晰，段落间衔接是否自然
3. 设定一致性 (Canon Consistency) - 人物、时间、地点等设定是否前后一致
4. 类型贴合度 (Genre Fit) - 是否符合{genre}类型的特征和风格

文本内容：
{text}

{context}
请只返回JSON对象：
{{
    "readability": 分数,
    "coherence": 分数,
    "canon_consistency": 分数,
    "genre_fit": 分数,
    "rewrite_suggestion": "改进建议（50字以内）"
}}
"#
    )
}

/// Parse the model's reply. Accepts a bare JSON object or one wrapped in a
/// Markdown code fence.
pub fn parse_evaluation(content: &str) -> AiResult<EvaluationReply> {
    let body = strip_code_fence(content.trim());
    serde_json::from_str::<EvaluationReply>(body)
        .map(EvaluationReply::normalized)
        .map_err(|e| AiError::ParseError(e.to_string()))
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop the info string (e.g. "json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
