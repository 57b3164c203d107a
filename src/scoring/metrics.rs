//! Heuristic metric calculators
//!
//! Each metric is a pure function of its input text returning a score in
//! `[0, 100]`. Scores start from a fixed base and are adjusted additively by
//! detected features, then clamped.
//!
//! Lengths are counted in characters, which suits CJK prose; other languages
//! still get a score, just a less meaningful one.

use super::genre;
use super::splitter::{paragraph_break, sentence_end};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const BASE_SCORE: f64 = 50.0;
const CANON_BASE_SCORE: f64 = 70.0;

/// Words that signal a logical transition between sentences
const TRANSITION_WORDS: &[&str] = &[
    "但是", "然而", "因此", "所以", "接着", "然后", "首先", "其次", "最后", "不过", "另外",
    "此外", "总之", "综上所述", "由此可见",
];

/// Markers of a possible contradiction
const CONTRADICTION_MARKERS: &[&str] = &["但是", "然而", "相反", "与此相反"];

static DIALOGUE: OnceLock<Regex> = OnceLock::new();
static WORD: OnceLock<Regex> = OnceLock::new();
static NAME_LIKE: OnceLock<Regex> = OnceLock::new();

fn dialogue() -> &'static Regex {
    DIALOGUE.get_or_init(|| Regex::new(r#"["「『].*?["」』]"#).expect("valid regex"))
}

fn word() -> &'static Regex {
    WORD.get_or_init(|| Regex::new(r"\w+").expect("valid regex"))
}

/// Runs of 2-4 CJK ideographs, a crude stand-in for character names
fn name_like() -> &'static Regex {
    NAME_LIKE.get_or_init(|| Regex::new(r"[\x{4e00}-\x{9fff}]{2,4}").expect("valid regex"))
}

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Non-empty, trimmed sentences
pub fn sentences(text: &str) -> Vec<&str> {
    sentence_end()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Non-empty, trimmed blank-line-delimited paragraphs
pub fn paragraphs(text: &str) -> Vec<&str> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Fraction of characters that sit inside quote pairs
pub fn dialogue_ratio(text: &str) -> f64 {
    let total = char_len(text);
    if total == 0 {
        return 0.0;
    }
    let quoted: usize = dialogue().find_iter(text).map(|m| char_len(m.as_str())).sum();
    quoted as f64 / total as f64
}

/// Readability from sentence length, its variance, paragraphing and dialogue balance
pub fn readability(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let sentences = sentences(text);
    if sentences.is_empty() {
        return 0.0;
    }

    let avg_len = char_len(text) as f64 / sentences.len() as f64;
    let variance = sentences
        .iter()
        .map(|s| (char_len(s) as f64 - avg_len).powi(2))
        .sum::<f64>()
        / sentences.len() as f64;
    let paragraph_count = paragraphs(text).len();
    let dialogue = dialogue_ratio(text);

    let mut score = BASE_SCORE;

    if (15.0..=25.0).contains(&avg_len) {
        score += 20.0;
    } else if (10.0..=35.0).contains(&avg_len) {
        score += 10.0;
    } else if !(8.0..=50.0).contains(&avg_len) {
        score -= 20.0;
    }

    if (50.0..=200.0).contains(&variance) {
        score += 15.0;
    } else if variance > 500.0 {
        score -= 10.0;
    }

    if (3..=8).contains(&paragraph_count) {
        score += 10.0;
    } else if paragraph_count > 15 {
        score -= 10.0;
    }

    if (0.1..=0.3).contains(&dialogue) {
        score += 5.0;
    } else if dialogue > 0.5 {
        score -= 10.0;
    }

    clamp(score)
}

/// Coherence from transition density, sentence-length extremity and token repetition
pub fn coherence(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let sentences = sentences(text);
    if sentences.len() < 2 {
        return BASE_SCORE;
    }

    let mut score = BASE_SCORE;

    let transitions = TRANSITION_WORDS.iter().filter(|w| text.contains(*w)).count();
    let transition_ratio = transitions as f64 / sentences.len() as f64;
    if (0.1..=0.3).contains(&transition_ratio) {
        score += 20.0;
    } else if transition_ratio < 0.05 {
        score -= 15.0;
    }

    let lengths: Vec<f64> = sentences.iter().map(|s| char_len(s) as f64).collect();
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let extreme = lengths
        .iter()
        .filter(|&&l| l < mean * 0.3 || l > mean * 3.0)
        .count();
    if (extreme as f64 / lengths.len() as f64) < 0.2 {
        score += 10.0;
    } else {
        score -= 10.0;
    }

    let words: Vec<&str> = word().find_iter(text).map(|m| m.as_str()).collect();
    if words.len() > 10 {
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for &w in &words {
            *freq.entry(w).or_default() += 1;
        }
        let limit = words.len() as f64 * 0.1;
        let repeated = freq.values().filter(|&&c| c as f64 > limit).count();
        if repeated == 0 {
            score += 10.0;
        } else if repeated > 3 {
            score -= 15.0;
        }
    }

    clamp(score)
}

/// Canon consistency: assumed consistent unless names from `context` vanish
/// or contradiction markers are dense.
///
/// Only checks that the context's name-like tokens overlap the text at all;
/// it does not check that shared names are used consistently.
pub fn canon_consistency(text: &str, context: Option<&str>) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut score = CANON_BASE_SCORE;

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        let context_names: HashSet<&str> =
            name_like().find_iter(context).map(|m| m.as_str()).collect();
        let text_names: HashSet<&str> = name_like().find_iter(text).map(|m| m.as_str()).collect();
        if !context_names.is_empty() && context_names.is_disjoint(&text_names) {
            score -= 20.0;
        }
    }

    let contradictions = CONTRADICTION_MARKERS
        .iter()
        .filter(|m| text.contains(*m))
        .count();
    if contradictions as f64 > char_len(text) as f64 / 1000.0 {
        score -= 15.0;
    }

    clamp(score)
}

/// How well the text matches the keyword profile of `genre`.
/// Neutral for empty text, empty genre, or an unknown genre without secondary bonuses.
pub fn genre_fit(text: &str, genre_name: &str) -> f64 {
    if text.is_empty() || genre_name.is_empty() {
        return BASE_SCORE;
    }

    let mut score = BASE_SCORE;

    if let Some(keywords) = genre::keywords(genre_name) {
        let present = keywords.iter().filter(|k| text.contains(*k)).count();
        let density = present as f64 / keywords.len() as f64;
        if density >= 0.3 {
            score += 30.0;
        } else if density >= 0.1 {
            score += 15.0;
        } else if present == 0 {
            score -= 20.0;
        }
    }

    if genre::is_descriptive(genre_name) {
        if char_len(text) > 500 {
            score += 10.0;
        }
    } else if genre::is_dialogue_forward(genre_name) {
        if (0.2..=0.4).contains(&dialogue_ratio(text)) {
            score += 10.0;
        }
    }

    clamp(score)
}
