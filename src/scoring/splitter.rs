//! Section splitter
//!
//! Breaks chapter text into bounded-length sections. Paragraphs (blank-line
//! delimited) are packed greedily first; if that yields nothing, or any section
//! ends up longer than 1.5x the limit, the chapter is re-split on sentence
//! terminators with the same packing policy.

use regex::Regex;
use std::sync::OnceLock;

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();
static SENTENCE_END: OnceLock<Regex> = OnceLock::new();

pub(crate) fn paragraph_break() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid regex"))
}

pub(crate) fn sentence_end() -> &'static Regex {
    SENTENCE_END.get_or_init(|| Regex::new(r"[。！？.!?]+").expect("valid regex"))
}

/// Separator placed between packed paragraphs
const PARAGRAPH_JOIN: &str = "\n\n";

/// A section of chapter text. `start`/`end` are character offsets into the
/// chapter the section was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split `text` into sections of roughly `max_section_length` characters
pub fn split(text: &str, max_section_length: usize) -> Vec<String> {
    split_spans(text, max_section_length)
        .into_iter()
        .map(|s| s.text)
        .collect()
}

/// Like [`split`], but keeps each section's position in the source text
pub fn split_spans(text: &str, max_section_length: usize) -> Vec<SectionSpan> {
    let max = max_section_length.max(1);
    if text.trim().is_empty() {
        return Vec::new();
    }

    let soft_cap = max as f64 * 1.5;
    let by_paragraph = pack_paragraphs(text, max);
    let oversized = by_paragraph
        .iter()
        .any(|s| s.text.chars().count() as f64 > soft_cap);

    if by_paragraph.is_empty() || oversized {
        let by_sentence = pack_sentences(text, max);
        if !by_sentence.is_empty() {
            return by_sentence;
        }
    }
    by_paragraph
}

fn pack_paragraphs(text: &str, max: usize) -> Vec<SectionSpan> {
    let mut sections = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0usize;
    let mut span: Option<(usize, usize)> = None;

    for (start, end) in pieces(text, paragraph_break(), false) {
        let paragraph = &text[start..end];
        let paragraph_chars = paragraph.chars().count();

        if span.is_some() && buffer_chars + paragraph_chars > max {
            if let Some((s, e)) = span.take() {
                sections.push(section(text, buffer.trim_end(), s, e));
            }
            buffer.clear();
            buffer_chars = 0;
        }

        buffer.push_str(paragraph);
        buffer.push_str(PARAGRAPH_JOIN);
        buffer_chars += paragraph_chars + PARAGRAPH_JOIN.len();
        span = Some((span.map_or(start, |(s, _)| s), end));
    }

    if let Some((s, e)) = span {
        sections.push(section(text, buffer.trim_end(), s, e));
    }
    sections
}

fn pack_sentences(text: &str, max: usize) -> Vec<SectionSpan> {
    let mut sections = Vec::new();
    let mut current: Option<(usize, usize)> = None;

    for (start, end) in pieces(text, sentence_end(), true) {
        current = match current {
            Some((s, _)) if text[s..end].chars().count() <= max => Some((s, end)),
            Some((s, e)) => {
                sections.push(section(text, &text[s..e], s, e));
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }

    if let Some((s, e)) = current {
        sections.push(section(text, &text[s..e], s, e));
    }
    sections
}

/// Trimmed, non-empty byte ranges of `text` delimited by `delimiter`.
/// With `keep_delimiter` the matched delimiter stays attached to the piece before it.
fn pieces(text: &str, delimiter: &Regex, keep_delimiter: bool) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut last = 0;
    for m in delimiter.find_iter(text) {
        let end = if keep_delimiter { m.end() } else { m.start() };
        ranges.extend(trimmed_range(text, last, end));
        last = m.end();
    }
    ranges.extend(trimmed_range(text, last, text.len()));
    ranges
}

fn trimmed_range(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = slice.len() - slice.trim_start().len();
    Some((start + lead, start + lead + trimmed.len()))
}

fn section(source: &str, text: &str, start_byte: usize, end_byte: usize) -> SectionSpan {
    let start = source[..start_byte].chars().count();
    let end = start + source[start_byte..end_byte].chars().count();
    SectionSpan {
        text: text.to_string(),
        start,
        end,
    }
}
