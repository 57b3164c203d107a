//! Text (terminal) reporter with colors and formatting

use crate::models::DocumentQuality;
use anyhow::Result;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Low-scoring sections listed before "...and N more"
const MAX_LOW_SECTIONS: usize = 10;

/// Render report as formatted terminal output
pub fn render(doc: &DocumentQuality, threshold: f64) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{BOLD}Novel Quality{RESET}  {}\n", doc.doc_id));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{}/100{RESET}  Genre: {}  Chapters: {}  Sections: {}  Words: {}\n\n",
        format_score(doc.overall_score),
        if doc.genre.is_empty() { "-" } else { &doc.genre },
        doc.chapters.len(),
        doc.section_count(),
        doc.total_word_count
    ));

    if !doc.chapters.is_empty() {
        out.push_str(&format!("{BOLD}CHAPTERS{RESET}\n"));
        out.push_str(&format!(
            "{DIM}  {:>4}  {:>7}  {:>5}  {:>5}  {:>5}  {:>5}  {:>6}{RESET}\n",
            "CH", "OVERALL", "READ", "COH", "CANON", "GENRE", "WORDS"
        ));
        for chapter in &doc.chapters {
            let s = &chapter.score;
            out.push_str(&format!(
                "  {:>4}  {}  {}  {}  {}  {}  {:>6}\n",
                chapter.idx,
                padded_score(s.overall, 7),
                padded_score(s.readability, 5),
                padded_score(s.coherence, 5),
                padded_score(s.canon_consistency, 5),
                padded_score(s.genre_fit, 5),
                s.word_count
            ));
        }
        out.push('\n');
    }

    let low = doc.low_scoring_sections(threshold);
    if low.is_empty() {
        out.push_str(&format!(
            "{DIM}No sections below {threshold}.{RESET}\n"
        ));
        return Ok(out);
    }

    out.push_str(&format!(
        "{BOLD}BELOW {threshold}{RESET} ({} sections)\n",
        low.len()
    ));
    for (chapter_idx, section) in low.iter().take(MAX_LOW_SECTIONS) {
        out.push_str(&format!(
            "  ch {:>3} sec {:>3}  {}  {DIM}{}{RESET}\n",
            chapter_idx,
            section.idx,
            format_score(section.score.overall),
            section.score.rewrite_suggestion
        ));
    }
    let remaining = low.len().saturating_sub(MAX_LOW_SECTIONS);
    if remaining > 0 {
        out.push_str(&format!(
            "\n  {DIM}...and {remaining} more (use --format markdown for the full list){RESET}\n"
        ));
    }

    Ok(out)
}

/// Format score with color
fn format_score(score: f64) -> String {
    padded_score(score, 0)
}

/// Right-align the number to `width`, then colour it, so escapes don't count
/// towards the column width
fn padded_score(score: f64, width: usize) -> String {
    let color = if score >= 80.0 {
        "\x1b[32m"
    } else if score >= 60.0 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:>width$.1}{RESET}", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_document;

    #[test]
    fn test_text_render_lists_low_sections() {
        let out = render(&test_document(), 70.0).expect("render text");
        assert!(out.contains("novel-1"));
        assert!(out.contains("(1 sections)"));
        assert!(out.contains("加强逻辑衔接"));
    }

    #[test]
    fn test_text_render_all_clear() {
        let out = render(&test_document(), 10.0).expect("render text");
        assert!(out.contains("No sections below 10."));
    }

    #[test]
    fn test_chapter_columns_align_with_header() {
        let ansi = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        let out = render(&test_document(), 70.0).expect("render text");
        let plain: Vec<String> = out
            .lines()
            .map(|l| ansi.replace_all(l, "").into_owned())
            .collect();
        let header = plain.iter().position(|l| l.contains("OVERALL")).unwrap();
        let (head, row) = (&plain[header], &plain[header + 1]);
        assert_eq!(row, "     1     60.0   65.0   50.0   70.0   60.0   12345");
        assert_eq!(head.chars().count(), row.chars().count());
        for column in ["OVERALL", "READ", "COH", "CANON", "GENRE", "WORDS"] {
            let end = head.find(column).unwrap() + column.len();
            assert_ne!(row.as_bytes()[end - 1], b' ', "{column} misaligned");
        }
    }

    #[test]
    fn test_format_score_colors() {
        assert!(format_score(85.0).starts_with("\x1b[32m"));
        assert!(format_score(65.0).starts_with("\x1b[33m"));
        assert!(format_score(20.0).contains("20.0"));
    }
}
