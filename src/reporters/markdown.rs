//! Markdown reporter
//!
//! Output depends only on the DocumentQuality passed in (its `created_at` is
//! printed as-is), so the same result always renders the same report.

use crate::models::{Dimension, DocumentQuality};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(doc: &DocumentQuality, threshold: f64) -> Result<String> {
    Ok(generate_markdown_report(doc, threshold))
}

/// Markdown report with a chapter table, every section scoring below
/// `low_score_threshold`, and advice for the weakest dimension
pub fn generate_markdown_report(doc: &DocumentQuality, low_score_threshold: f64) -> String {
    let mut md = String::new();

    md.push_str(&render_header(doc));
    md.push('\n');
    md.push_str(&render_chapter_table(doc));
    md.push('\n');
    md.push_str(&render_low_sections(doc, low_score_threshold));
    md.push('\n');
    md.push_str(&render_advice(doc));

    md
}

fn render_header(doc: &DocumentQuality) -> String {
    format!(
        r#"# Novel Quality Report

**Document**: {}
**Created**: {}
**Genre**: {}
**Total words**: {}
**Overall score**: {:.1}/100
"#,
        doc.doc_id,
        doc.created_at,
        doc.genre,
        thousands(doc.total_word_count),
        doc.overall_score
    )
}

fn render_chapter_table(doc: &DocumentQuality) -> String {
    let mut md = String::from(
        r#"## Chapter Scores

| Chapter | Overall | Readability | Coherence | Canon consistency | Genre fit | Words |
|---------|---------|-------------|-----------|-------------------|-----------|-------|
"#,
    );
    for chapter in &doc.chapters {
        let s = &chapter.score;
        md.push_str(&format!(
            "| {} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {} |\n",
            chapter.idx,
            s.overall,
            s.readability,
            s.coherence,
            s.canon_consistency,
            s.genre_fit,
            thousands(s.word_count)
        ));
    }
    md
}

fn render_low_sections(doc: &DocumentQuality, threshold: f64) -> String {
    let mut md = String::from("## Low-Scoring Sections\n\n");
    let low = doc.low_scoring_sections(threshold);

    if low.is_empty() {
        md.push_str(&format!("All sections score at or above {threshold}.\n"));
        return md;
    }

    md.push_str(&format!(
        "### Below {} ({} sections)\n\n",
        threshold,
        low.len()
    ));
    for (chapter_idx, section) in low {
        md.push_str(&format!(
            "#### Chapter {} - Section {}\n- **Score**: {:.1}\n- **Suggestion**: {}\n\n",
            chapter_idx, section.idx, section.score.overall, section.score.rewrite_suggestion
        ));
    }
    md
}

fn render_advice(doc: &DocumentQuality) -> String {
    let mut md = String::from("## Improvement Advice\n\n");

    let Some(averages) = doc.dimension_averages() else {
        md.push_str("No sections were scored.\n");
        return md;
    };

    md.push_str("### Dimension Averages\n\n");
    for (dim, avg) in Dimension::ALL.iter().zip(averages) {
        md.push_str(&format!("- **{}**: {:.1}/100\n", dim.label(), avg));
    }

    let weakest = Dimension::weakest_of(averages);
    let weakest_avg = averages[Dimension::ALL
        .iter()
        .position(|d| *d == weakest)
        .unwrap_or_default()];
    md.push_str(&format!(
        "\n### Focus Area\n\nThe weakest dimension is **{}** ({:.1}).\n\nSuggestions:\n",
        weakest.label(),
        weakest_avg
    ));
    for line in weakest.improvement_advice() {
        md.push_str(&format!("- {line}\n"));
    }
    md
}

/// `12345` → `12,345`
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
