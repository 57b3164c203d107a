//! Fixed-field telemetry events
//!
//! Two log lines meant for offline aggregation by an external collector.
//! They go through `tracing` on a dedicated target so a subscriber can route
//! them separately (`RUST_LOG=novel_quality::quality=info`).

use tracing::info;

/// `tracing` target of the telemetry events
pub const TARGET: &str = "novel_quality::quality";

pub fn quality_metrics_line(
    doc_id: &str,
    overall_score: f64,
    word_count: usize,
    processing_time: f64,
    rewrite_count: usize,
) -> String {
    format!(
        "QUALITY_METRICS - doc_id:{doc_id}, score:{overall_score:.1}, \
         words:{word_count}, time:{processing_time:.2}s, rewrites:{rewrite_count}"
    )
}

pub fn rewrite_event_line(
    doc_id: &str,
    chapter_idx: u32,
    section_idx: u32,
    original_score: f64,
    action: &str,
) -> String {
    format!(
        "REWRITE_EVENT - doc_id:{doc_id}, ch:{chapter_idx}, \
         sec:{section_idx}, score:{original_score:.1}, action:{action}"
    )
}

/// Log the summary of one document evaluation
pub fn log_quality_metrics(
    doc_id: &str,
    overall_score: f64,
    word_count: usize,
    processing_time: f64,
    rewrite_count: usize,
) {
    info!(
        target: TARGET,
        "{}",
        quality_metrics_line(doc_id, overall_score, word_count, processing_time, rewrite_count)
    );
}

/// Log an action taken (or proposed) on one section
pub fn log_rewrite_event(
    doc_id: &str,
    chapter_idx: u32,
    section_idx: u32,
    original_score: f64,
    action: &str,
) {
    info!(
        target: TARGET,
        "{}",
        rewrite_event_line(doc_id, chapter_idx, section_idx, original_score, action)
    );
}
