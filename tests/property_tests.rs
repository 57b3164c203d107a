//! Property-based tests using proptest
//!
//! Laws that must hold for every input: score bounds, the weight law,
//! splitter coverage and span ranges, and the JSON round-trip of engine output.

use novel_quality::models::QualityScore;
use novel_quality::reporters::{from_dict, to_dict};
use novel_quality::scoring::{split, split_spans};
use novel_quality::{QualityScorer, ScorerConfig};
use proptest::prelude::*;

/// Pieces of prose that hit the metric rules: CJK runs, terminators,
/// quotes, blank lines, transition and contradiction words, genre keywords
const FRAGMENTS: &[&str] = &[
    "艾琳", "精灵", "城堡", "魔法", "龙", "爱情", "星际", "的", "走进了房间",
    "。", "！", "？", ".", "!", "，", "「", "」", "\"", "『", "』",
    "\n", "\n\n", "\n \n", " ", "\t", "\u{3000}",
    "但是", "然而", "相反", "与此相反", "因此", "然后", "总之",
    "The dragon", "flew", "a", "b",
];

const GENRES: &[&str] = &["", "奇幻冒险", "都市言情", "科幻未来", "未知类型"];

fn prose_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::collection::vec(prop::sample::select(FRAGMENTS), 0..120)
            .prop_map(|parts| parts.concat()),
        1 => ".{0,300}",
    ]
}

fn chapters_strategy() -> impl Strategy<Value = Vec<(u32, String)>> {
    prop::collection::vec(prose_strategy(), 1..4).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| (i as u32 + 1, text))
            .collect()
    })
}

fn in_bounds(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

proptest! {
    // Property: every dimension and the overall score stay within [0, 100],
    // and overall is the weighted sum of the dimensions
    #[test]
    fn test_heuristic_scores_bounded_and_weighted(
        text in prose_strategy(),
        context in prop::option::of(prose_strategy()),
        genre in prop::sample::select(GENRES),
    ) {
        let scorer = QualityScorer::new(ScorerConfig::default());
        let score = scorer.evaluate_text(&text, context.as_deref(), genre, None);

        for value in [
            score.overall,
            score.readability,
            score.coherence,
            score.canon_consistency,
            score.genre_fit,
        ] {
            prop_assert!(in_bounds(value), "out of bounds: {} for {:?}", value, text);
        }

        if text.is_empty() {
            prop_assert_eq!(score, QualityScore::zero());
        } else {
            let expected = QualityScore::weighted_overall(
                score.readability,
                score.coherence,
                score.canon_consistency,
                score.genre_fit,
            );
            prop_assert!((score.overall - expected).abs() < 1e-9);
            prop_assert!(!score.rewrite_suggestion.is_empty());
        }
    }

    // Property: non-blank text always yields at least one non-blank section
    #[test]
    fn test_splitter_coverage(text in prose_strategy(), max in 0usize..2000) {
        let sections = split(&text, max);
        if text.trim().is_empty() {
            prop_assert!(sections.is_empty());
        } else {
            prop_assert!(!sections.is_empty(), "no sections for {:?} at {}", text, max);
            prop_assert!(sections.iter().all(|s| !s.trim().is_empty()));
        }
    }

    // Property: spans are ordered and lie inside the source text
    #[test]
    fn test_spans_within_source(text in prose_strategy(), max in 1usize..500) {
        let len = text.chars().count();
        let spans = split_spans(&text, max);
        let mut previous_end = 0;
        for span in &spans {
            prop_assert!(span.start <= span.end);
            prop_assert!(span.end <= len, "span {}..{} past {}", span.start, span.end, len);
            prop_assert!(span.start >= previous_end);
            previous_end = span.end;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Property: engine output survives to_dict/from_dict and a trip through JSON text
    #[test]
    fn test_document_round_trip(
        chapters in chapters_strategy(),
        genre in prop::sample::select(GENRES),
        max in 10usize..400,
    ) {
        let scorer = QualityScorer::new(ScorerConfig {
            max_section_length: max,
            ..Default::default()
        });
        let doc = scorer.evaluate_document("prop", &chapters, genre, "中文");

        let dict = to_dict(&doc).unwrap();
        prop_assert_eq!(&from_dict(&dict).unwrap(), &doc);

        let text = serde_json::to_string(&dict).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(&from_dict(&reparsed).unwrap(), &doc);
    }
}
