//! Core data models for novel-quality
//!
//! These models form the immutable result tree returned by an evaluation:
//! document → chapters → sections, each carrying a [`QualityScore`].

use serde::{Deserialize, Serialize};

/// Weight of readability in the overall score
pub const READABILITY_WEIGHT: f64 = 0.3;
/// Weight of coherence in the overall score
pub const COHERENCE_WEIGHT: f64 = 0.3;
/// Weight of canon consistency in the overall score
pub const CANON_WEIGHT: f64 = 0.2;
/// Weight of genre fit in the overall score
pub const GENRE_FIT_WEIGHT: f64 = 0.2;

/// Default language tag for documents
pub const DEFAULT_LANGUAGE: &str = "中文";

/// The four independent quality dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Readability,
    Coherence,
    CanonConsistency,
    GenreFit,
}

impl Dimension {
    /// All dimensions in declaration order (ties in `weakest` resolve to the earliest)
    pub const ALL: [Dimension; 4] = [
        Dimension::Readability,
        Dimension::Coherence,
        Dimension::CanonConsistency,
        Dimension::GenreFit,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            Dimension::Readability => READABILITY_WEIGHT,
            Dimension::Coherence => COHERENCE_WEIGHT,
            Dimension::CanonConsistency => CANON_WEIGHT,
            Dimension::GenreFit => GENRE_FIT_WEIGHT,
        }
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Readability => "Readability",
            Dimension::Coherence => "Coherence",
            Dimension::CanonConsistency => "Canon consistency",
            Dimension::GenreFit => "Genre fit",
        }
    }

    /// Section-scale rewrite suggestion for a unit whose weakest dimension is `self`
    pub fn rewrite_suggestion(&self) -> &'static str {
        match self {
            Dimension::Readability => "调整句式结构，增加段落层次",
            Dimension::Coherence => "加强逻辑衔接，补充过渡词句",
            Dimension::CanonConsistency => "检查人物设定，确保时间线一致",
            Dimension::GenreFit => "增强类型特征，调整写作风格",
        }
    }

    /// Document-scale improvement advice, one bullet per line
    pub fn improvement_advice(&self) -> &'static [&'static str] {
        match self {
            Dimension::Readability => &[
                "调整句式结构，避免过长的句子",
                "增加段落间的逻辑连接",
                "优化对话和叙述的比例",
            ],
            Dimension::Coherence => &[
                "加强段落间的过渡",
                "确保情节发展的逻辑性",
                "检查时间线和因果关系",
            ],
            Dimension::CanonConsistency => &[
                "检查人物设定的一致性",
                "确保时间线和地点设定不冲突",
                "保持世界观设定的一致性",
            ],
            Dimension::GenreFit => &[
                "增强类型特征的体现",
                "调整写作风格以符合类型特点",
                "增加该类型读者的期待元素",
            ],
        }
    }

    /// Read this dimension's value out of a score
    pub fn value(&self, score: &QualityScore) -> f64 {
        match self {
            Dimension::Readability => score.readability,
            Dimension::Coherence => score.coherence,
            Dimension::CanonConsistency => score.canon_consistency,
            Dimension::GenreFit => score.genre_fit,
        }
    }

    /// Lowest-valued dimension of `values` (indexed like [`Dimension::ALL`])
    pub fn weakest_of(values: [f64; 4]) -> Dimension {
        let mut weakest = 0;
        for i in 1..values.len() {
            if values[i] < values[weakest] {
                weakest = i;
            }
        }
        Dimension::ALL[weakest]
    }

    /// Lowest-scoring dimension of a score
    pub fn weakest(score: &QualityScore) -> Dimension {
        Self::weakest_of(Dimension::ALL.map(|d| d.value(score)))
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Score of one evaluated unit of text. All scores are in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityScore {
    pub overall: f64,
    pub readability: f64,
    pub coherence: f64,
    pub canon_consistency: f64,
    pub genre_fit: f64,
    #[serde(default)]
    pub rewrite_suggestion: String,
    #[serde(default)]
    pub word_count: usize,
    /// Seconds spent producing this score
    #[serde(default)]
    pub processing_time: f64,
}

impl QualityScore {
    /// All-zero score returned for empty input
    pub fn zero() -> Self {
        Self::default()
    }

    /// Weighted combination of the four dimensions
    pub fn weighted_overall(
        readability: f64,
        coherence: f64,
        canon_consistency: f64,
        genre_fit: f64,
    ) -> f64 {
        readability * READABILITY_WEIGHT
            + coherence * COHERENCE_WEIGHT
            + canon_consistency * CANON_WEIGHT
            + genre_fit * GENRE_FIT_WEIGHT
    }

    /// Build a score from dimension values, deriving `overall` and the canned suggestion
    pub fn from_dimensions(
        readability: f64,
        coherence: f64,
        canon_consistency: f64,
        genre_fit: f64,
    ) -> Self {
        let mut score = Self {
            overall: Self::weighted_overall(readability, coherence, canon_consistency, genre_fit),
            readability,
            coherence,
            canon_consistency,
            genre_fit,
            ..Default::default()
        };
        score.rewrite_suggestion = Dimension::weakest(&score).rewrite_suggestion().to_string();
        score
    }

    pub fn weakest_dimension(&self) -> Dimension {
        Dimension::weakest(self)
    }
}

/// A scored section of a chapter. `idx` is 1-based within the chapter;
/// positions are character offsets into the chapter text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionQuality {
    pub idx: u32,
    pub score: QualityScore,
    #[serde(default)]
    pub text: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// A scored chapter. `idx` is the caller-supplied chapter number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterQuality {
    pub idx: u32,
    pub score: QualityScore,
    pub sections: Vec<SectionQuality>,
    #[serde(default)]
    pub text: String,
}

/// Result tree for a whole document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentQuality {
    pub doc_id: String,
    pub chapters: Vec<ChapterQuality>,
    pub overall_score: f64,
    pub total_word_count: usize,
    #[serde(default)]
    pub genre: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// ISO-8601 timestamp of the evaluation
    #[serde(default)]
    pub created_at: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl DocumentQuality {
    /// Sections scoring strictly below `threshold`, in document order,
    /// paired with their chapter index
    pub fn low_scoring_sections(&self, threshold: f64) -> Vec<(u32, &SectionQuality)> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter().map(move |s| (c.idx, s)))
            .filter(|(_, s)| s.score.overall < threshold)
            .collect()
    }

    /// Mean of each dimension across every section in the document,
    /// indexed like [`Dimension::ALL`]. `None` if there are no sections.
    pub fn dimension_averages(&self) -> Option<[f64; 4]> {
        let mut sums = [0.0; 4];
        let mut count = 0usize;
        for section in self.chapters.iter().flat_map(|c| c.sections.iter()) {
            for (i, dim) in Dimension::ALL.iter().enumerate() {
                sums[i] += dim.value(&section.score);
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(sums.map(|s| s / count as f64))
    }

    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }
}
