//! Genre keyword profiles
//!
//! A fixed genre → keyword table. Lookups for genres not in the table return
//! `None`, which the genre-fit metric treats as neutral.

/// Genre name paired with its characteristic keywords
pub const GENRE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "奇幻冒险",
        &["魔法", "龙", "精灵", "冒险", "剑", "法术", "异世界", "勇士", "魔王"],
    ),
    (
        "科幻未来",
        &["科技", "未来", "星际", "机器人", "人工智能", "宇宙", "时间", "基因"],
    ),
    (
        "悬疑推理",
        &["案件", "谜题", "线索", "证据", "凶手", "真相", "推理", "嫌疑"],
    ),
    (
        "武侠江湖",
        &["武功", "江湖", "侠客", "剑法", "内功", "门派", "师父", "仇人"],
    ),
    (
        "都市言情",
        &["爱情", "感情", "心动", "约会", "表白", "分手", "吃醋", "浪漫"],
    ),
    (
        "历史传奇",
        &["古代", "皇帝", "将军", "战争", "朝代", "历史", "传奇", "天下"],
    ),
];

/// Keywords for `genre`, if it is a known genre
pub fn keywords(genre: &str) -> Option<&'static [&'static str]> {
    GENRE_KEYWORDS
        .iter()
        .find(|(name, _)| *name == genre)
        .map(|(_, words)| *words)
}

/// Names of all known genres
pub fn known_genres() -> impl Iterator<Item = &'static str> {
    GENRE_KEYWORDS.iter().map(|(name, _)| *name)
}

/// Genres that reward longer descriptive passages
pub fn is_descriptive(genre: &str) -> bool {
    genre.contains("奇幻") || genre.contains("科幻")
}

/// Genres that reward a dialogue-forward balance
pub fn is_dialogue_forward(genre: &str) -> bool {
    genre.contains("言情")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_well_formed() {
        let mut names = HashSet::new();
        for (name, words) in GENRE_KEYWORDS {
            assert!(names.insert(*name), "duplicate genre {name}");
            assert!(!words.is_empty(), "genre {name} has no keywords");
            let unique: HashSet<_> = words.iter().collect();
            assert_eq!(unique.len(), words.len(), "duplicate keyword in {name}");
            assert!(words.iter().all(|w| !w.is_empty()));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(keywords("奇幻冒险").map(|k| k.len()), Some(9));
        assert!(keywords("不存在的类型").is_none());
        assert!(keywords("").is_none());
        assert_eq!(known_genres().count(), 6);
    }

    #[test]
    fn test_genre_families() {
        assert!(is_descriptive("奇幻冒险"));
        assert!(is_descriptive("科幻未来"));
        assert!(!is_descriptive("都市言情"));
        assert!(is_dialogue_forward("都市言情"));
        assert!(!is_dialogue_forward("武侠江湖"));
    }
}
