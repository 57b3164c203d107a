//! Chapter loading for the `evaluate` command
//!
//! A novel is either a directory of `.txt` files (one chapter per file, in
//! file-name order) or a single file whose chapters start with heading lines
//! such as `第十二章 归来` or `Chapter 12`.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static CHAPTER_HEADING: OnceLock<Regex> = OnceLock::new();

fn chapter_heading() -> &'static Regex {
    CHAPTER_HEADING.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t\x{3000}]*(?:第[0-9０-９零〇一二三四五六七八九十百千两]+章|(?i:chapter)[ \t]+[0-9]+)[^\n]*$",
        )
        .expect("valid regex")
    })
}

/// Load chapters from a directory (numbered from 1) or a single file
pub fn load_chapters(path: &Path) -> Result<Vec<(u32, String)>> {
    if path.is_dir() {
        return load_directory(path);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(split_chapters(&text))
}

fn load_directory(dir: &Path) -> Result<Vec<(u32, String)>> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            Ok((i as u32 + 1, text))
        })
        .collect()
}

/// Split a novel on chapter heading lines. Heading lines are dropped from the
/// chapter text. Text before the first heading becomes chapter 0 when it is
/// not blank; a text without headings is chapter 1.
pub fn split_chapters(text: &str) -> Vec<(u32, String)> {
    let headings: Vec<_> = chapter_heading().find_iter(text).collect();
    if headings.is_empty() {
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![(1, text.trim().to_string())];
    }

    let mut chapters = Vec::with_capacity(headings.len() + 1);
    let preface = text[..headings[0].start()].trim();
    if !preface.is_empty() {
        chapters.push((0, preface.to_string()));
    }

    for (i, heading) in headings.iter().enumerate() {
        let end = headings.get(i + 1).map_or(text.len(), |next| next.start());
        chapters.push((i as u32 + 1, text[heading.end()..end].trim().to_string()));
    }
    chapters
}
