//! Table-of-contents detection and level override.
//!
//! A contents listing is the one place where a document states its own
//! hierarchy. Lines shaped like `Title ........ 12` are harvested, their
//! indentation is mapped to an ordinal level, and headings elsewhere in the
//! document whose text matches an entry take that level.
//!
//! Detection is a pluggable [`TocStrategy`]; [`NoToc`] disables it.

use indexmap::IndexMap;

use crate::layout::heading_detector::{HeadingLevel, OutlineLevel};
use crate::layout::line::Page;
use crate::text::normalize::collapse_whitespace;

/// Default leader length, in dots.
pub const MIN_LEADER_LENGTH: usize = 3;

/// Characters accepted in a dot leader, with the number of dots each one counts for.
const LEADER_CHARS: [(char, usize); 6] = [
    ('.', 1),
    ('•', 1),
    ('·', 1),
    ('\u{2024}', 1), // one dot leader
    ('\u{2025}', 2), // two dot leader
    ('\u{2026}', 3), // ellipsis
];

/// A parsed contents line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Lower-cased, whitespace-collapsed title
    pub normalized_title: String,
    /// Indentation ordinal (0 = outermost)
    pub level: usize,
}

/// Lookup table from normalized heading text to indentation ordinal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TocTable {
    entries: IndexMap<String, usize>,
}

impl TocTable {
    /// Build a table from entries; the first entry for a title wins.
    pub fn from_entries(entries: impl IntoIterator<Item = TocEntry>) -> Self {
        let mut map = IndexMap::new();
        for entry in entries {
            map.entry(entry.normalized_title).or_insert(entry.level);
        }
        Self { entries: map }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = TocEntry> + '_ {
        self.entries.iter().map(|(title, level)| TocEntry {
            normalized_title: title.clone(),
            level: *level,
        })
    }

    /// Ordinal level for a heading candidate.
    ///
    /// Lines that are themselves contents entries are never matched.
    pub fn lookup(&self, text: &str) -> Option<usize> {
        if self.entries.is_empty() || split_toc_line(text, MIN_LEADER_LENGTH).is_some() {
            return None;
        }
        let key = normalize_title(text);
        if key.is_empty() {
            return None;
        }
        self.entries.get(&key).copied()
    }

    /// Two-level mapping: ordinal 0 is a chapter, deeper ordinals are sections.
    pub fn heading_level(ordinal: usize) -> HeadingLevel {
        match ordinal {
            0 => HeadingLevel::Chapter,
            _ => HeadingLevel::Section,
        }
    }

    /// Three-level mapping: 0 chapter, 1 part, 2+ block.
    pub fn outline_level(ordinal: usize) -> OutlineLevel {
        match ordinal {
            0 => OutlineLevel::Chapter,
            1 => OutlineLevel::Part,
            _ => OutlineLevel::Block,
        }
    }
}

/// Split `Title .... 12` into `("Title", 12)`.
///
/// Requires a leader worth at least `min_leader_length` dots (spaces between
/// dots allowed) followed by a 1-4 digit page number.
///
/// # Examples
///
/// ```
/// use docstruct::structure::toc::split_toc_line;
///
/// assert_eq!(split_toc_line("Введение ........ 5", 3), Some(("Введение".to_string(), 5)));
/// assert_eq!(split_toc_line("Глава 2 . . . . 17", 3), Some(("Глава 2".to_string(), 17)));
/// assert_eq!(split_toc_line("Упражнение 12", 3), None);
/// ```
pub fn split_toc_line(text: &str, min_leader_length: usize) -> Option<(String, u32)> {
    let trimmed = text.trim_end();
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let digits = &trimmed[digits_start..];
    if digits.len() > 4 {
        return None;
    }
    let page: u32 = digits.parse().ok()?;

    let mut dots = 0usize;
    let mut title_end = digits_start;
    for (i, c) in trimmed[..digits_start].char_indices().rev() {
        if c.is_whitespace() {
            title_end = i;
            continue;
        }
        match LEADER_CHARS.iter().find(|(leader, _)| *leader == c) {
            Some((_, weight)) => {
                dots += weight;
                title_end = i;
            },
            None => break,
        }
    }
    if dots < min_leader_length {
        return None;
    }

    let title = trimmed[..title_end].trim();
    if title.is_empty() {
        return None;
    }
    Some((title.to_string(), page))
}

/// Normalize heading text for contents lookup.
///
/// Strips a dot leader with its page number, collapses whitespace and
/// lower-cases.
pub fn normalize_title(text: &str) -> String {
    let title = match split_toc_line(text, MIN_LEADER_LENGTH) {
        Some((title, _)) => title,
        None => text.to_string(),
    };
    collapse_whitespace(&title).to_lowercase()
}

/// Strategy for building a [`TocTable`] from a document.
pub trait TocStrategy: Send + Sync {
    /// Build the lookup table for a document.
    fn build(&self, pages: &[Page]) -> TocTable;

    /// Strategy name for logging.
    fn name(&self) -> &'static str;
}

/// No table of contents: the classifier alone decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToc;

impl TocStrategy for NoToc {
    fn build(&self, _pages: &[Page]) -> TocTable {
        TocTable::default()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Dot-leader contents detection.
#[derive(Debug, Clone)]
pub struct DotLeaderToc {
    /// Minimum leader length in dots (default: 3)
    pub min_leader_length: usize,
    /// Minimum number of entries to trust the table (default: 3)
    pub min_entries: usize,
}

impl Default for DotLeaderToc {
    fn default() -> Self {
        Self {
            min_leader_length: MIN_LEADER_LENGTH,
            min_entries: 3,
        }
    }
}

impl DotLeaderToc {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of entries.
    pub fn with_min_entries(mut self, min_entries: usize) -> Self {
        self.min_entries = min_entries;
        self
    }
}

impl TocStrategy for DotLeaderToc {
    fn build(&self, pages: &[Page]) -> TocTable {
        let mut raw: Vec<(String, Option<i32>)> = Vec::new();
        for line in pages.iter().flat_map(|p| p.lines.iter()) {
            if let Some((title, _page)) = split_toc_line(&line.text, self.min_leader_length) {
                let indent = line.x0.is_finite().then(|| line.x0.round() as i32);
                raw.push((title, indent));
            }
        }

        if raw.len() < self.min_entries {
            log::debug!(
                "TOC: {} candidate entries, {} required; no override",
                raw.len(),
                self.min_entries
            );
            return TocTable::default();
        }

        let mut indents: Vec<i32> = raw.iter().filter_map(|(_, indent)| *indent).collect();
        indents.sort_unstable();
        indents.dedup();

        let entries = raw.into_iter().map(|(title, indent)| TocEntry {
            normalized_title: normalize_title(&title),
            level: indent
                .and_then(|x| indents.binary_search(&x).ok())
                .unwrap_or(0),
        });
        let table = TocTable::from_entries(entries);
        log::info!("TOC: {} entries, {} indentation levels", table.len(), indents.len());
        table
    }

    fn name(&self) -> &'static str {
        "dot_leader"
    }
}
