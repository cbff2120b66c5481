//! Heading classification from font size, weight, spacing and wording.
//!
//! Rules are consulted in a fixed order and the first match wins:
//!
//! 1. Hard rejects: empty text, digits only, longer than 120 characters,
//!    two or more sentence-ending periods, malformed geometry → body.
//! 2. Size above the median and at or above p90 plus a second signal
//!    (spacing above the page's usual gap, a chapter keyword, a numbered
//!    title or an ALL-CAPS title) → chapter.
//! 3. Size above the median and at or above p75 → section (part in the
//!    three-level scheme).
//!
//! Headings are rare in real documents, so p75 and often p90 land on the
//! body size itself. Rules 2 and 3 therefore only fire strictly above the
//! median.
//! 4. Three-level scheme only: size at or above `median + 0.8`, bold, at most
//!    140 characters, no trailing period → block.
//! 5. Bold, at most 80 characters, no trailing period → section (block).
//! 6. Body.
//!
//! A detected table of contents, when attached, is consulted before any of
//! these rules.

use lazy_static::lazy_static;
use regex::Regex;

use crate::layout::font_profile::{quantize_size, vertical_gap, FontProfile};
use crate::layout::line::Line;
use crate::structure::toc::TocTable;
use crate::text::normalize::{count_sentence_periods, is_all_caps};

/// Longest text that can still be a heading.
pub const MAX_HEADING_CHARS: usize = 120;

/// Longest bold body-size line treated as a heading.
pub const MAX_EMPHASIS_CHARS: usize = 80;

/// Longest line treated as a block title in the three-level scheme.
pub const MAX_BLOCK_CHARS: usize = 140;

/// Minimum length of an ALL-CAPS title.
pub const MIN_CAPS_TITLE_CHARS: usize = 6;

/// Offset over the median size that marks a block title.
pub const BLOCK_SIZE_OFFSET: f32 = 0.8;

lazy_static! {
    static ref RE_CHAPTER_KEYWORD: Regex =
        Regex::new(r"(?i)^(глава|раздел|section|chapter)\b").unwrap();

    static ref RE_NUMBERED_TITLE: Regex =
        Regex::new(r"^(\d+(\.\d+){0,3}|[IVXLCDM]+)[.)]?\s+\S+").unwrap();
}

/// Two-level heading classification used by the document builder.
///
/// Ordered: `Body < Section < Chapter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadingLevel {
    /// Regular body text
    Body,
    /// Section heading, attached to the next paragraph
    Section,
    /// Chapter heading
    Chapter,
}

impl HeadingLevel {
    /// Check if this level is a heading (not body text).
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingLevel::Body)
    }
}

/// Three-level heading classification used by the outline builder.
///
/// Ordered: `Body < Block < Part < Chapter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutlineLevel {
    /// Regular body text (-1)
    Body,
    /// Block title (2)
    Block,
    /// Part title (1)
    Part,
    /// Chapter title (0)
    Chapter,
}

impl OutlineLevel {
    /// Numeric depth: 0 chapter, 1 part, 2 block, -1 body.
    pub fn depth(&self) -> i8 {
        match self {
            OutlineLevel::Chapter => 0,
            OutlineLevel::Part => 1,
            OutlineLevel::Block => 2,
            OutlineLevel::Body => -1,
        }
    }

    /// Collapse to the two-level scheme.
    pub fn to_heading_level(self) -> HeadingLevel {
        match self {
            OutlineLevel::Chapter => HeadingLevel::Chapter,
            OutlineLevel::Part | OutlineLevel::Block => HeadingLevel::Section,
            OutlineLevel::Body => HeadingLevel::Body,
        }
    }
}

/// Where a line sits relative to the previous line on its page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineContext {
    /// Gap above the line; `None` at the top of a page
    pub spacing: Option<f32>,
}

impl LineContext {
    /// Context with a measured gap.
    pub fn with_spacing(spacing: f32) -> Self {
        Self {
            spacing: Some(spacing),
        }
    }

    /// Context for the first line of a page.
    pub fn top_of_page() -> Self {
        Self { spacing: None }
    }

    /// Contexts for every line of a page, in order.
    pub fn for_lines(lines: &[Line]) -> Vec<LineContext> {
        let mut contexts = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let spacing = if i == 0 {
                None
            } else {
                vertical_gap(&lines[i - 1], line)
            };
            contexts.push(LineContext { spacing });
        }
        contexts
    }
}

/// Outcome of the size/emphasis rules before mapping to a level scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Chapter,
    Large,
    BlockTitle,
    Emphasis,
    Body,
}

/// Rule 1: text that can never be a heading.
pub fn is_rejected_text(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return true;
    }
    if text.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        return true;
    }
    if text.chars().count() > MAX_HEADING_CHARS {
        return true;
    }
    count_sentence_periods(text) >= 2
}

/// "Глава 3", "РАЗДЕЛ II", "Chapter 1", "Section A" (case-insensitive).
pub fn matches_chapter_keyword(text: &str) -> bool {
    RE_CHAPTER_KEYWORD.is_match(text.trim())
}

/// "1 Введение", "2.3. Методы", "IV) Итоги".
pub fn matches_numbered_title(text: &str) -> bool {
    RE_NUMBERED_TITLE.is_match(text.trim())
}

/// ALL-CAPS line with 6 to 120 characters.
pub fn is_caps_title(text: &str) -> bool {
    let text = text.trim();
    let len = text.chars().count();
    (MIN_CAPS_TITLE_CHARS..=MAX_HEADING_CHARS).contains(&len) && is_all_caps(text)
}

/// Short bold line without a trailing period.
pub fn is_emphasis_heading(text: &str, is_bold: bool, max_chars: usize) -> bool {
    let text = text.trim();
    is_bold && text.chars().count() <= max_chars && !text.ends_with('.')
}

/// Percentile-relative heading classifier.
#[derive(Debug, Clone)]
pub struct HeadingClassifier {
    profile: FontProfile,
    toc: TocTable,
}

impl HeadingClassifier {
    /// Create a classifier for a document profile.
    pub fn new(profile: FontProfile) -> Self {
        Self {
            profile,
            toc: TocTable::default(),
        }
    }

    /// Attach a detected table of contents.
    pub fn with_toc(mut self, toc: TocTable) -> Self {
        self.toc = toc;
        self
    }

    /// Document profile in use.
    pub fn profile(&self) -> &FontProfile {
        &self.profile
    }

    /// Table of contents in use.
    pub fn toc(&self) -> &TocTable {
        &self.toc
    }

    /// Size at or above which a bold line is a block title.
    pub fn block_threshold(&self) -> f32 {
        self.profile.median_size + BLOCK_SIZE_OFFSET
    }

    /// Classify a line in the two-level scheme.
    pub fn classify(&self, line: &Line, ctx: LineContext) -> HeadingLevel {
        if let Some(ordinal) = self.toc.lookup(&line.text) {
            return TocTable::heading_level(ordinal);
        }
        match self.match_rule(line, ctx, false) {
            Rule::Chapter => HeadingLevel::Chapter,
            Rule::Large | Rule::Emphasis => HeadingLevel::Section,
            Rule::BlockTitle | Rule::Body => HeadingLevel::Body,
        }
    }

    /// Classify a line in the three-level scheme.
    pub fn classify_outline(&self, line: &Line, ctx: LineContext) -> OutlineLevel {
        if let Some(ordinal) = self.toc.lookup(&line.text) {
            return TocTable::outline_level(ordinal);
        }
        match self.match_rule(line, ctx, true) {
            Rule::Chapter => OutlineLevel::Chapter,
            Rule::Large => OutlineLevel::Part,
            Rule::BlockTitle | Rule::Emphasis => OutlineLevel::Block,
            Rule::Body => OutlineLevel::Body,
        }
    }

    fn match_rule(&self, line: &Line, ctx: LineContext, three_level: bool) -> Rule {
        if !line.has_valid_geometry() || is_rejected_text(&line.text) {
            return Rule::Body;
        }

        let text = line.text.trim();
        let size = quantize_size(line.effective_font_size());
        // Size tiers never reach down to the body size.
        let above_body = size > self.profile.median_size;

        if above_body && size >= self.profile.p90_size && self.has_chapter_signal(text, ctx) {
            return Rule::Chapter;
        }
        if above_body && size >= self.profile.p75_size {
            return Rule::Large;
        }
        if three_level
            && size >= self.block_threshold()
            && is_emphasis_heading(text, line.is_bold, MAX_BLOCK_CHARS)
        {
            return Rule::BlockTitle;
        }
        if is_emphasis_heading(text, line.is_bold, MAX_EMPHASIS_CHARS) {
            return Rule::Emphasis;
        }
        Rule::Body
    }

    fn has_chapter_signal(&self, text: &str, ctx: LineContext) -> bool {
        let spaced = ctx
            .spacing
            .map_or(true, |gap| gap >= self.profile.spacing_reference);
        spaced || matches_chapter_keyword(text) || matches_numbered_title(text) || is_caps_title(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> FontProfile {
        FontProfile {
            median_size: 10.0,
            p75_size: 14.0,
            p90_size: 18.0,
            spacing_reference: 12.0,
        }
    }

    fn line(text: &str, size: f32, bold: bool) -> Line {
        Line::new(text, 50.0, 500.0, 400.0, 500.0 + size, size).with_bold(bold)
    }

    fn tight() -> LineContext {
        LineContext::with_spacing(2.0)
    }

    #[test]
    fn test_hard_rejects() {
        assert!(is_rejected_text(""));
        assert!(is_rejected_text("   "));
        assert!(is_rejected_text("2024"));
        assert!(is_rejected_text(&"Очень длинная строка ".repeat(10)));
        assert!(is_rejected_text("Первое. Второе. Третье"));
        assert!(!is_rejected_text("ГЛАВА 1. ВВЕДЕНИЕ"));
        assert!(!is_rejected_text("2.1 Методы"));
    }

    #[test]
    fn test_chapter_keyword() {
        assert!(matches_chapter_keyword("Глава 3"));
        assert!(matches_chapter_keyword("РАЗДЕЛ II"));
        assert!(matches_chapter_keyword("chapter one"));
        assert!(!matches_chapter_keyword("Главная мысль"));
        assert!(!matches_chapter_keyword("В главе 3"));
    }

    #[test]
    fn test_numbered_title() {
        assert!(matches_numbered_title("1 Введение"));
        assert!(matches_numbered_title("2.3. Методы"));
        assert!(matches_numbered_title("1.2.3.4 Детали"));
        assert!(matches_numbered_title("IV) Итоги"));
        assert!(!matches_numbered_title("Введение"));
        assert!(!matches_numbered_title("12"));
    }

    #[test]
    fn test_caps_title() {
        assert!(is_caps_title("ВВЕДЕНИЕ"));
        assert!(!is_caps_title("ИТОГ"));
        assert!(!is_caps_title("Введение"));
    }

    #[test]
    fn test_emphasis_heading() {
        assert!(is_emphasis_heading("Подраздел А", true, MAX_EMPHASIS_CHARS));
        assert!(!is_emphasis_heading("Подраздел А", false, MAX_EMPHASIS_CHARS));
        assert!(!is_emphasis_heading("Жирное предложение.", true, MAX_EMPHASIS_CHARS));
        assert!(!is_emphasis_heading(&"ж".repeat(81), true, MAX_EMPHASIS_CHARS));
    }

    #[test]
    fn test_chapter_needs_second_signal() {
        let classifier = HeadingClassifier::new(profile());
        assert_eq!(classifier.classify(&line("Глава 1", 18.0, false), tight()), HeadingLevel::Chapter);
        assert_eq!(classifier.classify(&line("ВВЕДЕНИЕ", 18.0, false), tight()), HeadingLevel::Chapter);
        assert_eq!(classifier.classify(&line("3 Методы", 18.0, false), tight()), HeadingLevel::Chapter);
        // Large but tight and plain wording: only a section
        assert_eq!(classifier.classify(&line("Введение", 18.0, false), tight()), HeadingLevel::Section);
    }

    #[test]
    fn test_spacing_signal() {
        let classifier = HeadingClassifier::new(profile());
        let text = line("Введение", 18.0, false);
        assert_eq!(
            classifier.classify(&text, LineContext::with_spacing(20.0)),
            HeadingLevel::Chapter
        );
        assert_eq!(classifier.classify(&text, LineContext::top_of_page()), HeadingLevel::Chapter);
    }

    #[test]
    fn test_section_and_bold_fallback() {
        let classifier = HeadingClassifier::new(profile());
        assert_eq!(classifier.classify(&line("Обзор", 14.0, false), tight()), HeadingLevel::Section);
        assert_eq!(classifier.classify(&line("Подраздел А", 10.0, true), tight()), HeadingLevel::Section);
        assert_eq!(classifier.classify(&line("Обычный текст", 10.0, false), tight()), HeadingLevel::Body);
    }

    #[test]
    fn test_percentiles_at_body_size() {
        // One heading over many body lines: p75 and p90 collapse onto the body.
        let classifier = HeadingClassifier::new(FontProfile {
            median_size: 10.0,
            p75_size: 10.0,
            p90_size: 10.0,
            spacing_reference: 12.0,
        });
        let top = LineContext::top_of_page();
        assert_eq!(classifier.classify(&line("Обычная строка текста", 10.0, false), top), HeadingLevel::Body);
        assert_eq!(
            classifier.classify(&line("Обычная строка текста", 10.0, false), LineContext::with_spacing(20.0)),
            HeadingLevel::Body
        );
        assert_eq!(classifier.classify_outline(&line("Обычная строка", 10.0, false), top), OutlineLevel::Body);
        assert_eq!(classifier.classify(&line("ГЛАВА 1. ВВЕДЕНИЕ", 18.0, true), top), HeadingLevel::Chapter);
        assert_eq!(classifier.classify(&line("Введение", 12.0, false), tight()), HeadingLevel::Section);
        assert_eq!(classifier.classify(&line("Подраздел А", 10.0, true), tight()), HeadingLevel::Section);
    }

    #[test]
    fn test_hard_reject_beats_size() {
        let classifier = HeadingClassifier::new(profile());
        assert_eq!(classifier.classify(&line("42", 30.0, true), tight()), HeadingLevel::Body);
        assert_eq!(
            classifier.classify(&line("Раз. Два. Три", 30.0, true), tight()),
            HeadingLevel::Body
        );
    }

    #[test]
    fn test_malformed_geometry_is_body() {
        let classifier = HeadingClassifier::new(profile());
        let broken = Line::new("ГЛАВА 1", f32::NAN, 0.0, 10.0, 20.0, 20.0).with_bold(true);
        assert_eq!(classifier.classify(&broken, LineContext::top_of_page()), HeadingLevel::Body);
        assert_eq!(
            classifier.classify_outline(&broken, LineContext::top_of_page()),
            OutlineLevel::Body
        );
    }

    #[test]
    fn test_outline_levels() {
        let classifier = HeadingClassifier::new(profile());
        assert_eq!(classifier.classify_outline(&line("Глава 1", 18.0, false), tight()), OutlineLevel::Chapter);
        assert_eq!(classifier.classify_outline(&line("Часть первая", 14.0, false), tight()), OutlineLevel::Part);
        // median + 0.8 = 10.8 → 11pt bold, 100 chars long
        let long_bold = "б".repeat(100);
        assert_eq!(classifier.classify_outline(&line(&long_bold, 11.0, true), tight()), OutlineLevel::Block);
        assert_eq!(classifier.classify(&line(&long_bold, 11.0, true), tight()), HeadingLevel::Body);
        assert_eq!(classifier.classify_outline(&line("Пункт", 10.0, true), tight()), OutlineLevel::Block);
        assert_eq!(classifier.classify_outline(&line("Текст", 10.0, false), tight()), OutlineLevel::Body);
    }

    #[test]
    fn test_level_ordering() {
        assert!(HeadingLevel::Body < HeadingLevel::Section);
        assert!(HeadingLevel::Section < HeadingLevel::Chapter);
        assert!(OutlineLevel::Body < OutlineLevel::Block);
        assert!(OutlineLevel::Block < OutlineLevel::Part);
        assert!(OutlineLevel::Part < OutlineLevel::Chapter);
        assert_eq!(OutlineLevel::Chapter.depth(), 0);
        assert_eq!(OutlineLevel::Body.depth(), -1);
        assert_eq!(OutlineLevel::Part.to_heading_level(), HeadingLevel::Section);
    }

    #[test]
    fn test_contexts_for_lines() {
        let lines = vec![
            Line::new("a", 0.0, 700.0, 10.0, 710.0, 10.0),
            Line::new("b", 0.0, 680.0, 10.0, 690.0, 10.0),
            Line::text_only("c"),
        ];
        let contexts = LineContext::for_lines(&lines);
        assert_eq!(contexts[0].spacing, None);
        assert_eq!(contexts[1].spacing, Some(10.0));
        assert_eq!(contexts[2].spacing, None);
    }
}
