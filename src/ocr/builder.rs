//! Structure building from OCR page text.
//!
//! OCR text carries no font or geometry, so headings are recognized from
//! wording alone and paragraphs end at blank lines. The document itself is
//! assembled by the same [`BuilderState`] as the geometric path.

use lazy_static::lazy_static;
use regex::Regex;

use crate::layout::heading_detector::{is_caps_title, is_rejected_text, matches_chapter_keyword};
use crate::layout::paragraph::LineJoin;
use crate::pipeline::config::StructureConfig;
use crate::structure::builder::BuilderState;
use crate::structure::types::Chapter;
use crate::text::hyphenation::HyphenationHandler;
use crate::text::normalize::{normalize_text, strip_leading_markers};

/// Longest OCR line treated as a heading.
pub const MAX_TEXT_HEADING_CHARS: usize = 140;

lazy_static! {
    /// "1.2) ...", "IV. ...", "б) ..."
    static ref RE_NUMBERED_PREFIX: Regex = Regex::new(
        r"^(\d+(\.\d+){0,3}|[IVXLCDM]+|[A-Da-dА-Га-г])[.)]\s+\S"
    )
    .unwrap();

    /// "1.2 ...", "3.1.4 ..."
    static ref RE_DOTTED_NUMBER: Regex = Regex::new(r"^\d+\.\d+(\.\d+){0,2}\s+\S").unwrap();

    static ref RE_PARAGRAPH_KEYWORD: Regex = Regex::new(r"(?i)^параграф\b").unwrap();
}

/// Section-style prefix: numbered, lettered, dotted number or "параграф".
pub fn matches_section_prefix(text: &str) -> bool {
    let text = text.trim();
    RE_NUMBERED_PREFIX.is_match(text)
        || RE_DOTTED_NUMBER.is_match(text)
        || RE_PARAGRAPH_KEYWORD.is_match(text)
}

/// Classify one OCR line from its text alone.
///
/// # Examples
///
/// ```
/// use docstruct::layout::HeadingLevel;
/// use docstruct::ocr::classify_text_line;
///
/// assert_eq!(classify_text_line("ГЛАВА 1. ВВЕДЕНИЕ"), HeadingLevel::Chapter);
/// assert_eq!(classify_text_line("1.1 Основы"), HeadingLevel::Section);
/// assert_eq!(classify_text_line("Обычный текст абзаца."), HeadingLevel::Body);
/// ```
pub fn classify_text_line(text: &str) -> crate::layout::HeadingLevel {
    use crate::layout::HeadingLevel;

    let text = strip_leading_markers(text);
    if is_rejected_text(&text) || text.chars().count() > MAX_TEXT_HEADING_CHARS {
        return HeadingLevel::Body;
    }
    if matches_chapter_keyword(&text) || is_caps_title(&text) {
        return HeadingLevel::Chapter;
    }
    if matches_section_prefix(&text) && !text.ends_with('.') {
        return HeadingLevel::Section;
    }
    HeadingLevel::Body
}

/// Builds chapters from a sequence of OCR page texts.
#[derive(Debug, Clone)]
pub struct TextStructureBuilder {
    state: BuilderState,
    join: LineJoin,
    hyphenation: HyphenationHandler,
    buffer: Vec<String>,
}

impl Default for TextStructureBuilder {
    fn default() -> Self {
        Self::new(BuilderState::default(), LineJoin::default())
    }
}

impl TextStructureBuilder {
    /// Create a builder from a state and a line separator.
    pub fn new(state: BuilderState, join: LineJoin) -> Self {
        Self {
            state,
            join,
            hyphenation: HyphenationHandler::new(),
            buffer: Vec::new(),
        }
    }

    /// Create a builder from a run configuration.
    pub fn from_config(config: &StructureConfig) -> Self {
        Self::new(BuilderState::from_config(config), config.paragraphs.join)
    }

    /// Feed one text line.
    pub fn push_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.flush();
            return;
        }
        match classify_text_line(line) {
            crate::layout::HeadingLevel::Chapter => {
                self.flush();
                self.state.chapter_heading(&strip_leading_markers(line));
            },
            crate::layout::HeadingLevel::Section => {
                self.flush();
                self.state.section_heading(&strip_leading_markers(line));
            },
            crate::layout::HeadingLevel::Body => self.buffer.push(line.to_string()),
        }
    }

    /// Feed a whole page, preceded by the two blank lines that separate pages.
    pub fn push_page(&mut self, text: &str, first: bool) {
        if !first {
            self.push_line("");
            self.push_line("");
        }
        for line in text.split(['\n', '\r']) {
            self.push_line(line);
        }
    }

    /// Turn buffered lines into a paragraph.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let joined = self
            .hyphenation
            .join_lines(self.buffer.iter().map(String::as_str), self.join.separator());
        self.buffer.clear();
        let text = normalize_text(&joined);
        if !text.is_empty() {
            self.state.push_paragraphs(std::iter::once(text));
        }
    }

    /// Finish and return the chapters.
    pub fn finish(mut self) -> Vec<Chapter> {
        self.flush();
        self.state.finish()
    }

    /// Build chapters from all pages at once.
    pub fn build(mut self, pages: &[String]) -> Vec<Chapter> {
        for (i, page) in pages.iter().enumerate() {
            self.push_page(page, i == 0);
        }
        self.finish()
    }
}
