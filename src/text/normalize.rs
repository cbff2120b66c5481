//! Text normalization shared by every stage of the engine.
//!
//! Lines arrive from layout extractors and OCR engines with soft hyphens,
//! non-breaking spaces, stray carriage returns and runs of blank lines. This
//! module turns them into a canonical form and provides the keys and patterns
//! used for repetition and page-number detection.

use lazy_static::lazy_static;
use regex::Regex;

const SOFT_HYPHEN: char = '\u{00AD}';
const NBSP: char = '\u{00A0}';

lazy_static! {
    /// Runs of spaces and tabs
    static ref RE_INLINE_SPACE: Regex = Regex::new(r"[ \t]+").unwrap();

    /// Spaces hugging a newline
    static ref RE_SPACE_AROUND_NEWLINE: Regex = Regex::new(r" *\n *").unwrap();

    /// 3+ consecutive newlines
    static ref RE_MULTI_NEWLINE: Regex = Regex::new(r"\n{3,}").unwrap();

    /// Any whitespace run, newlines included
    static ref RE_ANY_SPACE: Regex = Regex::new(r"\s+").unwrap();

    /// "7", "Page 7", "Страница 7 из 120", "7/120", "7 of 120", "- 7"
    static ref RE_PAGE_NUM: Regex = Regex::new(
        r"(?i)^\s*(?:(?:page|страница|стр\.?)\s*)?(?:[-–—]\s*)?\d{1,4}(?:\s*(?:/|из|of)\s*\d{1,4})?(?:\s*[-–—])?\s*$"
    )
    .unwrap();

    /// Roman page numbers (i, ii, xiv)
    static ref RE_ROMAN_PAGE: Regex = Regex::new(r"(?i)^\s*[ivxlcdm]+\s*$").unwrap();

    /// "- 3 -" or "— 3 —" framing
    static ref RE_DASH_PAGE: Regex = Regex::new(r"^[-–—]\s*\d{1,4}\s*[-–—]$").unwrap();

    /// Scanner artifacts and bullet glyphs at line start
    static ref RE_LEADING_MARKERS: Regex = Regex::new(r"^[®@\\#•]+\s*").unwrap();
}

/// Normalize raw extractor text.
///
/// Removes soft hyphens, turns NBSP into spaces, converts `\r` to `\n`,
/// collapses inline whitespace and limits blank lines to one.
///
/// # Examples
///
/// ```
/// use docstruct::text::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Текст\u{00A0} \t абзаца \r\n\n\n\nДалее "), "Текст абзаца\n\nДалее");
/// ```
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned: String = text
        .chars()
        .filter(|&c| c != SOFT_HYPHEN)
        .map(|c| if c == NBSP { ' ' } else { c })
        .collect();
    let cleaned = cleaned.replace("\r\n", "\n").replace('\r', "\n");

    let result = RE_INLINE_SPACE.replace_all(&cleaned, " ");
    let result = RE_SPACE_AROUND_NEWLINE.replace_all(&result, "\n");
    let result = RE_MULTI_NEWLINE.replace_all(&result, "\n\n");

    result.trim().to_string()
}

/// Convert `\r` line ends to `\n` and limit blank lines to one, leaving
/// everything else untouched.
pub fn limit_blank_lines(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = RE_SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    RE_MULTI_NEWLINE
        .replace_all(&text, "\n\n")
        .trim_matches('\n')
        .to_string()
}

/// Collapse every whitespace run (newlines included) into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    RE_ANY_SPACE.replace_all(text.trim(), " ").to_string()
}

/// Key used to detect repetition across pages.
///
/// More aggressive than [`normalize_text`]: lower-cased and
/// whitespace-collapsed so that "Учебник  2025 " and "учебник 2025" collide.
pub fn repeat_key(text: &str) -> String {
    collapse_whitespace(&normalize_text(text).to_lowercase())
}

/// Check whether a line looks like a page number.
///
/// Accepts plain digits, "N/M", "N из M", "N of M", an optional "page" /
/// "стр." / "страница" prefix, roman numerals up to 8 characters and
/// dash-framed numbers ("— 3 —").
///
/// # Examples
///
/// ```
/// use docstruct::text::normalize::is_page_number;
///
/// assert!(is_page_number("Страница 7 из 120"));
/// assert!(is_page_number("— 12 —"));
/// assert!(is_page_number("xiv"));
/// assert!(!is_page_number("Глава 7"));
/// ```
pub fn is_page_number(text: &str) -> bool {
    let s = normalize_text(text);
    if s.is_empty() {
        return false;
    }
    if RE_PAGE_NUM.is_match(&s) {
        return true;
    }
    if RE_ROMAN_PAGE.is_match(&s) && s.chars().count() <= 8 {
        return true;
    }
    RE_DASH_PAGE.is_match(&s)
}

/// Strip scanner artifacts and bullet glyphs from the start of a line.
pub fn strip_leading_markers(text: &str) -> String {
    RE_LEADING_MARKERS.replace(text, "").trim().to_string()
}

/// Python-style upper-case test: at least one cased letter, none lower-case.
pub fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Count periods that end a sentence.
///
/// A period counts when it is followed by whitespace or the end of the text
/// and is not preceded by a digit, so "1.2.3 Title" and "ГЛАВА 1. ВВЕДЕНИЕ"
/// count zero while "Один. Два." counts two.
pub fn count_sentence_periods(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut count = 0;
    for (i, &c) in chars.iter().enumerate() {
        if c != '.' {
            continue;
        }
        let followed_by_break = chars.get(i + 1).map_or(true, |n| n.is_whitespace());
        let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
        if followed_by_break && !after_digit {
            count += 1;
        }
    }
    count
}
