//! Paragraph segmentation of body-line runs.
//!
//! A run of body lines is split where the vertical gap to the previous line
//! exceeds `0.8 ×` the run's median line height, or where the left edge
//! jumps by more than `max(10, median line height)`. Lines inside a
//! paragraph are joined with hyphenation repair.

use crate::layout::line::Line;
use crate::text::hyphenation::HyphenationHandler;
use crate::text::normalize::normalize_text;
use crate::utils::median;

pub use crate::pipeline::config::LineJoin;

/// Line height used when a run has no positive heights.
pub const FALLBACK_LINE_HEIGHT: f32 = 12.0;

/// Gap, relative to the median line height, that starts a new paragraph.
pub const GAP_FACTOR: f32 = 0.8;

/// Minimum indentation jump that starts a new paragraph.
pub const MIN_INDENT_JUMP: f32 = 10.0;

/// Median of the positive line heights, or 12.0.
pub fn median_line_height(lines: &[Line]) -> f32 {
    let heights: Vec<f32> = lines
        .iter()
        .map(|l| l.height())
        .filter(|h| *h > 0.0)
        .collect();
    median(&heights).unwrap_or(FALLBACK_LINE_HEIGHT)
}

/// Groups body lines into paragraph strings.
#[derive(Debug, Clone, Default)]
pub struct ParagraphSegmenter {
    join: LineJoin,
    hyphenation: HyphenationHandler,
}

impl ParagraphSegmenter {
    /// Create a segmenter with the given line separator.
    pub fn new(join: LineJoin) -> Self {
        Self {
            join,
            hyphenation: HyphenationHandler::new(),
        }
    }

    /// Line separator in use.
    pub fn join(&self) -> LineJoin {
        self.join
    }

    /// Check whether `cur` starts a new paragraph after `prev`.
    ///
    /// Lines with malformed geometry never start one.
    pub fn is_break(&self, prev: &Line, cur: &Line, line_height: f32) -> bool {
        if !prev.has_valid_geometry() || !cur.has_valid_geometry() {
            return false;
        }
        let gap = prev.y0 - cur.y1;
        if gap > GAP_FACTOR * line_height {
            return true;
        }
        (cur.x0 - prev.x0).abs() > MIN_INDENT_JUMP.max(line_height)
    }

    /// Split a run into groups of consecutive lines, one per paragraph.
    pub fn split_groups<'a>(&self, lines: &'a [Line]) -> Vec<Vec<&'a Line>> {
        let line_height = median_line_height(lines);
        let mut groups: Vec<Vec<&Line>> = Vec::new();
        let mut current: Vec<&Line> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                if self.is_break(prev, line, line_height) {
                    groups.push(std::mem::take(&mut current));
                }
            }
            current.push(line);
        }
        if !current.is_empty() {
            groups.push(current);
        }
        groups
    }

    /// Join one group of lines into normalized paragraph text.
    pub fn join_group(&self, group: &[&Line]) -> String {
        let joined = self
            .hyphenation
            .join_lines(group.iter().map(|l| l.text.as_str()), self.join.separator());
        normalize_text(&joined)
    }

    /// Segment a run of body lines into paragraph texts; empty paragraphs are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use docstruct::layout::line::Line;
    /// use docstruct::layout::paragraph::{LineJoin, ParagraphSegmenter};
    ///
    /// let lines = vec![
    ///     Line::new("Новая инфор-", 50.0, 700.0, 400.0, 710.0, 10.0),
    ///     Line::new("мация.", 50.0, 688.0, 400.0, 698.0, 10.0),
    ///     Line::new("Следующий абзац.", 70.0, 660.0, 400.0, 670.0, 10.0),
    /// ];
    /// let paragraphs = ParagraphSegmenter::new(LineJoin::Newline).segment(&lines);
    /// assert_eq!(paragraphs, vec!["Новая информация.", "Следующий абзац."]);
    /// ```
    pub fn segment(&self, lines: &[Line]) -> Vec<String> {
        self.split_groups(lines)
            .iter()
            .map(|group| self.join_group(group))
            .filter(|text| !text.is_empty())
            .collect()
    }
}
