//! Per-document font statistics.
//!
//! Heading thresholds are relative to the document itself, not absolute
//! point sizes: a 14pt line is a heading in a 10pt book and body text in a
//! 14pt one. The profile is computed once over the filtered pages and then
//! shared read-only by the classifier.

use crate::layout::line::{Line, Page};
use crate::utils::{median, safe_float_cmp};

/// Smallest size kept for statistics.
pub const MIN_PROFILE_SIZE: f32 = 8.0;

/// Largest size kept for statistics.
pub const MAX_PROFILE_SIZE: f32 = 80.0;

/// Size used when a document has no usable lines.
pub const FALLBACK_SIZE: f32 = 10.0;

/// Round a font size to the nearest 0.5pt step.
///
/// # Examples
///
/// ```
/// use docstruct::layout::font_profile::quantize_size;
///
/// assert_eq!(quantize_size(11.8), 12.0);
/// assert_eq!(quantize_size(11.7), 11.5);
/// assert_eq!(quantize_size(f32::NAN), 0.0);
/// ```
pub fn quantize_size(size: f32) -> f32 {
    if !size.is_finite() {
        return 0.0;
    }
    (size * 2.0).round() / 2.0
}

/// Nearest-rank percentile over sorted values: index `floor(n * q)`, clamped.
pub fn percentile(sorted: &[f32], q: f32) -> Option<f32> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((sorted.len() as f32 * q).floor() as usize).min(sorted.len() - 1);
    Some(sorted[idx])
}

/// Vertical gap between two consecutive lines (`prev.y0 - cur.y1`).
///
/// `None` when either line has malformed geometry.
pub fn vertical_gap(prev: &Line, cur: &Line) -> Option<f32> {
    if !prev.has_valid_geometry() || !cur.has_valid_geometry() {
        return None;
    }
    Some(prev.y0 - cur.y1)
}

/// Font size and spacing statistics of one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontProfile {
    /// Median quantized size
    pub median_size: f32,
    /// 75th percentile size
    pub p75_size: f32,
    /// 90th percentile size
    pub p90_size: f32,
    /// Median positive gap between consecutive lines of a page
    pub spacing_reference: f32,
}

impl Default for FontProfile {
    fn default() -> Self {
        Self::fallback()
    }
}

impl FontProfile {
    /// Profile used when there is nothing to measure.
    pub fn fallback() -> Self {
        Self {
            median_size: FALLBACK_SIZE,
            p75_size: FALLBACK_SIZE,
            p90_size: FALLBACK_SIZE,
            spacing_reference: 0.0,
        }
    }

    /// Build the profile from every page of a document.
    pub fn build(pages: &[Page]) -> Self {
        let mut sizes = Vec::new();
        let mut gaps = Vec::new();

        for page in pages {
            collect_sizes(&page.lines, &mut sizes);
            for pair in page.lines.windows(2) {
                if let Some(gap) = vertical_gap(&pair[0], &pair[1]) {
                    if gap > 0.0 {
                        gaps.push(gap);
                    }
                }
            }
        }

        let profile = Self::from_measurements(sizes, &gaps);
        log::debug!(
            "Font profile: median={:.1} p75={:.1} p90={:.1} spacing={:.1}",
            profile.median_size,
            profile.p75_size,
            profile.p90_size,
            profile.spacing_reference
        );
        profile
    }

    /// Build the profile from a flat run of lines, treated as one page.
    pub fn from_lines(lines: &[Line]) -> Self {
        Self::build(&[Page::new(lines.to_vec())])
    }

    fn from_measurements(mut sizes: Vec<f32>, gaps: &[f32]) -> Self {
        if sizes.is_empty() {
            return Self::fallback();
        }
        sizes.sort_by(|a, b| safe_float_cmp(*a, *b));

        Self {
            median_size: median(&sizes).unwrap_or(FALLBACK_SIZE),
            p75_size: percentile(&sizes, 0.75).unwrap_or(FALLBACK_SIZE),
            p90_size: percentile(&sizes, 0.90).unwrap_or(FALLBACK_SIZE),
            spacing_reference: median(gaps).unwrap_or(0.0),
        }
    }
}

fn collect_sizes(lines: &[Line], sizes: &mut Vec<f32>) {
    for line in lines {
        if line.is_blank() || !line.has_valid_geometry() {
            continue;
        }
        let size = quantize_size(line.effective_font_size());
        if (MIN_PROFILE_SIZE..=MAX_PROFILE_SIZE).contains(&size) {
            sizes.push(size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, y: f32, size: f32) -> Line {
        Line::new(text, 50.0, y, 400.0, y + size, size)
    }

    #[test]
    fn test_quantize_size() {
        assert_eq!(quantize_size(10.0), 10.0);
        assert_eq!(quantize_size(10.24), 10.0);
        assert_eq!(quantize_size(10.26), 10.5);
        assert_eq!(quantize_size(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let sorted = [10.0, 10.0, 12.0, 18.0];
        assert_eq!(percentile(&sorted, 0.75), Some(18.0));
        assert_eq!(percentile(&sorted, 0.90), Some(18.0));
        assert_eq!(percentile(&sorted, 0.0), Some(10.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_empty_document_fallback() {
        let profile = FontProfile::build(&[]);
        assert_eq!(profile, FontProfile::fallback());
        assert_eq!(profile.median_size, 10.0);
        assert_eq!(profile.spacing_reference, 0.0);
    }

    #[test]
    fn test_profile_discards_noise_sizes() {
        let lines = vec![
            line("Декор", 700.0, 120.0),
            line("сноска", 600.0, 5.0),
            line("Текст", 500.0, 10.0),
            line("Текст", 480.0, 10.0),
            line("", 460.0, 30.0),
            Line::text_only("без геометрии"),
        ];
        let profile = FontProfile::from_lines(&lines);
        assert_eq!(profile.median_size, 10.0);
        assert_eq!(profile.p90_size, 10.0);
    }

    #[test]
    fn test_profile_percentiles() {
        let lines = vec![
            line("ГЛАВА 1", 700.0, 18.0),
            line("a", 650.0, 10.0),
            line("b", 630.0, 12.0),
            line("c", 610.0, 10.0),
        ];
        let profile = FontProfile::from_lines(&lines);
        assert_eq!(profile.p75_size, 18.0);
        assert_eq!(profile.p90_size, 18.0);
        assert_eq!(profile.median_size, 11.0);
    }

    #[test]
    fn test_spacing_reference_positive_gaps_only() {
        let lines = vec![
            Line::new("a", 50.0, 700.0, 400.0, 710.0, 10.0),
            Line::new("b", 50.0, 650.0, 400.0, 660.0, 10.0),
            Line::new("c", 50.0, 630.0, 400.0, 640.0, 10.0),
            Line::new("overlap", 50.0, 625.0, 400.0, 635.0, 10.0),
        ];
        let profile = FontProfile::from_lines(&lines);
        // gaps 40, 10, -5 → positive median of [40, 10] = 25
        assert_eq!(profile.spacing_reference, 25.0);
    }

    #[test]
    fn test_spacing_not_measured_across_pages() {
        let pages = vec![
            Page::new(vec![line("a", 100.0, 10.0)]),
            Page::new(vec![line("b", 700.0, 10.0)]),
        ];
        assert_eq!(FontProfile::build(&pages).spacing_reference, 0.0);
    }

    #[test]
    fn test_vertical_gap() {
        let a = Line::new("a", 0.0, 700.0, 10.0, 710.0, 10.0);
        let b = Line::new("b", 0.0, 680.0, 10.0, 690.0, 10.0);
        assert_eq!(vertical_gap(&a, &b), Some(10.0));
        assert_eq!(vertical_gap(&a, &Line::text_only("x")), None);
    }
}
