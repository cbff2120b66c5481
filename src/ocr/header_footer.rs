//! Header/footer removal for OCR page text.
//!
//! Without geometry the bands are approximated by the first and last `N`
//! non-blank lines of each page. Repetition is counted the same way as the
//! geometric filter: once per page per key, against
//! `max(min_repeat_pages, ceil(pages × repeat_ratio))`.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::layout::header_footer::repeat_threshold;
use crate::pipeline::config::{RepeatFilterConfig, StructureConfig};
use crate::text::normalize::{is_page_number, limit_blank_lines, repeat_key};

/// Split page text into lines, accepting `\r\n` and `\r` line ends.
pub fn split_page_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r']).collect()
}

/// Indices of the first and last `band_lines` non-blank lines.
pub fn band_candidates(lines: &[&str], band_lines: usize) -> Vec<usize> {
    let non_blank: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    let head = non_blank.iter().take(band_lines);
    let tail = non_blank.iter().rev().take(band_lines);
    let mut candidates: Vec<usize> = head.chain(tail).copied().collect();
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

/// Text-only repeated-content filter.
#[derive(Debug, Clone)]
pub struct TextHeaderFooterFilter {
    band_lines: usize,
    config: RepeatFilterConfig,
}

impl Default for TextHeaderFooterFilter {
    fn default() -> Self {
        Self::new(3, RepeatFilterConfig::default())
    }
}

impl TextHeaderFooterFilter {
    /// Create a filter looking at `band_lines` lines at each end of a page.
    pub fn new(band_lines: usize, config: RepeatFilterConfig) -> Self {
        Self { band_lines, config }
    }

    /// Create a filter from a run configuration.
    pub fn from_config(config: &StructureConfig) -> Self {
        Self::new(config.ocr.band_lines, config.filter.clone())
    }

    /// Keys of band candidates repeated on enough pages.
    ///
    /// Page numbers never count toward a key.
    pub fn repeated_keys(&self, pages: &[String]) -> HashSet<String> {
        let mut frequency: IndexMap<String, usize> = IndexMap::new();
        for page in pages {
            let lines = split_page_lines(page);
            let keys: HashSet<String> = band_candidates(&lines, self.band_lines)
                .into_iter()
                .map(|i| lines[i])
                .filter(|line| !is_page_number(line))
                .map(repeat_key)
                .filter(|key| !key.is_empty())
                .collect();
            for key in keys {
                *frequency.entry(key).or_insert(0) += 1;
            }
        }

        let threshold =
            repeat_threshold(pages.len(), self.config.repeat_ratio, self.config.min_repeat_pages);
        frequency
            .into_iter()
            .filter(|(_, count)| *count >= threshold)
            .map(|(key, _)| key)
            .collect()
    }

    /// Remove repeated and page-number candidates from every page.
    ///
    /// Blank lines are kept as paragraph separators, with runs of blank
    /// lines collapsed to one.
    pub fn filter(&self, pages: &[String]) -> Vec<String> {
        if pages.is_empty() {
            return Vec::new();
        }
        let repeated = self.repeated_keys(pages);
        log::info!(
            "OCR header/footer filter: {} repeated keys over {} pages",
            repeated.len(),
            pages.len()
        );

        pages
            .iter()
            .map(|page| {
                let lines = split_page_lines(page);
                let drop: HashSet<usize> = band_candidates(&lines, self.band_lines)
                    .into_iter()
                    .filter(|&i| {
                        let line = lines[i];
                        (self.config.drop_page_numbers && is_page_number(line))
                            || repeated.contains(&repeat_key(line))
                    })
                    .collect();

                let kept: Vec<&str> = lines
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !drop.contains(i))
                    .map(|(_, line)| line.trim_end())
                    .collect();
                limit_blank_lines(&kept.join("\n"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<String> {
        (1..=3)
            .map(|i| {
                format!(
                    "УЧЕБНИК ФИЗИКИ\n\nТекст страницы {i}.\nВторая строка {i}.\nТретья строка {i}.\nЧетвёртая {i}.\n\n\n\n{i}"
                )
            })
            .collect()
    }

    #[test]
    fn test_band_candidates() {
        let lines = vec!["a", "", "b", "c", "d", "", "e", "f", "g"];
        assert_eq!(band_candidates(&lines, 2), vec![0, 2, 7, 8]);
        assert_eq!(band_candidates(&lines, 10), vec![0, 2, 3, 4, 6, 7, 8]);
        assert!(band_candidates(&["", " "], 3).is_empty());
    }

    #[test]
    fn test_repeated_header_and_page_numbers_removed() {
        let filter = TextHeaderFooterFilter::default();
        let out = filter.filter(&pages());
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[0],
            "Текст страницы 1.\nВторая строка 1.\nТретья строка 1.\nЧетвёртая 1."
        );
        assert!(out.iter().all(|p| !p.contains("УЧЕБНИК")));
    }

    #[test]
    fn test_page_numbers_do_not_count_as_keys() {
        let pages: Vec<String> = (0..4).map(|_| "5\nТекст".to_string()).collect();
        let filter = TextHeaderFooterFilter::default();
        let keys = filter.repeated_keys(&pages);
        assert!(!keys.contains("5"));
        assert!(keys.contains("текст"));
    }

    #[test]
    fn test_middle_lines_never_dropped() {
        let text = "Шапка\nа\nб\nв\nПовтор\nг\nд\nе\nПодвал".to_string();
        let pages = vec![text.clone(), text.clone(), text];
        let filter = TextHeaderFooterFilter::default();
        let out = filter.filter(&pages);
        // "Повтор" is the 5th of 9 non-blank lines: not a candidate
        assert!(out[0].contains("Повтор"));
        assert!(!out[0].contains("Шапка"));
        assert!(!out[0].contains("Подвал"));
    }

    #[test]
    fn test_blank_lines_kept_as_separators() {
        let filter = TextHeaderFooterFilter::default();
        let out = filter.filter(&["Первый абзац\n\n\n\nВторой абзац".to_string()]);
        assert_eq!(out[0], "Первый абзац\n\nВторой абзац");
    }

    #[test]
    fn test_empty_input() {
        assert!(TextHeaderFooterFilter::default().filter(&[]).is_empty());
    }
}
