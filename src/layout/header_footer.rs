//! Repeated header/footer and page-number suppression.
//!
//! Repetition is a document-wide property, so filtering runs in two passes:
//! the first builds a per-key page frequency table over the top and bottom
//! bands of every page, the second drops in-band lines whose key repeats on
//! enough pages (and in-band page numbers).

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::layout::line::{Line, Page, VerticalBounds};
use crate::pipeline::config::RepeatFilterConfig;
use crate::text::normalize::{is_page_number, repeat_key};

/// Which band of the page a line falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Top `band_ratio` of the page
    Top,
    /// Bottom `band_ratio` of the page
    Bottom,
    /// Neither band
    Body,
}

/// Two-pass filter removing repeated headers, footers and page numbers.
#[derive(Debug, Clone, Default)]
pub struct HeaderFooterFilter {
    config: RepeatFilterConfig,
}

impl HeaderFooterFilter {
    /// Create a filter with the given configuration.
    pub fn new(config: RepeatFilterConfig) -> Self {
        Self { config }
    }

    /// Filter configuration.
    pub fn config(&self) -> &RepeatFilterConfig {
        &self.config
    }

    /// Locate a line relative to the page bands.
    ///
    /// Lines with malformed geometry are always [`Band::Body`].
    pub fn band_of(&self, line: &Line, bounds: &VerticalBounds) -> Band {
        if !line.has_valid_geometry() {
            return Band::Body;
        }
        let band = bounds.height() * self.config.band_ratio;
        if line.y1 >= bounds.y_max - band {
            Band::Top
        } else if line.y0 <= bounds.y_min + band {
            Band::Bottom
        } else {
            Band::Body
        }
    }

    /// Minimum number of pages a key must appear on to count as repeated.
    pub fn threshold(&self, total_pages: usize) -> usize {
        repeat_threshold(total_pages, self.config.repeat_ratio, self.config.min_repeat_pages)
    }

    /// Keys of in-band lines that repeat on at least [`threshold`](Self::threshold) pages.
    pub fn repeated_keys(&self, pages: &[Page]) -> HashSet<String> {
        let frequency = self.key_frequency(pages);
        let threshold = self.threshold(pages.len());
        frequency
            .into_iter()
            .filter(|(_, count)| *count >= threshold)
            .map(|(key, _)| key)
            .collect()
    }

    fn key_frequency(&self, pages: &[Page]) -> IndexMap<String, usize> {
        let mut frequency: IndexMap<String, usize> = IndexMap::new();
        for page in pages {
            let bounds = page.vertical_bounds();
            let keys: HashSet<String> = page
                .lines
                .iter()
                .filter(|line| !line.is_blank())
                .filter(|line| self.band_of(line, &bounds) != Band::Body)
                .map(|line| repeat_key(&line.text))
                .filter(|key| !key.is_empty())
                .collect();
            for key in keys {
                *frequency.entry(key).or_insert(0) += 1;
            }
        }
        frequency
    }

    /// Remove repeated headers/footers and page numbers.
    ///
    /// Output pages carry the bounds used for the decision, so filtering an
    /// already filtered document is a no-op.
    pub fn filter(&self, pages: &[Page]) -> Vec<Page> {
        if pages.is_empty() {
            return Vec::new();
        }

        let repeated = self.repeated_keys(pages);
        log::info!(
            "Header/footer filter: {} repeated keys (threshold {}, {} pages, band {:.2})",
            repeated.len(),
            self.threshold(pages.len()),
            pages.len(),
            self.config.band_ratio
        );

        let mut dropped = 0usize;
        let filtered = pages
            .iter()
            .map(|page| {
                let bounds = page.vertical_bounds();
                let lines: Vec<Line> = page
                    .lines
                    .iter()
                    .filter(|line| {
                        let keep = self.keep_line(line, &bounds, &repeated);
                        if !keep && !line.is_blank() {
                            dropped += 1;
                        }
                        keep
                    })
                    .cloned()
                    .collect();
                Page::new(lines).with_bounds(bounds)
            })
            .collect();

        log::debug!("Header/footer filter dropped {} lines", dropped);
        filtered
    }

    fn keep_line(&self, line: &Line, bounds: &VerticalBounds, repeated: &HashSet<String>) -> bool {
        if line.is_blank() {
            return false;
        }
        if self.band_of(line, bounds) == Band::Body {
            return true;
        }
        if self.config.drop_page_numbers && is_page_number(&line.text) {
            return false;
        }
        !repeated.contains(&repeat_key(&line.text))
    }
}

/// `max(min_repeat_pages, ceil(total_pages * repeat_ratio))`.
pub fn repeat_threshold(total_pages: usize, repeat_ratio: f32, min_repeat_pages: usize) -> usize {
    let by_ratio = (total_pages as f32 * repeat_ratio).ceil() as usize;
    min_repeat_pages.max(by_ratio)
}
