//! OCR-safe structure path.
//!
//! Used when the text layer is missing on most pages. Pages are rendered,
//! recognized, stripped of repeated headers and footers by line position,
//! and assembled with text-only heading rules. The output has the same
//! [`Document`](crate::structure::Document) shape as the geometric path.

pub mod builder;
pub mod header_footer;

pub use builder::{classify_text_line, matches_section_prefix, TextStructureBuilder};
pub use header_footer::TextHeaderFooterFilter;

use crate::layout::line::Page;
use crate::pipeline::source::{PageRenderer, TextRecognizer};
use crate::pipeline::{CancelCheck, PageFailure};

/// Ratio of pages without any non-blank line.
pub fn empty_page_ratio(pages: &[Page]) -> f32 {
    if pages.is_empty() {
        return 0.0;
    }
    let empty = pages
        .iter()
        .filter(|page| page.lines.iter().all(|line| line.is_blank()))
        .count();
    empty as f32 / pages.len() as f32
}

/// Whether the text layer is sparse enough to switch to OCR.
///
/// A document without pages never triggers.
pub fn trigger_ocr(pages: &[Page], trigger_ratio: f32) -> bool {
    !pages.is_empty() && empty_page_ratio(pages) >= trigger_ratio
}

/// Text produced by an OCR pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrPass {
    /// Recognized text per page; failed pages hold an empty string
    pub pages: Vec<String>,
    /// Pages that failed to render or recognize
    pub failures: Vec<PageFailure>,
    /// The pass stopped on cancellation
    pub cancelled: bool,
}

/// Runs a renderer and a recognizer over every page of a document.
pub struct OcrDriver<'a> {
    renderer: &'a mut dyn PageRenderer,
    recognizer: &'a mut dyn TextRecognizer,
    lang: String,
}

impl<'a> OcrDriver<'a> {
    /// Create a driver for the given recognizer language.
    pub fn new(
        renderer: &'a mut dyn PageRenderer,
        recognizer: &'a mut dyn TextRecognizer,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            recognizer,
            lang: lang.into(),
        }
    }

    /// Recognize `page_count` pages of `path`.
    ///
    /// Cancellation is polled before each page and again between rendering
    /// and recognition. A failing page yields empty text and a
    /// [`PageFailure`]; the pass continues with the next page.
    pub fn run(&mut self, path: &str, page_count: usize, cancel: &dyn CancelCheck) -> OcrPass {
        let mut pass = OcrPass::default();
        for index in 0..page_count {
            if cancel.is_cancelled() {
                log::info!("OCR cancelled before page {}", index);
                pass.cancelled = true;
                return pass;
            }

            let rendered = match self.renderer.render(path, index) {
                Ok(rendered) => rendered,
                Err(e) => {
                    log::warn!("OCR render failed on page {}: {}", index, e);
                    pass.failures.push(PageFailure::new(index, e.to_string()));
                    pass.pages.push(String::new());
                    continue;
                },
            };

            if cancel.is_cancelled() {
                log::info!("OCR cancelled after rendering page {}", index);
                pass.cancelled = true;
                return pass;
            }

            match self.recognizer.recognize(&rendered, &self.lang) {
                Ok(text) => pass.pages.push(text),
                Err(e) => {
                    log::warn!("OCR recognition failed on page {}: {}", index, e);
                    pass.failures.push(PageFailure::new(index, e.to_string()));
                    pass.pages.push(String::new());
                },
            }
        }
        log::debug!(
            "OCR pass finished: {} pages, {} failures",
            pass.pages.len(),
            pass.failures.len()
        );
        pass
    }
}
