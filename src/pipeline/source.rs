//! Collaborator traits at the ingestion boundary.
//!
//! The engine never decodes PDFs or images itself. Line extraction,
//! rasterization and text recognition are supplied by the caller through
//! these traits.

use crate::error::{Error, Result};
use crate::layout::line::{Line, Page};

/// Source of positioned text lines, one page at a time.
pub trait LineExtractor {
    /// Open a document and return its page count.
    ///
    /// A failure here is an ingestion failure for the whole run.
    fn open(&mut self, path: &str) -> Result<usize>;

    /// Extract the lines of one page of the opened document.
    fn extract_page(&mut self, page_index: usize) -> Result<Vec<Line>>;
}

/// A rasterized page handed to a [`TextRecognizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Zero-based page index
    pub page_index: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Raw pixel data in the renderer's format
    pub pixels: Vec<u8>,
}

impl RenderedPage {
    /// Create a rendered page.
    pub fn new(page_index: usize, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            page_index,
            width,
            height,
            pixels,
        }
    }
}

/// Rasterizes pages for OCR.
pub trait PageRenderer {
    /// Render one page of the document at `path`.
    fn render(&mut self, path: &str, page_index: usize) -> Result<RenderedPage>;
}

/// Recognizes text on a rendered page.
pub trait TextRecognizer {
    /// Recognize the text of `page` in language `lang`.
    fn recognize(&mut self, page: &RenderedPage, lang: &str) -> Result<String>;
}

/// In-memory [`LineExtractor`] over pre-extracted pages.
#[derive(Debug, Clone, Default)]
pub struct MemoryLines {
    pages: Vec<Page>,
    open_error: Option<String>,
    failing_pages: Vec<usize>,
}

impl MemoryLines {
    /// Serve the given pages.
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            open_error: None,
            failing_pages: Vec::new(),
        }
    }

    /// Make `open` fail with `reason`.
    pub fn failing_open(reason: impl Into<String>) -> Self {
        Self {
            open_error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Make extraction of the given page fail.
    pub fn with_failing_page(mut self, page_index: usize) -> Self {
        self.failing_pages.push(page_index);
        self
    }
}

impl LineExtractor for MemoryLines {
    fn open(&mut self, path: &str) -> Result<usize> {
        match &self.open_error {
            Some(reason) => Err(Error::Ingestion(format!("{}: {}", path, reason))),
            None => Ok(self.pages.len()),
        }
    }

    fn extract_page(&mut self, page_index: usize) -> Result<Vec<Line>> {
        if self.failing_pages.contains(&page_index) {
            return Err(Error::PageExtraction {
                page: page_index,
                reason: "page marked as failing".to_string(),
            });
        }
        self.pages
            .get(page_index)
            .map(|page| page.lines.clone())
            .ok_or_else(|| Error::PageExtraction {
                page: page_index,
                reason: "page index out of range".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_lines() {
        let page = Page::new(vec![Line::text_only("Текст")]);
        let mut source = MemoryLines::new(vec![page]).with_failing_page(3);
        assert_eq!(source.open("book.pdf").unwrap(), 1);
        assert_eq!(source.extract_page(0).unwrap().len(), 1);
        assert!(source.extract_page(1).is_err());
        assert!(source.extract_page(3).is_err());
    }

    #[test]
    fn test_failing_open() {
        let mut source = MemoryLines::failing_open("not a PDF");
        let err = source.open("book.pdf").unwrap_err();
        assert!(err.to_string().contains("not a PDF"));
    }
}
