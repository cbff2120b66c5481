//! Structure reconstruction pipeline with pluggable collaborators.
//!
//! ```text
//! LineExtractor (pages of Line)
//!     ↓
//! [HeaderFooterFilter] (repeated bands, page numbers)
//!     ↓                        ↘ mostly empty pages + OcrEngine
//! [FontProfile + TocStrategy]    [OcrDriver → TextHeaderFooterFilter]
//!     ↓                            ↓
//! [HeadingClassifier]            [classify_text_line]
//!     ↓                            ↓
//! [DocumentBuilder]              [TextStructureBuilder]
//!     ↓                            ↓
//! Document ←───────────────────────┘
//!     ↓
//! [TextChunker] → Chunk[]
//! ```
//!
//! [`StructurePipeline::process`] never fails: ingestion errors, page
//! failures and cancellation are reported in the [`RunReport`] next to a
//! well-formed (possibly empty) document.

pub mod config;
pub mod source;

pub use config::{
    ChunkerConfig, LineJoin, OcrConfig, ParagraphConfig, RepeatFilterConfig, StructureConfig,
    TocConfig,
};
pub use source::{LineExtractor, MemoryLines, PageRenderer, RenderedPage, TextRecognizer};

use crate::chunker::{Chunk, TextChunker};
use crate::error::Result;
use crate::layout::font_profile::FontProfile;
use crate::layout::header_footer::HeaderFooterFilter;
use crate::layout::heading_detector::{HeadingClassifier, LineContext};
use crate::layout::line::Page;
use crate::ocr::{trigger_ocr, OcrDriver, TextHeaderFooterFilter, TextStructureBuilder};
use crate::structure::builder::{DocumentBuilder, OutlineBuilder};
use crate::structure::toc::{DotLeaderToc, NoToc, TocStrategy};
use crate::structure::tree::NodeTree;
use crate::structure::types::Document;

/// Cooperative cancellation, polled between pages.
pub trait CancelCheck {
    /// The run should stop.
    fn is_cancelled(&self) -> bool;
}

impl<F> CancelCheck for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// A [`CancelCheck`] that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A page that contributed nothing because of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// Zero-based page index
    pub page: usize,
    /// Error message
    pub reason: String,
}

impl PageFailure {
    /// Create a page failure record.
    pub fn new(page: usize, reason: impl Into<String>) -> Self {
        Self {
            page,
            reason: reason.into(),
        }
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Pages processed (after the `max_pages` limit)
    pub page_count: usize,
    /// The OCR path produced the document
    pub used_ocr: bool,
    /// The run stopped on cancellation
    pub cancelled: bool,
    /// Pages that failed to extract, render or recognize
    pub failed_pages: Vec<PageFailure>,
    /// Cause of an ingestion failure
    pub fatal: Option<String>,
}

/// Document and report of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Reconstructed document, empty on failure or cancellation
    pub document: Document,
    /// Run details
    pub report: RunReport,
}

impl RunOutcome {
    fn empty(source_file: &str, report: RunReport) -> Self {
        Self {
            document: Document::empty(source_file),
            report,
        }
    }
}

/// Renderer and recognizer used when the text layer is mostly empty.
pub struct OcrEngine<'a> {
    /// Page rasterizer
    pub renderer: &'a mut dyn PageRenderer,
    /// Text recognizer
    pub recognizer: &'a mut dyn TextRecognizer,
}

impl<'a> OcrEngine<'a> {
    /// Bundle a renderer and a recognizer.
    pub fn new(renderer: &'a mut dyn PageRenderer, recognizer: &'a mut dyn TextRecognizer) -> Self {
        Self {
            renderer,
            recognizer,
        }
    }
}

/// The structure reconstruction pipeline.
///
/// # Examples
///
/// ```
/// use docstruct::layout::{Line, Page};
/// use docstruct::pipeline::{StructureConfig, StructurePipeline};
///
/// let pipeline = StructurePipeline::new(StructureConfig::default());
/// let page = Page::new(vec![
///     Line::new("ГЛАВА 1. ВВЕДЕНИЕ", 50.0, 700.0, 400.0, 718.0, 18.0),
///     Line::new("Текст первого абзаца.", 50.0, 660.0, 400.0, 670.0, 10.0),
/// ]);
/// let doc = pipeline.structure_pages("book.pdf", vec![page]);
/// assert_eq!(doc.chapters[0].title, "ГЛАВА 1. ВВЕДЕНИЕ");
/// ```
pub struct StructurePipeline {
    config: StructureConfig,
    toc_strategy: Box<dyn TocStrategy>,
}

impl Default for StructurePipeline {
    fn default() -> Self {
        Self::new(StructureConfig::default())
    }
}

impl StructurePipeline {
    /// Create a pipeline. The TOC strategy follows `config.toc`.
    ///
    /// The configuration is used as given; call
    /// [`StructureConfig::validate`] first for user-supplied values.
    pub fn new(config: StructureConfig) -> Self {
        let toc_strategy: Box<dyn TocStrategy> = if config.toc.enabled {
            Box::new(DotLeaderToc::new().with_min_entries(config.toc.min_entries))
        } else {
            Box::new(NoToc)
        };
        Self {
            config,
            toc_strategy,
        }
    }

    /// Replace the TOC strategy.
    pub fn with_toc_strategy(mut self, strategy: Box<dyn TocStrategy>) -> Self {
        self.toc_strategy = strategy;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    fn filter_pages(&self, pages: &[Page]) -> Vec<Page> {
        HeaderFooterFilter::new(self.config.filter.clone()).filter(pages)
    }

    fn classifier(&self, pages: &[Page]) -> HeadingClassifier {
        let profile = FontProfile::build(pages);
        let toc = self.toc_strategy.build(pages);
        log::debug!("TOC strategy '{}' found {} entries", self.toc_strategy.name(), toc.len());
        HeadingClassifier::new(profile).with_toc(toc)
    }

    fn build_document(&self, source_file: &str, filtered: &[Page]) -> Document {
        let classifier = self.classifier(filtered);
        let mut builder = DocumentBuilder::from_config(&self.config);
        for page in filtered {
            let contexts = LineContext::for_lines(&page.lines);
            for (line, ctx) in page.lines.iter().zip(contexts) {
                builder.push_line(line, classifier.classify(line, ctx));
            }
        }
        let document = Document::new(source_file, builder.finish());
        log::info!(
            "Structured '{}': {} chapters, {} paragraphs",
            source_file,
            document.chapters.len(),
            document.paragraph_count()
        );
        document
    }

    /// Reconstruct chapters and paragraphs from extracted pages.
    pub fn structure_pages(&self, source_file: &str, pages: Vec<Page>) -> Document {
        let filtered = self.filter_pages(&pages);
        self.build_document(source_file, &filtered)
    }

    /// Reconstruct the three-level chapter/part/block tree.
    pub fn structure_outline(&self, source_file: &str, pages: Vec<Page>) -> NodeTree {
        let filtered = self.filter_pages(&pages);
        let classifier = self.classifier(&filtered);
        let mut builder = OutlineBuilder::from_config(source_file, &self.config);
        for page in &filtered {
            let contexts = LineContext::for_lines(&page.lines);
            for (line, ctx) in page.lines.iter().zip(contexts) {
                builder.push_line(line, classifier.classify_outline(line, ctx));
            }
        }
        builder.finish()
    }

    /// Reconstruct chapters and paragraphs from OCR page text.
    pub fn structure_ocr_text(&self, source_file: &str, pages: &[String]) -> Document {
        let filtered = TextHeaderFooterFilter::from_config(&self.config).filter(pages);
        let chapters = TextStructureBuilder::from_config(&self.config).build(&filtered);
        let document = Document::new(source_file, chapters);
        log::info!(
            "Structured OCR text of '{}': {} chapters, {} paragraphs",
            source_file,
            document.chapters.len(),
            document.paragraph_count()
        );
        document
    }

    /// Run the whole pipeline on one document.
    ///
    /// Pages are extracted one at a time, polling `cancel` before each. When
    /// the filtered text layer is mostly empty and an OCR engine is given,
    /// the document is rebuilt from recognized text instead.
    pub fn process(
        &self,
        path: &str,
        extractor: &mut dyn LineExtractor,
        ocr: Option<OcrEngine<'_>>,
        cancel: &dyn CancelCheck,
    ) -> RunOutcome {
        let mut report = RunReport::default();

        let total = match extractor.open(path) {
            Ok(total) => total,
            Err(e) => {
                log::error!("Cannot open '{}': {}", path, e);
                report.fatal = Some(e.to_string());
                return RunOutcome::empty(path, report);
            },
        };
        let page_count = self.config.max_pages.map_or(total, |max| total.min(max));
        report.page_count = page_count;

        let mut pages = Vec::with_capacity(page_count);
        for index in 0..page_count {
            if cancel.is_cancelled() {
                log::info!("Run on '{}' cancelled before page {}", path, index);
                report.cancelled = true;
                return RunOutcome::empty(path, report);
            }
            match extractor.extract_page(index) {
                Ok(lines) => pages.push(Page::new(lines)),
                Err(e) => {
                    log::warn!("Skipping page {} of '{}': {}", index, path, e);
                    report.failed_pages.push(PageFailure::new(index, e.to_string()));
                    pages.push(Page::default());
                },
            }
        }

        let filtered = self.filter_pages(&pages);
        let needs_ocr = trigger_ocr(&filtered, self.config.ocr.trigger_ratio);
        log::info!(
            "OCR trigger for '{}': {} (ratio {:.2})",
            path,
            needs_ocr,
            self.config.ocr.trigger_ratio
        );

        let document = match (needs_ocr, ocr) {
            (true, Some(engine)) => {
                let mut driver =
                    OcrDriver::new(engine.renderer, engine.recognizer, self.config.ocr.lang.as_str());
                let pass = driver.run(path, page_count, cancel);
                report.failed_pages.extend(pass.failures);
                if pass.cancelled {
                    report.cancelled = true;
                    return RunOutcome::empty(path, report);
                }
                report.used_ocr = true;
                self.structure_ocr_text(path, &pass.pages)
            },
            (true, None) => {
                log::warn!("'{}' has no usable text layer and no OCR engine was given", path);
                self.build_document(path, &filtered)
            },
            (false, _) => self.build_document(path, &filtered),
        };

        RunOutcome { document, report }
    }

    /// Chunk a document's paragraphs with the configured limits.
    pub fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        let chunker = TextChunker::from_config(&self.config)?;
        Ok(chunker.chunk(document.chunk_blocks()))
    }
}
