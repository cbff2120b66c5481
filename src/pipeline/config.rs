//! Unified configuration for the structure reconstruction pipeline.
//!
//! Every section has serde defaults, so a JSON file only needs the keys it
//! wants to change:
//!
//! ```
//! use docstruct::pipeline::config::StructureConfig;
//!
//! let config = StructureConfig::from_json_str(r#"{"filter": {"band_ratio": 0.1}}"#).unwrap();
//! assert_eq!(config.filter.band_ratio, 0.1);
//! assert_eq!(config.filter.min_repeat_pages, 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default title of the implicit chapter holding text before any heading.
pub const DEFAULT_UNTITLED_CHAPTER: &str = "Без главы";

/// Default replacement for empty heading titles.
pub const DEFAULT_EMPTY_TITLE: &str = "Без названия";

/// Separator used between lines of one paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    /// Keep line breaks (default)
    #[default]
    Newline,
    /// Join with single spaces
    Space,
}

impl LineJoin {
    /// Separator string.
    pub fn separator(&self) -> &'static str {
        match self {
            LineJoin::Newline => "\n",
            LineJoin::Space => " ",
        }
    }
}

/// Repeated header/footer filter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatFilterConfig {
    /// Height fraction of the top and bottom bands
    pub band_ratio: f32,
    /// Minimum fraction of pages a key must appear on
    pub repeat_ratio: f32,
    /// Absolute floor on the repeat count
    pub min_repeat_pages: usize,
    /// Drop in-band page numbers regardless of repetition
    pub drop_page_numbers: bool,
}

impl Default for RepeatFilterConfig {
    fn default() -> Self {
        Self {
            band_ratio: 0.12,
            repeat_ratio: 0.60,
            min_repeat_pages: 3,
            drop_page_numbers: true,
        }
    }
}

impl RepeatFilterConfig {
    /// Set the band height fraction.
    pub fn with_band_ratio(mut self, ratio: f32) -> Self {
        self.band_ratio = ratio;
        self
    }

    /// Set the repeat page fraction.
    pub fn with_repeat_ratio(mut self, ratio: f32) -> Self {
        self.repeat_ratio = ratio;
        self
    }

    /// Set the absolute repeat floor.
    pub fn with_min_repeat_pages(mut self, pages: usize) -> Self {
        self.min_repeat_pages = pages;
        self
    }

    /// Enable or disable page-number removal.
    pub fn with_drop_page_numbers(mut self, enable: bool) -> Self {
        self.drop_page_numbers = enable;
        self
    }
}

/// OCR fallback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Empty-page ratio at or above which OCR replaces the text layer
    pub trigger_ratio: f32,
    /// Number of first/last non-blank lines treated as header/footer candidates
    pub band_lines: usize,
    /// Recognizer language
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            trigger_ratio: 0.70,
            band_lines: 3,
            lang: "rus".to_string(),
        }
    }
}

impl OcrConfig {
    /// Set the empty-page trigger ratio.
    pub fn with_trigger_ratio(mut self, ratio: f32) -> Self {
        self.trigger_ratio = ratio;
        self
    }

    /// Set the number of band candidate lines.
    pub fn with_band_lines(mut self, lines: usize) -> Self {
        self.band_lines = lines;
        self
    }

    /// Set the recognizer language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Paragraph segmentation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphConfig {
    /// Separator between lines of one paragraph
    pub join: LineJoin,
}

/// Chunker limits, in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Hard ceiling per chunk
    pub max_chars: usize,
    /// Preferred chunk size
    pub soft_limit: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: 100_000,
            soft_limit: 80_000,
        }
    }
}

/// Table-of-contents override settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Use a detected table of contents to force heading levels
    pub enabled: bool,
    /// Entries required before a table is trusted
    pub min_entries: usize,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_entries: 3,
        }
    }
}

/// Configuration for a whole structure reconstruction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Repeated-content filter
    pub filter: RepeatFilterConfig,
    /// OCR fallback
    pub ocr: OcrConfig,
    /// Paragraph segmentation
    pub paragraphs: ParagraphConfig,
    /// Chunker limits
    pub chunker: ChunkerConfig,
    /// Table-of-contents override
    pub toc: TocConfig,
    /// Stop extraction after this many pages
    pub max_pages: Option<usize>,
    /// Title of the implicit chapter for text before any heading
    pub untitled_chapter_title: String,
    /// Replacement for empty heading titles
    pub empty_title: String,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            filter: RepeatFilterConfig::default(),
            ocr: OcrConfig::default(),
            paragraphs: ParagraphConfig::default(),
            chunker: ChunkerConfig::default(),
            toc: TocConfig::default(),
            max_pages: None,
            untitled_chapter_title: DEFAULT_UNTITLED_CHAPTER.to_string(),
            empty_title: DEFAULT_EMPTY_TITLE.to_string(),
        }
    }
}

impl StructureConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter settings.
    pub fn with_filter(mut self, filter: RepeatFilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the OCR settings.
    pub fn with_ocr(mut self, ocr: OcrConfig) -> Self {
        self.ocr = ocr;
        self
    }

    /// Set the paragraph line separator.
    pub fn with_line_join(mut self, join: LineJoin) -> Self {
        self.paragraphs.join = join;
        self
    }

    /// Set chunker limits.
    pub fn with_chunk_limits(mut self, max_chars: usize, soft_limit: usize) -> Self {
        self.chunker = ChunkerConfig {
            max_chars,
            soft_limit,
        };
        self
    }

    /// Enable or disable the TOC override.
    pub fn with_toc(mut self, enabled: bool) -> Self {
        self.toc.enabled = enabled;
        self
    }

    /// Limit the number of extracted pages.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the implicit chapter title.
    pub fn with_untitled_chapter_title(mut self, title: impl Into<String>) -> Self {
        self.untitled_chapter_title = title.into();
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let filter = &self.filter;
        if !(filter.band_ratio > 0.0 && filter.band_ratio <= 0.5) {
            return Err(Error::InvalidConfig(format!(
                "filter.band_ratio must be in (0, 0.5], got {}",
                filter.band_ratio
            )));
        }
        if !(filter.repeat_ratio > 0.0 && filter.repeat_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "filter.repeat_ratio must be in (0, 1], got {}",
                filter.repeat_ratio
            )));
        }
        if !(self.ocr.trigger_ratio >= 0.0 && self.ocr.trigger_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "ocr.trigger_ratio must be in [0, 1], got {}",
                self.ocr.trigger_ratio
            )));
        }
        if self.chunker.max_chars == 0 || self.chunker.soft_limit == 0 {
            return Err(Error::InvalidConfig("chunker limits must be positive".to_string()));
        }
        if self.chunker.soft_limit > self.chunker.max_chars {
            return Err(Error::InvalidConfig(format!(
                "chunker.soft_limit ({}) exceeds chunker.max_chars ({})",
                self.chunker.soft_limit, self.chunker.max_chars
            )));
        }
        if self.toc.min_entries == 0 {
            return Err(Error::InvalidConfig("toc.min_entries must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}
