// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # docstruct
//!
//! Document structure reconstruction: chapters, sections and paragraphs from
//! positioned text lines, or from OCR text when the text layer is missing.
//!
//! ## Core Features
//!
//! - **Repeated-content filter**: running headers, footers and page numbers
//!   removed by position band and cross-page repetition
//! - **Heading classification**: percentile-relative font size combined with
//!   spacing, keywords, numbering, ALL-CAPS and bold signals
//! - **Paragraph segmentation**: vertical gap and indentation breaks with
//!   soft-hyphen word-wrap repair
//! - **Hierarchy building**: chapters of paragraphs, or a chapter/part/block
//!   tree, with an optional table-of-contents override
//! - **OCR-safe variant**: the same output shape from plain page text
//! - **Chunking**: size-bounded groups of paragraphs for downstream use
//!
//! ## Architecture
//! - **Pluggable collaborators**: PDF line extraction, page rendering and
//!   text recognition are traits implemented by the caller
//! - **Pluggable TOC detection** through [`structure::TocStrategy`]
//! - **Never fails mid-run**: errors become a [`pipeline::RunReport`] next
//!   to a well-formed document
//!
//! ## Quick Start
//!
//! ```
//! use docstruct::layout::{Line, Page};
//! use docstruct::{StructureConfig, StructurePipeline};
//!
//! # fn main() -> Result<(), docstruct::Error> {
//! let pipeline = StructurePipeline::new(StructureConfig::default());
//! let page = Page::new(vec![
//!     Line::new("ГЛАВА 1. ВВЕДЕНИЕ", 50.0, 700.0, 400.0, 718.0, 18.0),
//!     Line::new("Текст первого абзаца.", 50.0, 660.0, 400.0, 670.0, 10.0),
//! ]);
//!
//! let doc = pipeline.structure_pages("book.pdf", vec![page]);
//! println!("{}", doc.to_json_pretty()?);
//!
//! let chunks = pipeline.chunk(&doc)?;
//! assert_eq!(chunks.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Text cleanup
pub mod text;

// Layout analysis
pub mod layout;

// Document structure
pub mod structure;

// OCR-safe path
pub mod ocr;

// Chunking
pub mod chunker;

// Pipeline and configuration
pub mod pipeline;

// Re-exports
pub use chunker::{Chunk, ChunkBlock, TextChunker};
pub use error::{Error, Result};
pub use pipeline::{
    CancelCheck, NeverCancel, OcrEngine, PageFailure, RunOutcome, RunReport, StructureConfig,
    StructurePipeline,
};
pub use structure::{Chapter, Document, NodeTree, Paragraph};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

    /// Median of the values; the mean of the two middle values for even counts.
    pub fn median(values: &[f32]) -> Option<f32> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| safe_float_cmp(*a, *b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }

        #[test]
        fn test_median() {
            assert_eq!(median(&[]), None);
            assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
            assert_eq!(median(&[10.0, 12.0, 18.0, 10.0]), Some(11.0));
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
