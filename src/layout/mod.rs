//! Layout-level analysis of positioned text lines.
//!
//! This module provides the geometry-aware stages of the engine:
//! - Line and page model with glyph style aggregation
//! - Repeated header/footer and page-number suppression
//! - Document font profile and heading classification
//! - Paragraph segmentation of body-line runs

pub mod font_profile;
pub mod header_footer;
pub mod heading_detector;
pub mod line;
pub mod paragraph;

// Re-export main types
pub use font_profile::FontProfile;
pub use header_footer::{Band, HeaderFooterFilter};
pub use heading_detector::{HeadingClassifier, HeadingLevel, LineContext, OutlineLevel};
pub use line::{FontWeight, Glyph, Line, LineStyle, Page, VerticalBounds};
pub use paragraph::{LineJoin, ParagraphSegmenter};
