//! Logical document structure.
//!
//! ## Overview
//!
//! Classified lines are assembled into one of two shapes:
//! - **Document**: chapters of paragraphs, each paragraph carrying the
//!   section headings that introduced it
//! - **NodeTree**: an arena of chapter, part and block nodes with text leaves
//!
//! A detected table of contents can force heading levels through a
//! pluggable [`TocStrategy`].

pub mod builder;
pub mod toc;
pub mod tree;
pub mod types;

pub use builder::{BuilderState, ChapterTransition, DocumentBuilder, OutlineBuilder};
pub use toc::{DotLeaderToc, NoToc, TocEntry, TocStrategy, TocTable};
pub use tree::{Node, NodeId, NodeKind, NodeTree};
pub use types::{Chapter, Document, Paragraph};
