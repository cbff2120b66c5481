//! Types for the reconstructed two-level document.
//!
//! Serialized shape:
//!
//! ```json
//! {"source_file": "book.pdf",
//!  "chapters": [{"title": "...", "headers": ["..."],
//!                "paragraphs": [{"headers": ["..."], "text": "..."}]}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::chunker::ChunkBlock;

/// A paragraph of body text with the headings that introduced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Section headings seen since the previous paragraph
    #[serde(default)]
    pub headers: Vec<String>,
    /// Normalized paragraph text
    pub text: String,
}

impl Paragraph {
    /// Create a paragraph.
    pub fn new(headers: Vec<String>, text: impl Into<String>) -> Self {
        Self {
            headers,
            text: text.into(),
        }
    }
}

/// A chapter and its paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title
    pub title: String,
    /// Heading lines of the chapter itself
    #[serde(default)]
    pub headers: Vec<String>,
    /// Paragraphs in reading order
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl Chapter {
    /// Open a chapter from its heading line (`headers = [title]`).
    pub fn from_heading(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            headers: vec![title.clone()],
            title,
            paragraphs: Vec::new(),
        }
    }

    /// Implicit chapter for text that precedes any heading (no headers).
    pub fn untitled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            headers: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    /// At least one paragraph has been emitted.
    pub fn has_content(&self) -> bool {
        !self.paragraphs.is_empty()
    }
}

/// A reconstructed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source file name or path
    pub source_file: String,
    /// Chapters in reading order
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Document {
    /// Create a document.
    pub fn new(source_file: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            source_file: source_file.into(),
            chapters,
        }
    }

    /// Document with no chapters, as returned by failed or cancelled runs.
    pub fn empty(source_file: impl Into<String>) -> Self {
        Self::new(source_file, Vec::new())
    }

    /// No chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Total number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.chapters.iter().map(|c| c.paragraphs.len()).sum()
    }

    /// One chunk block per paragraph, in reading order.
    pub fn chunk_blocks(&self) -> Vec<ChunkBlock> {
        let mut blocks = Vec::with_capacity(self.paragraph_count());
        for (chapter_idx, chapter) in self.chapters.iter().enumerate() {
            for (paragraph_idx, paragraph) in chapter.paragraphs.iter().enumerate() {
                blocks.push(ChunkBlock {
                    chapter: chapter_idx,
                    paragraph: paragraph_idx,
                    headers: paragraph.headers.clone(),
                    text: paragraph.text.clone(),
                });
            }
        }
        blocks
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
