//! Size-bounded chunking of paragraph text.
//!
//! Paragraph blocks are packed greedily in reading order. A chunk is closed
//! when the next block would push it over `max_chars`, or once it has
//! reached `soft_limit`. A single block longer than `max_chars` is cut into
//! slices of at most `soft_limit` characters, each slice its own chunk.
//!
//! All lengths are counted in Unicode scalar values, so slicing never lands
//! inside a multi-byte character.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pipeline::config::StructureConfig;

/// One paragraph's text with its position in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkBlock {
    /// Chapter index
    pub chapter: usize,
    /// Paragraph index within the chapter
    pub paragraph: usize,
    /// Section headings of the paragraph
    #[serde(default)]
    pub headers: Vec<String>,
    /// Paragraph text, or a slice of it
    pub text: String,
}

impl ChunkBlock {
    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// An ordered group of blocks within the size bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Blocks in reading order
    pub blocks: Vec<ChunkBlock>,
}

impl Chunk {
    /// Total text length in characters.
    pub fn char_len(&self) -> usize {
        self.blocks.iter().map(ChunkBlock::char_len).sum()
    }

    /// Block texts joined with newlines.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// No blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Split `text` into pieces of at most `limit` characters.
pub fn split_chars(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return vec![text.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for c in text.chars() {
        if count == limit {
            pieces.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(c);
        count += 1;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy paragraph chunker.
///
/// # Examples
///
/// ```
/// use docstruct::chunker::{ChunkBlock, TextChunker};
///
/// let chunker = TextChunker::new(10, 8).unwrap();
/// let blocks = vec![
///     ChunkBlock { chapter: 0, paragraph: 0, headers: vec![], text: "абвгд".to_string() },
///     ChunkBlock { chapter: 0, paragraph: 1, headers: vec![], text: "еёжзи".to_string() },
///     ChunkBlock { chapter: 0, paragraph: 2, headers: vec![], text: "й".to_string() },
/// ];
/// let chunks = chunker.chunk(blocks);
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].char_len(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    max_chars: usize,
    soft_limit: usize,
}

impl TextChunker {
    /// Create a chunker.
    ///
    /// Both limits must be positive and `soft_limit` must not exceed
    /// `max_chars`.
    pub fn new(max_chars: usize, soft_limit: usize) -> Result<Self> {
        if max_chars == 0 || soft_limit == 0 {
            return Err(Error::InvalidConfig("chunker limits must be positive".to_string()));
        }
        if soft_limit > max_chars {
            return Err(Error::InvalidConfig(format!(
                "soft_limit ({}) exceeds max_chars ({})",
                soft_limit, max_chars
            )));
        }
        Ok(Self {
            max_chars,
            soft_limit,
        })
    }

    /// Create a chunker from a run configuration.
    pub fn from_config(config: &StructureConfig) -> Result<Self> {
        Self::new(config.chunker.max_chars, config.chunker.soft_limit)
    }

    /// Hard bound per chunk.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Size at which a chunk is closed early.
    pub fn soft_limit(&self) -> usize {
        self.soft_limit
    }

    /// Pack blocks into chunks, preserving order and text.
    pub fn chunk(&self, blocks: Vec<ChunkBlock>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = Chunk::default();
        let mut size = 0;

        for block in blocks {
            let len = block.char_len();

            if len > self.max_chars {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                    size = 0;
                }
                log::debug!(
                    "Splitting oversized block {}:{} ({} chars)",
                    block.chapter,
                    block.paragraph,
                    len
                );
                for piece in split_chars(&block.text, self.soft_limit) {
                    chunks.push(Chunk {
                        blocks: vec![ChunkBlock {
                            chapter: block.chapter,
                            paragraph: block.paragraph,
                            headers: block.headers.clone(),
                            text: piece,
                        }],
                    });
                }
                continue;
            }

            if !current.is_empty() && (size + len > self.max_chars || size >= self.soft_limit) {
                chunks.push(std::mem::take(&mut current));
                size = 0;
            }
            size += len;
            current.blocks.push(block);
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        log::debug!("Chunked into {} chunks", chunks.len());
        chunks
    }
}
