//! Hierarchy assembly from classified lines.
//!
//! [`BuilderState`] holds the chapter list, the open chapter and the section
//! headings waiting for their first paragraph. Both the geometry path
//! ([`DocumentBuilder`]) and the OCR text path drive the same state, so
//! their output has the same shape.
//!
//! Back-to-back chapter-level lines are common (a title followed by a
//! subtitle in the same large font). A chapter-level line only opens a new
//! chapter when none is open or the open one already has a paragraph; a
//! chapter that is still empty takes the line as a section heading instead.

use crate::layout::heading_detector::{HeadingLevel, OutlineLevel};
use crate::layout::line::Line;
use crate::layout::paragraph::ParagraphSegmenter;
use crate::pipeline::config::{StructureConfig, DEFAULT_EMPTY_TITLE, DEFAULT_UNTITLED_CHAPTER};
use crate::structure::tree::{NodeId, NodeKind, NodeTree};
use crate::structure::types::{Chapter, Paragraph};
use crate::text::normalize::collapse_whitespace;

/// What a chapter-level heading did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterTransition {
    /// A chapter was opened (first chapter, or previous one had content)
    Opened,
    /// The open chapter had no content; the line became a section heading
    Demoted,
}

/// Mutable state of the two-level builder.
#[derive(Debug, Clone)]
pub struct BuilderState {
    chapters: Vec<Chapter>,
    current: Option<Chapter>,
    pending_headers: Vec<String>,
    untitled_chapter_title: String,
    empty_title: String,
}

impl Default for BuilderState {
    fn default() -> Self {
        Self::new(DEFAULT_UNTITLED_CHAPTER, DEFAULT_EMPTY_TITLE)
    }
}

impl BuilderState {
    /// Create an empty state with the given placeholder titles.
    pub fn new(untitled_chapter_title: impl Into<String>, empty_title: impl Into<String>) -> Self {
        Self {
            chapters: Vec::new(),
            current: None,
            pending_headers: Vec::new(),
            untitled_chapter_title: untitled_chapter_title.into(),
            empty_title: empty_title.into(),
        }
    }

    /// Create an empty state using the configured placeholder titles.
    pub fn from_config(config: &StructureConfig) -> Self {
        Self::new(config.untitled_chapter_title.clone(), config.empty_title.clone())
    }

    /// The open chapter has at least one emitted paragraph.
    pub fn chapter_has_content(&self) -> bool {
        self.current.as_ref().is_some_and(Chapter::has_content)
    }

    /// A chapter is open.
    pub fn has_open_chapter(&self) -> bool {
        self.current.is_some()
    }

    /// Headings waiting for the next paragraph.
    pub fn pending_headers(&self) -> &[String] {
        &self.pending_headers
    }

    /// Closed chapters so far.
    pub fn closed_chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    fn title_text(&self, text: &str) -> String {
        let title = collapse_whitespace(text);
        if title.is_empty() {
            self.empty_title.clone()
        } else {
            title
        }
    }

    /// Handle a chapter-level heading line.
    pub fn chapter_heading(&mut self, text: &str) -> ChapterTransition {
        let title = self.title_text(text);
        if self.current.is_some() && !self.chapter_has_content() {
            log::debug!("Heading '{}' follows an empty chapter; kept as section", title);
            self.pending_headers.push(title);
            return ChapterTransition::Demoted;
        }

        self.close_chapter();
        self.current = Some(Chapter::from_heading(title));
        ChapterTransition::Opened
    }

    /// Handle a section-level heading line.
    pub fn section_heading(&mut self, text: &str) {
        let title = self.title_text(text);
        self.pending_headers.push(title);
    }

    /// Append paragraphs to the open chapter; pending headings go to the first one.
    ///
    /// Opens the implicit untitled chapter when no chapter is open.
    pub fn push_paragraphs<I>(&mut self, texts: I)
    where
        I: IntoIterator<Item = String>,
    {
        for text in texts {
            if text.is_empty() {
                continue;
            }
            let headers = std::mem::take(&mut self.pending_headers);
            self.current_chapter().paragraphs.push(Paragraph::new(headers, text));
        }
    }

    fn current_chapter(&mut self) -> &mut Chapter {
        let untitled = &self.untitled_chapter_title;
        self.current
            .get_or_insert_with(|| Chapter::untitled(untitled.clone()))
    }

    fn flush_orphan_headers(&mut self) {
        if self.pending_headers.is_empty() {
            return;
        }
        let headers = std::mem::take(&mut self.pending_headers);
        self.current_chapter().paragraphs.push(Paragraph::new(headers, ""));
    }

    fn close_chapter(&mut self) {
        if self.current.is_some() {
            self.flush_orphan_headers();
        }
        if let Some(chapter) = self.current.take() {
            self.chapters.push(chapter);
        }
    }

    /// Close everything and return the chapters.
    ///
    /// Headings never followed by text become an empty-text paragraph.
    pub fn finish(mut self) -> Vec<Chapter> {
        self.flush_orphan_headers();
        self.close_chapter();
        self.chapters
    }
}

/// Two-level builder producing chapters of paragraphs.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    state: BuilderState,
    segmenter: ParagraphSegmenter,
    buffer: Vec<Line>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(BuilderState::default(), ParagraphSegmenter::default())
    }
}

impl DocumentBuilder {
    /// Create a builder from a state and a segmenter.
    pub fn new(state: BuilderState, segmenter: ParagraphSegmenter) -> Self {
        Self {
            state,
            segmenter,
            buffer: Vec::new(),
        }
    }

    /// Create a builder from a run configuration.
    pub fn from_config(config: &StructureConfig) -> Self {
        Self::new(
            BuilderState::from_config(config),
            ParagraphSegmenter::new(config.paragraphs.join),
        )
    }

    /// Current state.
    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Feed one classified line.
    pub fn push_line(&mut self, line: &Line, level: HeadingLevel) {
        match level {
            HeadingLevel::Chapter => {
                self.flush();
                self.state.chapter_heading(&line.text);
            },
            HeadingLevel::Section => {
                self.flush();
                self.state.section_heading(&line.text);
            },
            HeadingLevel::Body => self.buffer.push(line.clone()),
        }
    }

    /// Segment buffered body lines into paragraphs.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let paragraphs = self.segmenter.segment(&self.buffer);
        self.buffer.clear();
        self.state.push_paragraphs(paragraphs);
    }

    /// Finish the document.
    pub fn finish(mut self) -> Vec<Chapter> {
        self.flush();
        self.state.finish()
    }
}

/// N-level builder producing a [`NodeTree`] of chapters, parts and blocks.
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    tree: NodeTree,
    chapter: Option<NodeId>,
    part: Option<NodeId>,
    block: Option<NodeId>,
    chapter_texts: usize,
    segmenter: ParagraphSegmenter,
    buffer: Vec<Line>,
    untitled_chapter_title: String,
    empty_title: String,
}

impl OutlineBuilder {
    /// Create a builder for a document.
    pub fn new(source_file: impl Into<String>, segmenter: ParagraphSegmenter) -> Self {
        Self {
            tree: NodeTree::new(source_file),
            chapter: None,
            part: None,
            block: None,
            chapter_texts: 0,
            segmenter,
            buffer: Vec::new(),
            untitled_chapter_title: DEFAULT_UNTITLED_CHAPTER.to_string(),
            empty_title: DEFAULT_EMPTY_TITLE.to_string(),
        }
    }

    /// Create a builder from a run configuration.
    pub fn from_config(source_file: impl Into<String>, config: &StructureConfig) -> Self {
        let mut builder = Self::new(source_file, ParagraphSegmenter::new(config.paragraphs.join));
        builder.untitled_chapter_title = config.untitled_chapter_title.clone();
        builder.empty_title = config.empty_title.clone();
        builder
    }

    /// The open chapter has at least one text leaf.
    pub fn chapter_has_content(&self) -> bool {
        self.chapter.is_some() && self.chapter_texts > 0
    }

    fn title_text(&self, text: &str) -> String {
        let title = collapse_whitespace(text);
        if title.is_empty() {
            self.empty_title.clone()
        } else {
            title
        }
    }

    /// Feed one classified line.
    pub fn push_line(&mut self, line: &Line, level: OutlineLevel) {
        match level {
            OutlineLevel::Chapter => {
                self.flush();
                if self.chapter.is_some() && !self.chapter_has_content() {
                    self.open_part(&line.text);
                } else {
                    self.open_chapter(&line.text);
                }
            },
            OutlineLevel::Part => {
                self.flush();
                self.open_part(&line.text);
            },
            OutlineLevel::Block => {
                self.flush();
                if !self.continue_block_title(&line.text) {
                    self.open_block(&line.text);
                }
            },
            OutlineLevel::Body => self.buffer.push(line.clone()),
        }
    }

    fn open_chapter(&mut self, text: &str) {
        let title = self.title_text(text);
        let root = self.tree.root();
        let id = self.tree.append(
            root,
            NodeKind::Chapter {
                headers: vec![title.clone()],
                title,
            },
        );
        self.chapter = Some(id);
        self.part = None;
        self.block = None;
        self.chapter_texts = 0;
    }

    fn ensure_chapter(&mut self) -> NodeId {
        if let Some(id) = self.chapter {
            return id;
        }
        let root = self.tree.root();
        let id = self.tree.append(
            root,
            NodeKind::Chapter {
                title: self.untitled_chapter_title.clone(),
                headers: Vec::new(),
            },
        );
        self.chapter = Some(id);
        self.chapter_texts = 0;
        id
    }

    fn open_part(&mut self, text: &str) {
        let title = self.title_text(text);
        let chapter = self.ensure_chapter();
        self.part = Some(self.tree.append(chapter, NodeKind::Part { title }));
        self.block = None;
    }

    fn open_block(&mut self, text: &str) {
        let title = self.title_text(text);
        let parent = match self.part {
            Some(part) => part,
            None => self.ensure_chapter(),
        };
        self.block = Some(self.tree.append(parent, NodeKind::Block { title }));
    }

    /// A lowercase line right after an empty block continues its title.
    fn continue_block_title(&mut self, text: &str) -> bool {
        let Some(block) = self.block else {
            return false;
        };
        if !self.tree.children(block).is_empty() {
            return false;
        }
        let text = collapse_whitespace(text);
        if !text.chars().next().is_some_and(char::is_lowercase) {
            return false;
        }
        match self.tree.title_mut(block) {
            Some(title) => {
                title.push(' ');
                title.push_str(&text);
                true
            },
            None => false,
        }
    }

    /// Segment buffered body lines into text leaves of the innermost open node.
    pub fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let paragraphs = self.segmenter.segment(&self.buffer);
        self.buffer.clear();
        if paragraphs.is_empty() {
            return;
        }

        let parent = match (self.block, self.part) {
            (Some(block), _) => block,
            (None, Some(part)) => part,
            (None, None) => self.ensure_chapter(),
        };
        for text in paragraphs {
            self.tree.append(parent, NodeKind::Text { text });
            self.chapter_texts += 1;
        }
    }

    /// Finish the tree.
    pub fn finish(mut self) -> NodeTree {
        self.flush();
        self.tree
    }
}
