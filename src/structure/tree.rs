//! Arena-backed N-level document tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`], so the
//! builder can keep a stack of open node ids while appending children.
//!
//! Serialized shape:
//!
//! ```json
//! {"source_file": "book.pdf",
//!  "content": [{"type": "chapter", "title": "...", "headers": ["..."],
//!               "content": [{"type": "part", "title": "...", "content": [
//!                   {"type": "block", "title": "...", "content": [
//!                       {"type": "text", "text": "..."}]}]}]}]}
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Index of a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Tree root
    Document {
        /// Source file name or path
        source_file: String,
    },
    /// Top-level heading
    Chapter {
        /// Chapter title
        title: String,
        /// Heading lines of the chapter
        headers: Vec<String>,
    },
    /// Second-level heading
    Part {
        /// Part title
        title: String,
    },
    /// Third-level heading
    Block {
        /// Block title
        title: String,
    },
    /// Paragraph text leaf
    Text {
        /// Normalized paragraph text
        text: String,
    },
}

impl NodeKind {
    /// Serialized `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Document { .. } => "document",
            NodeKind::Chapter { .. } => "chapter",
            NodeKind::Part { .. } => "part",
            NodeKind::Block { .. } => "block",
            NodeKind::Text { .. } => "text",
        }
    }

    /// Title of a heading node.
    pub fn title(&self) -> Option<&str> {
        match self {
            NodeKind::Chapter { title, .. } | NodeKind::Part { title } | NodeKind::Block { title } => {
                Some(title.as_str())
            },
            _ => None,
        }
    }
}

/// A node with its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node payload
    pub kind: NodeKind,
    /// Parent node; `None` for the root
    pub parent: Option<NodeId>,
    /// Children in order
    pub children: Vec<NodeId>,
}

/// Document tree stored in an arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Create a tree holding only the document root.
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document {
                    source_file: source_file.into(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Node payload by id.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Append a child node and return its id.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Mutable title of a heading node.
    pub fn title_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Chapter { title, .. } | NodeKind::Part { title } | NodeKind::Block { title } => {
                Some(title)
            },
            _ => None,
        }
    }

    /// Ids of all nodes with the given `type` tag, in creation order.
    pub fn find_by_type(&self, type_name: &str) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.kind(*id).type_name() == type_name)
            .collect()
    }

    /// Text of all leaves under a node, depth-first.
    pub fn texts_under(&self, id: NodeId) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(id, &mut out);
        out
    }

    fn collect_texts<'a>(&'a self, id: NodeId, out: &mut Vec<&'a str>) {
        if let NodeKind::Text { text } = self.kind(id) {
            out.push(text.as_str());
        }
        for child in self.children(id) {
            self.collect_texts(*child, out);
        }
    }
}

struct NodeView<'a> {
    tree: &'a NodeTree,
    id: NodeId,
}

struct ChildrenView<'a> {
    tree: &'a NodeTree,
    id: NodeId,
}

impl Serialize for ChildrenView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.tree.children(self.id);
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for child in children {
            seq.serialize_element(&NodeView {
                tree: self.tree,
                id: *child,
            })?;
        }
        seq.end()
    }
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let content = ChildrenView {
            tree: self.tree,
            id: self.id,
        };
        let kind = self.tree.kind(self.id);
        let mut map = serializer.serialize_map(None)?;
        match kind {
            NodeKind::Document { source_file } => {
                map.serialize_entry("source_file", source_file)?;
                map.serialize_entry("content", &content)?;
            },
            NodeKind::Chapter { title, headers } => {
                map.serialize_entry("type", kind.type_name())?;
                map.serialize_entry("title", title)?;
                map.serialize_entry("headers", headers)?;
                map.serialize_entry("content", &content)?;
            },
            NodeKind::Part { title } | NodeKind::Block { title } => {
                map.serialize_entry("type", kind.type_name())?;
                map.serialize_entry("title", title)?;
                map.serialize_entry("content", &content)?;
            },
            NodeKind::Text { text } => {
                map.serialize_entry("type", kind.type_name())?;
                map.serialize_entry("text", text)?;
            },
        }
        map.end()
    }
}

impl Serialize for NodeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView {
            tree: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}
