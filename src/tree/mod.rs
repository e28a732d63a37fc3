//! Content tree abstraction
//!
//! The resolver never touches a concrete DOM. It reads a document through
//! [`ContentTree`], which exposes just enough structure to count siblings,
//! follow ID assertions and measure text. Two adapters are provided:
//!
//! - [`arena::ArenaTree`]: a plain owned tree, built programmatically
//! - [`html::HtmlTree`]: a parsed (X)HTML document backed by `scraper`
//!
//! All lengths and offsets are in UTF-16 code units, the unit browser DOM
//! ranges use and that stored CFIs are expressed in.

pub mod arena;
pub mod html;

pub use arena::{ArenaTree, NodeId};
pub use html::HtmlTree;

use std::fmt::Debug;

/// Node kinds the resolver distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document node above the root element
    Document,
    Element,
    Text,
    /// Comments, processing instructions, doctypes
    Other,
}

/// Length of a string in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Read-only view of a document tree
pub trait ContentTree {
    /// Cheap handle to a node of this tree
    type Node: Copy + Eq + Debug;

    /// The document node
    fn document(&self) -> Self::Node;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Child nodes in document order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Value of the element's `id` attribute
    fn element_id(&self, node: Self::Node) -> Option<&str>;

    /// Local tag name of an element
    fn local_name(&self, node: Self::Node) -> Option<&str>;

    /// Character data of a text node
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Whether an element carries `class` in its class list
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    fn text_len(&self, node: Self::Node) -> usize {
        self.text(node).map(utf16_len).unwrap_or(0)
    }

    fn element_children(&self, node: Self::Node) -> Vec<Self::Node> {
        self.children(node)
            .into_iter()
            .filter(|&child| self.kind(child) == NodeKind::Element)
            .collect()
    }

    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let siblings = self.children(self.parent(node)?);
        let pos = siblings.iter().position(|&n| n == node)?;
        pos.checked_sub(1).map(|prev| siblings[prev])
    }

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let siblings = self.children(self.parent(node)?);
        let pos = siblings.iter().position(|&n| n == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Root element (`<html>`)
    fn document_element(&self) -> Option<Self::Node> {
        self.element_children(self.document()).into_iter().next()
    }

    /// `node` and all of its descendants, in document order
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Text nodes under `node`, in document order
    fn text_nodes(&self, node: Self::Node) -> Vec<Self::Node> {
        self.descendants(node)
            .into_iter()
            .filter(|&n| self.kind(n) == NodeKind::Text)
            .collect()
    }

    /// Length of all text under `node`
    fn text_content_len(&self, node: Self::Node) -> usize {
        match self.kind(node) {
            NodeKind::Text => self.text_len(node),
            NodeKind::Other => 0,
            _ => self
                .text_nodes(node)
                .into_iter()
                .map(|text| self.text_len(text))
                .sum(),
        }
    }

    /// First element whose `id` attribute equals `id`
    fn element_by_id(&self, id: &str) -> Option<Self::Node> {
        self.descendants(self.document())
            .into_iter()
            .find(|&n| self.kind(n) == NodeKind::Element && self.element_id(n) == Some(id))
    }

    /// First element with the given local name
    fn find_element(&self, name: &str) -> Option<Self::Node> {
        self.descendants(self.document())
            .into_iter()
            .find(|&n| self.local_name(n).is_some_and(|local| local.eq_ignore_ascii_case(name)))
    }

    /// Whether any element in the document carries `class`
    fn contains_class(&self, class: &str) -> bool {
        self.descendants(self.document())
            .into_iter()
            .any(|n| self.has_class(n, class))
    }
}

/// A position in a tree: a container plus an offset.
///
/// For text containers the offset counts UTF-16 code units, for elements it
/// counts child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point<N> {
    pub container: N,
    pub offset: usize,
}

impl<N> Point<N> {
    pub fn new(container: N, offset: usize) -> Self {
        Self { container, offset }
    }
}

/// A span between two points of the same tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange<N> {
    pub start: Point<N>,
    pub end: Point<N>,
}

impl<N: Copy + Eq> TextRange<N> {
    pub fn new(start: Point<N>, end: Point<N>) -> Self {
        Self { start, end }
    }

    /// Empty range at `point`
    pub fn caret(point: Point<N>) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}
