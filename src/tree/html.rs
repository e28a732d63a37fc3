//! DOM-backed content tree
//!
//! Wraps a `scraper` document so CFIs can be generated and resolved against
//! real chapter markup. Parsing follows the HTML5 algorithm, so the tree has
//! the same shape a browser would build for the chapter.

use ego_tree::NodeId;
use scraper::{Html, Node};

use super::{ContentTree, NodeKind};

/// Parsed (X)HTML content document
#[derive(Debug, Clone)]
pub struct HtmlTree {
    html: Html,
}

impl HtmlTree {
    /// Parse a full content document
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Wrap an already parsed document
    pub fn from_html(html: Html) -> Self {
        Self { html }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    fn value(&self, node: NodeId) -> Option<&Node> {
        self.html.tree.get(node).map(|n| n.value())
    }
}

impl ContentTree for HtmlTree {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        self.html.tree.root().id()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.html.tree.get(node)?.parent().map(|parent| parent.id())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(node)
            .map(|n| n.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.value(node) {
            Some(Node::Document) | Some(Node::Fragment) => NodeKind::Document,
            Some(Node::Element(_)) => NodeKind::Element,
            Some(Node::Text(_)) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn element_id(&self, node: NodeId) -> Option<&str> {
        self.value(node)?.as_element()?.id()
    }

    fn local_name(&self, node: NodeId) -> Option<&str> {
        Some(self.value(node)?.as_element()?.name())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match self.value(node)? {
            Node::Text(text) => Some(&**text),
            _ => None,
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.value(node)
            .and_then(|value| value.as_element())
            .is_some_and(|element| element.classes().any(|c| c == class))
    }
}
