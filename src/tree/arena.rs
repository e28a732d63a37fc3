//! Plain owned content tree
//!
//! Uses NodeId (index into an arena) for compact, copyable node references.
//! Detached nodes stay in the arena but are unreachable from the document.

use super::{ContentTree, NodeKind};

/// Compact node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ArenaNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    name: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    text: Option<String>,
}

impl ArenaNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            name: None,
            id: None,
            classes: Vec::new(),
            text: None,
        }
    }
}

/// Arena-backed document tree
#[derive(Debug, Clone)]
pub struct ArenaTree {
    nodes: Vec<ArenaNode>,
}

impl Default for ArenaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![ArenaNode::new(NodeKind::Document)],
        }
    }

    fn node(&self, id: NodeId) -> &ArenaNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ArenaNode {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, node: ArenaNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Insert a detached node under `parent` at `position` (clamped)
    fn attach(&mut self, parent: NodeId, position: usize, child: NodeId) {
        let children = &mut self.node_mut(parent).children;
        let position = position.min(children.len());
        children.insert(position, child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let position = self.node(parent).children.len();
        self.insert_element(parent, position, name)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let position = self.node(parent).children.len();
        self.insert_text(parent, position, text)
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        let mut node = ArenaNode::new(NodeKind::Other);
        node.text = Some(text.to_string());
        let id = self.alloc(node);
        let position = self.node(parent).children.len();
        self.attach(parent, position, id);
        id
    }

    pub fn insert_element(&mut self, parent: NodeId, position: usize, name: &str) -> NodeId {
        let mut node = ArenaNode::new(NodeKind::Element);
        node.name = Some(name.to_string());
        let id = self.alloc(node);
        self.attach(parent, position, id);
        id
    }

    pub fn insert_text(&mut self, parent: NodeId, position: usize, text: &str) -> NodeId {
        let mut node = ArenaNode::new(NodeKind::Text);
        node.text = Some(text.to_string());
        let id = self.alloc(node);
        self.attach(parent, position, id);
        id
    }

    /// Detach `node` (and its subtree) from its parent
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|&child| child != node);
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).text = Some(text.to_string());
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.node_mut(node).id = Some(id.to_string());
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).classes.push(class.to_string());
    }
}

impl ContentTree for ArenaTree {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.node(node).kind
    }

    fn element_id(&self, node: NodeId) -> Option<&str> {
        self.node(node).id.as_deref()
    }

    fn local_name(&self, node: NodeId) -> Option<&str> {
        self.node(node).name.as_deref()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        let node = self.node(node);
        match node.kind {
            NodeKind::Text => node.text.as_deref(),
            _ => None,
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }
}
