//! CFI resolution against a content tree
//!
//! Converts in both directions between CFIs and tree positions:
//!
//! - [`Resolver::from_node`] / [`Resolver::from_range`]: walk up from a node
//!   to the document element, emitting one step per ancestor.
//! - [`Resolver::find_node`] / [`Resolver::to_range`]: walk down the steps
//!   from the document element.
//!
//! # Ignored markup
//!
//! Reading systems inject elements into chapters (highlights, search hits).
//! When an ignore class is configured and present in the tree, elements
//! carrying it are transparent: they produce no step, their text is merged
//! with adjacent text nodes into one logical text node, and offsets are
//! counted from the start of that merged run. A CFI generated before the
//! injection resolves to the same characters after it, and vice versa.
//!
//! # Drift
//!
//! When the tree changed since the CFI was made, an offset can overrun its
//! text node or a text step can point past the last text run. The resolver
//! then rescans the parent's runs ([`Resolver::fix_miss`]). If even the parent
//! cannot be found the result is `None`.

use thiserror::Error;
use tracing::{trace, warn};

use super::generator::hoist_common;
use super::types::*;
use crate::tree::{ContentTree, NodeKind, Point, TextRange};

/// Misuse of the resolver API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Offset anchor must be a text node")]
    NotTextNode,
}

/// Maps CFIs onto one content tree
#[derive(Debug)]
pub struct Resolver<'t, T: ContentTree> {
    tree: &'t T,
    /// Set only when the class actually occurs in the tree
    ignore_class: Option<String>,
}

impl<'t, T: ContentTree> Resolver<'t, T> {
    pub fn new(tree: &'t T) -> Self {
        Self {
            tree,
            ignore_class: None,
        }
    }

    /// Treat elements with `class` as injected markup
    pub fn with_ignore_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.ignore_class = self.tree.contains_class(&class).then_some(class);
        self
    }

    /// Like [`Resolver::with_ignore_class`], for an optional class
    pub fn with_optional_ignore_class(self, class: Option<&str>) -> Self {
        match class {
            Some(class) => self.with_ignore_class(class),
            None => self,
        }
    }

    pub fn tree(&self) -> &'t T {
        self.tree
    }

    fn ignore(&self) -> Option<&str> {
        self.ignore_class.as_deref()
    }

    fn is_ignored(&self, node: T::Node) -> bool {
        self.ignore().is_some_and(|class| {
            self.tree.kind(node) == NodeKind::Element && self.tree.has_class(node, class)
        })
    }

    // ---------------------------------------------------------------------
    // Tree -> CFI
    // ---------------------------------------------------------------------

    /// CFI pointing at `node` itself, no offset
    pub fn from_node(&self, node: T::Node, base: &Segment) -> Cfi {
        Cfi::new(base.clone(), self.path_to(node, None))
    }

    /// CFI for a point; text offsets are patched for ignored markup
    pub fn from_point(&self, point: Point<T::Node>, base: &Segment) -> Cfi {
        let offset = self.patched(point);
        Cfi::new(base.clone(), self.path_to(point.container, Some(offset)))
    }

    /// CFI for a range. A collapsed range yields a point CFI.
    pub fn from_range(&self, range: &TextRange<T::Node>, base: &Segment) -> Cfi {
        if range.is_collapsed() {
            return self.from_point(range.start, base);
        }

        let start = self.path_to(range.start.container, Some(self.patched(range.start)));
        let end = self.path_to(range.end.container, Some(self.patched(range.end)));
        hoist_common(base.clone(), start, end)
    }

    fn patched(&self, point: Point<T::Node>) -> usize {
        if self.ignore().is_some() && self.tree.kind(point.container) == NodeKind::Text {
            self.patch_offset(point.container, point.offset)
                .unwrap_or(point.offset)
        } else {
            point.offset
        }
    }

    /// Steps from the document element down to `node`
    fn path_to(&self, node: T::Node, offset: Option<usize>) -> Segment {
        let mut steps = Vec::new();
        let mut current = node;

        while let Some(parent) = self.tree.parent(current) {
            if self.tree.kind(parent) == NodeKind::Document {
                break;
            }
            let step = if self.ignore().is_some() {
                self.filtered_step(current)
            } else {
                self.step(current)
            };
            if let Some(step) = step {
                steps.push(step);
            }
            current = parent;
        }
        steps.reverse();

        let mut segment = Segment::with_steps(steps);
        if let Some(offset) = offset {
            segment.terminal.offset = Some(offset);
            // Offsets must land in a text node
            if !segment.last_step().is_some_and(Step::is_text) {
                segment.push(Step::text(0));
            }
        }
        segment
    }

    fn step(&self, node: T::Node) -> Option<Step> {
        let index = self.position(node)?;
        Some(self.make_step(node, index))
    }

    fn filtered_step(&self, node: T::Node) -> Option<Step> {
        let node = self.filter(node)?;
        let index = self.filtered_position(node)?;
        Some(self.make_step(node, index))
    }

    fn make_step(&self, node: T::Node, index: usize) -> Step {
        match self.tree.kind(node) {
            NodeKind::Text => Step::text(index),
            _ => Step {
                kind: StepKind::Element,
                index,
                id: self.tree.element_id(node).map(str::to_string),
            },
        }
    }

    /// Node that stands for `node` in a filtered path, if any.
    ///
    /// Ignored elements vanish. Text inside an ignored element is represented
    /// by an adjacent real text node when there is one.
    fn filter(&self, node: T::Node) -> Option<T::Node> {
        match self.tree.kind(node) {
            NodeKind::Text => {
                let Some(parent) = self.tree.parent(node).filter(|&p| self.is_ignored(p)) else {
                    return Some(node);
                };
                let is_text = |n: &T::Node| self.tree.kind(*n) == NodeKind::Text;
                self.tree
                    .previous_sibling(parent)
                    .filter(is_text)
                    .or_else(|| self.tree.next_sibling(parent).filter(is_text))
                    .or(Some(node))
            }
            _ if self.is_ignored(node) => None,
            _ => Some(node),
        }
    }

    /// Index among same-kind siblings, without filtering
    pub fn position(&self, node: T::Node) -> Option<usize> {
        let parent = self.tree.parent(node)?;
        let kind = self.tree.kind(node);
        match kind {
            NodeKind::Element | NodeKind::Text => self
                .tree
                .children(parent)
                .into_iter()
                .filter(|&sibling| self.tree.kind(sibling) == kind)
                .position(|sibling| sibling == node),
            _ => None,
        }
    }

    fn filtered_position(&self, node: T::Node) -> Option<usize> {
        let mut anchor = node;
        let mut parent = self.tree.parent(anchor)?;

        let (children, kind) = match self.tree.kind(anchor) {
            NodeKind::Element => (self.tree.element_children(parent), NodeKind::Element),
            NodeKind::Text => {
                // Inside an ignored node: position of the ignored node itself
                if self.is_ignored(parent) {
                    anchor = parent;
                    parent = self.tree.parent(anchor)?;
                }
                (self.tree.children(parent), NodeKind::Text)
            }
            _ => return None,
        };

        let map = self.normalized_map(&children, kind);
        let index = children.iter().position(|&child| child == anchor)?;
        map[index]
    }

    /// Logical index of each child for the requested kind.
    ///
    /// Ignored elements count as text, and consecutive text entries share one
    /// index. Entries of other kinds map to `None`.
    pub fn normalized_map(&self, children: &[T::Node], kind: NodeKind) -> Vec<Option<usize>> {
        let mut output = vec![None; children.len()];
        let mut prev_index: Option<usize> = None;
        let mut prev_kind: Option<NodeKind> = None;

        for (i, &child) in children.iter().enumerate() {
            let mut current = self.tree.kind(child);
            if self.is_ignored(child) {
                current = NodeKind::Text;
            }

            if kind == NodeKind::Text && current == NodeKind::Text && prev_kind == Some(NodeKind::Text)
            {
                output[i] = prev_index;
            } else if current == kind {
                let next = prev_index.map_or(0, |prev| prev + 1);
                prev_index = Some(next);
                output[i] = Some(next);
            }
            prev_kind = Some(current);
        }

        output
    }

    /// Offset of `anchor`'s `offset` measured from the start of its merged run
    pub fn patch_offset(&self, anchor: T::Node, offset: usize) -> Result<usize, ResolveError> {
        if self.tree.kind(anchor) != NodeKind::Text {
            return Err(ResolveError::NotTextNode);
        }
        if self.ignore().is_none() {
            return Ok(offset);
        }

        let mut current = anchor;
        let mut total = offset;

        if let Some(parent) = self.tree.parent(anchor).filter(|&p| self.is_ignored(p)) {
            current = parent;
        }

        while let Some(prev) = self.tree.previous_sibling(current) {
            if self.tree.kind(prev) == NodeKind::Element && !self.is_ignored(prev) {
                break;
            }
            total += self.tree.text_content_len(prev);
            current = prev;
        }

        Ok(total)
    }

    // ---------------------------------------------------------------------
    // CFI -> tree
    // ---------------------------------------------------------------------

    /// Walk `steps` down from the document element.
    ///
    /// Element steps with an ID assertion are looked up by ID first and fall
    /// back to their index.
    pub fn find_node<'s, I>(&self, steps: I) -> Option<T::Node>
    where
        I: IntoIterator<Item = &'s Step>,
    {
        let mut container = self.tree.document_element()?;

        for step in steps {
            container = match step.kind {
                StepKind::Element => step
                    .id
                    .as_deref()
                    .and_then(|id| self.tree.element_by_id(id))
                    .or_else(|| self.element_child(container, step.index))?,
                StepKind::Text => self.text_child(container, step.index)?,
            };
        }

        Some(container)
    }

    /// The `index`-th element child, not counting ignored elements
    fn element_child(&self, container: T::Node, index: usize) -> Option<T::Node> {
        let children = self.tree.element_children(container);
        if self.ignore().is_some() {
            let map = self.normalized_map(&children, NodeKind::Element);
            let at = map.iter().position(|&entry| entry == Some(index))?;
            return Some(children[at]);
        }
        children.get(index).copied()
    }

    /// The `index`-th text child. With filtering active this is the first
    /// node of the `index`-th merged run.
    fn text_child(&self, container: T::Node, index: usize) -> Option<T::Node> {
        let children = self.tree.children(container);
        if self.ignore().is_some() {
            let map = self.normalized_map(&children, NodeKind::Text);
            let at = map.iter().position(|&entry| entry == Some(index))?;
            return Some(children[at]);
        }
        children
            .into_iter()
            .filter(|&child| self.tree.kind(child) == NodeKind::Text)
            .nth(index)
    }

    /// Resolve a CFI to a range. Point CFIs give a collapsed range.
    pub fn to_range(&self, cfi: &Cfi) -> Option<TextRange<T::Node>> {
        let start_steps: Vec<&Step> = cfi.start_steps().collect();
        let Some(start) = self.resolve_point(&start_steps, cfi.start_terminal()) else {
            warn!("No start container found for {}", cfi);
            return None;
        };

        if !cfi.is_range() {
            return Some(TextRange::caret(start));
        }

        let end_steps: Vec<&Step> = cfi.end_steps().collect();
        match self.resolve_point(&end_steps, cfi.end_terminal()) {
            Some(end) => Some(TextRange::new(start, end)),
            None => Some(TextRange::caret(start)),
        }
    }

    /// Resolve a CFI to a single point (the start of a range)
    pub fn to_point(&self, cfi: &Cfi) -> Option<Point<T::Node>> {
        let steps: Vec<&Step> = cfi.start_steps().collect();
        self.resolve_point(&steps, cfi.start_terminal())
    }

    fn resolve_point(&self, steps: &[&Step], terminal: &Terminal) -> Option<Point<T::Node>> {
        let offset = terminal.offset.unwrap_or(0);
        let ends_in_text = steps.last().is_some_and(|step| step.is_text());

        let Some(container) = self.find_node(steps.iter().copied()) else {
            return if ends_in_text {
                self.fix_miss(steps, offset)
            } else {
                None
            };
        };

        match self.tree.kind(container) {
            NodeKind::Text if offset <= self.tree.text_len(container) => {
                Some(Point::new(container, offset))
            }
            _ if ends_in_text => self.fix_miss(steps, offset),
            // Element offsets count children
            _ => {
                let max = self.tree.children(container).len();
                Some(Point::new(container, offset.min(max)))
            }
        }
    }

    /// Repair a text step whose node or offset no longer matches the tree.
    ///
    /// Scans the parent's text runs for the step's logical index and walks the
    /// offset across the run's nodes. An index past the last run falls back to
    /// the end of the nearest preceding run.
    pub fn fix_miss(&self, steps: &[&Step], offset: usize) -> Option<Point<T::Node>> {
        let (last, parent_steps) = steps.split_last()?;
        let container = self.find_node(parent_steps.iter().copied())?;
        let children = self.tree.children(container);
        let map = self.normalized_map(&children, NodeKind::Text);

        let target = map
            .iter()
            .flatten()
            .copied()
            .filter(|&index| index <= last.index)
            .max()?;

        let mut remaining = if target == last.index { offset } else { usize::MAX };
        let mut last_in_run = None;

        for (child, entry) in children.iter().copied().zip(map.iter()) {
            if *entry != Some(target) {
                continue;
            }
            let len = self.tree.text_content_len(child);
            if remaining > len {
                remaining -= len;
                last_in_run = Some(child);
                continue;
            }
            trace!(index = last.index, offset, "Repaired CFI miss");
            return Some(self.text_anchor(child, remaining));
        }

        // Ran past the end of the run: clamp to its last character
        let child = last_in_run?;
        let anchor = self.text_anchor(child, usize::MAX);
        trace!(index = last.index, offset, "Clamped CFI miss to end of run");
        Some(anchor)
    }

    /// Point inside `node` at `offset`, descending into an element's text
    fn text_anchor(&self, node: T::Node, offset: usize) -> Point<T::Node> {
        let text = match self.tree.kind(node) {
            NodeKind::Text => Some(node),
            _ => self.tree.text_nodes(node).into_iter().next(),
        };
        match text {
            Some(text) => Point::new(text, offset.min(self.tree.text_len(text))),
            None => Point::new(node, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfi::generator::chapter_component;
    use crate::cfi::parser::parse;
    use crate::tree::{ArenaTree, HtmlTree, NodeId};

    const IGNORE: &str = "annotator-hl";

    fn base() -> Segment {
        chapter_component(2, 1, Some("chap01ref"))
    }

    /// html > (head, body > (p#para05 > "Hello ", em > "brave", " world"))
    struct Fixture {
        tree: ArenaTree,
        p: NodeId,
        hello: NodeId,
        brave: NodeId,
        world: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = ArenaTree::new();
        let html = tree.append_element(tree.document(), "html");
        tree.append_element(html, "head");
        let body = tree.append_element(html, "body");
        let p = tree.append_element(body, "p");
        tree.set_id(p, "para05");
        let hello = tree.append_text(p, "Hello ");
        let em = tree.append_element(p, "em");
        let brave = tree.append_text(em, "brave");
        let world = tree.append_text(p, " world");
        Fixture {
            tree,
            p,
            hello,
            brave,
            world,
        }
    }

    #[test]
    fn test_from_node_element() {
        let f = fixture();
        let cfi = Resolver::new(&f.tree).from_node(f.p, &base());
        assert_eq!(cfi.to_string(), "epubcfi(/6/4[chap01ref]!/4/2[para05])");
    }

    #[test]
    fn test_from_point_text() {
        let f = fixture();
        let resolver = Resolver::new(&f.tree);
        let cfi = resolver.from_point(Point::new(f.world, 3), &base());
        // " world" is the second text child of <p>
        assert_eq!(cfi.to_string(), "epubcfi(/6/4[chap01ref]!/4/2[para05]/3:3)");

        let nested = resolver.from_point(Point::new(f.brave, 0), &base());
        assert_eq!(nested.to_string(), "epubcfi(/6/4[chap01ref]!/4/2[para05]/2/1:0)");
    }

    #[test]
    fn test_element_point_gets_text_step() {
        let f = fixture();
        let cfi = Resolver::new(&f.tree).from_point(Point::new(f.p, 0), &base());
        assert_eq!(cfi.to_string(), "epubcfi(/6/4[chap01ref]!/4/2[para05]/1:0)");
    }

    #[test]
    fn test_from_range_hoists_common_steps() {
        let f = fixture();
        let range = TextRange::new(Point::new(f.hello, 1), Point::new(f.world, 4));
        let cfi = Resolver::new(&f.tree).from_range(&range, &base());
        assert_eq!(cfi.to_string(), "epubcfi(/6/4[chap01ref]!/4/2[para05],/1:1,/3:4)");
    }

    #[test]
    fn test_collapsed_range_is_point() {
        let f = fixture();
        let point = Point::new(f.hello, 2);
        let cfi = Resolver::new(&f.tree).from_range(&TextRange::caret(point), &base());
        assert!(!cfi.is_range());
        assert_eq!(cfi.path.terminal.offset, Some(2));
    }

    #[test]
    fn test_roundtrip_through_tree() {
        let f = fixture();
        let resolver = Resolver::new(&f.tree);
        let range = TextRange::new(Point::new(f.hello, 1), Point::new(f.brave, 3));
        let cfi = resolver.from_range(&range, &base());
        let reparsed = parse(&cfi.to_string()).unwrap();
        assert_eq!(resolver.to_range(&reparsed), Some(range));
    }

    #[test]
    fn test_find_node_by_index_and_id() {
        let f = fixture();
        let resolver = Resolver::new(&f.tree);

        let cfi = parse("epubcfi(/6/4!/4/2/2/1:0)").unwrap();
        assert_eq!(resolver.find_node(&cfi.path.steps), Some(f.brave));

        // The ID wins over a stale index
        let cfi = parse("epubcfi(/6/4!/4/8[para05]/3:1)").unwrap();
        assert_eq!(resolver.find_node(&cfi.path.steps), Some(f.world));

        // Unknown ID falls back to the index
        let cfi = parse("epubcfi(/6/4!/4/2[gone]/1)").unwrap();
        assert_eq!(resolver.find_node(&cfi.path.steps), Some(f.hello));
    }

    #[test]
    fn test_to_range_missing_returns_none() {
        let f = fixture();
        let cfi = parse("epubcfi(/6/4!/4/20/2)").unwrap();
        assert_eq!(Resolver::new(&f.tree).to_range(&cfi), None);
    }

    #[test]
    fn test_to_range_without_offset_starts_at_zero() {
        let f = fixture();
        let cfi = parse("epubcfi(/6/4!/4/2)").unwrap();
        let range = Resolver::new(&f.tree).to_range(&cfi).unwrap();
        assert_eq!(range.start, Point::new(f.p, 0));
        assert!(range.is_collapsed());
    }

    #[test]
    fn test_offset_overrun_is_repaired() {
        let mut f = fixture();
        let cfi = parse("epubcfi(/6/4!/4/2/1:4)").unwrap();

        // Text was split after the CFI was generated
        f.tree.set_text(f.hello, "He");
        let p = f.p;
        f.tree.insert_text(p, 1, "llo ");

        let resolver = Resolver::new(&f.tree);
        let point = resolver.to_point(&cfi).unwrap();
        // Offset 4 of "Hello " is offset 2 of the second half
        assert_eq!(f.tree.text(point.container), Some("llo "));
        assert_eq!(point.offset, 2);
    }

    #[test]
    fn test_index_overrun_clamps_to_last_run() {
        let mut f = fixture();
        let cfi = parse("epubcfi(/6/4!/4/2/3:2)").unwrap();

        // The second text run disappeared
        f.tree.remove(f.world);

        let point = Resolver::new(&f.tree).to_point(&cfi).unwrap();
        assert_eq!(point, Point::new(f.hello, 6));
    }

    #[test]
    fn test_miss_without_parent_is_none() {
        let f = fixture();
        let cfi = parse("epubcfi(/6/4!/4/40/3:2)").unwrap();
        assert_eq!(Resolver::new(&f.tree).to_point(&cfi), None);
    }

    /// body > p > ("abc", span.annotator-hl > "def", "ghi")
    fn injected() -> (ArenaTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = ArenaTree::new();
        let html = tree.append_element(tree.document(), "html");
        let body = tree.append_element(html, "body");
        let p = tree.append_element(body, "p");
        let abc = tree.append_text(p, "abc");
        let span = tree.append_element(p, "span");
        tree.add_class(span, IGNORE);
        let def = tree.append_text(span, "def");
        let ghi = tree.append_text(p, "ghi");
        (tree, p, abc, def, ghi)
    }

    #[test]
    fn test_ignored_markup_is_transparent() {
        let (tree, _, _, def, ghi) = injected();
        let resolver = Resolver::new(&tree).with_ignore_class(IGNORE);

        let cfi = resolver.from_point(Point::new(ghi, 1), &base());
        assert_eq!(cfi.path.to_string(), "/2/2/1:7");

        let inside = resolver.from_point(Point::new(def, 1), &base());
        assert_eq!(inside.path.to_string(), "/2/2/1:4");
    }

    #[test]
    fn test_ignored_markup_resolves_across_run() {
        let (tree, _, _, def, ghi) = injected();
        let resolver = Resolver::new(&tree).with_ignore_class(IGNORE);

        let cfi = parse("epubcfi(/6/4!/2/2/1:7)").unwrap();
        assert_eq!(resolver.to_point(&cfi), Some(Point::new(ghi, 1)));

        let cfi = parse("epubcfi(/6/4!/2/2/1:4)").unwrap();
        assert_eq!(resolver.to_point(&cfi), Some(Point::new(def, 1)));
    }

    #[test]
    fn test_cfi_stable_across_injection() {
        // Same paragraph without the injected span
        let mut plain = ArenaTree::new();
        let html = plain.append_element(plain.document(), "html");
        let body = plain.append_element(html, "body");
        let p = plain.append_element(body, "p");
        let text = plain.append_text(p, "abcdefghi");
        let before = Resolver::new(&plain).from_point(Point::new(text, 7), &base());

        let (tree, _, _, _, ghi) = injected();
        let after = Resolver::new(&tree)
            .with_ignore_class(IGNORE)
            .from_point(Point::new(ghi, 1), &base());

        assert_eq!(before, after);
    }

    #[test]
    fn test_ignore_class_absent_from_tree_is_inactive() {
        let f = fixture();
        let resolver = Resolver::new(&f.tree).with_ignore_class(IGNORE);
        let cfi = resolver.from_point(Point::new(f.world, 0), &base());
        assert_eq!(cfi.path.to_string(), "/4/2[para05]/3:0");
    }

    /// body > p > (span.annotator-hl > "x", em > "y")
    fn injected_before_element() -> (ArenaTree, NodeId, NodeId) {
        let mut tree = ArenaTree::new();
        let html = tree.append_element(tree.document(), "html");
        let body = tree.append_element(html, "body");
        let p = tree.append_element(body, "p");
        let span = tree.append_element(p, "span");
        tree.add_class(span, IGNORE);
        let x = tree.append_text(span, "x");
        let em = tree.append_element(p, "em");
        let y = tree.append_text(em, "y");
        (tree, x, y)
    }

    #[test]
    fn test_ignored_element_skipped_by_element_steps() {
        let (tree, _, y) = injected_before_element();
        let resolver = Resolver::new(&tree).with_ignore_class(IGNORE);

        let cfi = resolver.from_point(Point::new(y, 0), &base());
        assert_eq!(cfi.path.to_string(), "/2/2/2/1:0");
        assert_eq!(resolver.to_point(&cfi), Some(Point::new(y, 0)));
    }

    #[test]
    fn test_element_step_stable_across_injection() {
        // Generated before the span was injected: p > em > "y"
        let cfi = parse("epubcfi(/6/4!/2/2/2/1:0)").unwrap();

        let (tree, x, y) = injected_before_element();
        let point = Resolver::new(&tree)
            .with_ignore_class(IGNORE)
            .to_point(&cfi)
            .unwrap();
        assert_ne!(point.container, x);
        assert_eq!(point, Point::new(y, 0));
    }

    #[test]
    fn test_normalized_map() {
        let (tree, p, ..) = injected();
        let resolver = Resolver::new(&tree).with_ignore_class(IGNORE);
        let children = tree.children(p);
        assert_eq!(
            resolver.normalized_map(&children, NodeKind::Text),
            vec![Some(0), Some(0), Some(0)]
        );
        assert_eq!(
            resolver.normalized_map(&children, NodeKind::Element),
            vec![None, None, None]
        );
    }

    #[test]
    fn test_patch_offset_rejects_elements() {
        let (tree, p, ..) = injected();
        let resolver = Resolver::new(&tree).with_ignore_class(IGNORE);
        assert_eq!(resolver.patch_offset(p, 0), Err(ResolveError::NotTextNode));
    }

    #[test]
    fn test_html_tree_adapter() {
        let tree = HtmlTree::parse(
            r#"<html><head></head><body><section id="s1"><p>One</p><p>Two <b>bold</b> tail</p></section></body></html>"#,
        );
        let resolver = Resolver::new(&tree);

        let cfi = parse("epubcfi(/6/2!/4/2[s1]/4/3:2)").unwrap();
        let point = resolver.to_point(&cfi).unwrap();
        assert_eq!(tree.text(point.container), Some(" tail"));
        assert_eq!(point.offset, 2);

        let back = resolver.from_point(point, &chapter_component(2, 0, None));
        assert_eq!(back.to_string(), "epubcfi(/6/2!/4/2[s1]/4/3:2)");
    }
}
