//! Location chunking
//!
//! Walks a section's text in document order and cuts it into ranges of
//! `break_size` characters. Each range is serialized against the section's
//! base component. The last, shorter chunk of a section still produces an
//! entry so every section boundary is addressable.

use crate::cfi::{Resolver, Segment};
use crate::tree::{ContentTree, Point, TextRange};

/// Location entries for one section
pub fn parse_section<T: ContentTree>(
    tree: &T,
    base: &Segment,
    break_size: usize,
    ignore_class: Option<&str>,
) -> Vec<String> {
    let resolver = Resolver::new(tree).with_optional_ignore_class(ignore_class);
    chunk_ranges(tree, break_size)
        .iter()
        .map(|range| resolver.from_range(range, base).to_string())
        .collect()
}

/// Ranges of `break_size` characters covering the section's text
pub fn chunk_ranges<T: ContentTree>(tree: &T, break_size: usize) -> Vec<TextRange<T::Node>> {
    let break_size = break_size.max(1);
    let Some(root) = tree.find_element("body").or_else(|| tree.document_element()) else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut start: Option<Point<T::Node>> = None;
    let mut counter = 0;
    let mut prev = None;

    for node in tree.text_nodes(root) {
        if tree.text(node).map_or(true, |text| text.trim().is_empty()) {
            continue;
        }

        let len = tree.text_len(node);
        let mut pos = 0;

        while pos < len {
            if counter == 0 {
                start = Some(Point::new(node, pos));
            }

            let take = (break_size - counter).min(len - pos);
            pos += take;
            counter += take;

            if counter == break_size {
                if let Some(start) = start.take() {
                    ranges.push(TextRange::new(start, Point::new(node, pos)));
                }
                counter = 0;
            }
        }

        prev = Some(node);
    }

    // Close the partial chunk
    if let (Some(start), Some(prev)) = (start, prev) {
        if counter > 0 {
            ranges.push(TextRange::new(start, Point::new(prev, tree.text_len(prev))));
        }
    }

    ranges
}
