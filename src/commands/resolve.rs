//! Resolve command implementation

use anyhow::{Context, Result};
use std::fs;

use libros_cfi::cfi::{parse, Resolver};
use libros_cfi::config::Config;
use libros_cfi::tree::{ContentTree, HtmlTree, NodeKind, Point};

const PREVIEW_CHARS: usize = 24;

/// Resolve a CFI against a content document and print where it lands
pub fn resolve(input: &str, file: &str, config: &Config) -> Result<()> {
    let cfi = parse(input).with_context(|| format!("Invalid CFI: {}", input))?;
    let markup =
        fs::read_to_string(file).with_context(|| format!("Failed to read content document: {}", file))?;

    let tree = HtmlTree::parse(&markup);
    let resolver = Resolver::new(&tree).with_optional_ignore_class(config.cfi.ignore_class.as_deref());

    let Some(range) = resolver.to_range(&cfi) else {
        println!("position unavailable");
        return Ok(());
    };

    println!("Start:     {}", describe(&tree, range.start));
    if !range.is_collapsed() {
        println!("End:       {}", describe(&tree, range.end));
    }
    println!("Canonical: {}", resolver.from_range(&range, &cfi.base));
    Ok(())
}

/// `html > body > p#intro > #text "..." @ 3`
fn describe(tree: &HtmlTree, point: Point<<HtmlTree as ContentTree>::Node>) -> String {
    let mut parts = Vec::new();
    let mut current = Some(point.container);

    while let Some(node) = current {
        match tree.kind(node) {
            NodeKind::Element => {
                let name = tree.local_name(node).unwrap_or("?");
                parts.push(match tree.element_id(node) {
                    Some(id) => format!("{}#{}", name, id),
                    None => name.to_string(),
                });
            }
            NodeKind::Text => {
                let text = tree.text(node).unwrap_or_default();
                let preview: String = text.chars().take(PREVIEW_CHARS).collect();
                parts.push(format!("#text {:?}", preview));
            }
            _ => {}
        }
        current = tree.parent(node);
    }

    parts.reverse();
    format!("{} @ {}", parts.join(" > "), point.offset)
}
