//! Spine sections and the sources that load them

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::cfi::{chapter_component, Segment};
use crate::error::SourceError;
use crate::tree::{ContentTree, HtmlTree};

/// One content document in spine order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Position in the spine
    pub index: usize,
    /// Location of the content document
    pub href: String,
    /// `idref` of the spine itemref, used as the ID assertion of the base
    pub idref: Option<String>,
    /// `false` for `linear="no"` itemrefs
    pub linear: bool,
    /// Base component shared by every CFI in this section
    pub cfi_base: Segment,
}

impl Section {
    pub fn new(
        index: usize,
        href: impl Into<String>,
        idref: Option<String>,
        spine_node_index: usize,
    ) -> Self {
        let cfi_base = chapter_component(spine_node_index, index, idref.as_deref());
        Self {
            index,
            href: href.into(),
            idref,
            linear: true,
            cfi_base,
        }
    }

    pub fn with_linear(mut self, linear: bool) -> Self {
        self.linear = linear;
        self
    }
}

/// Fetches section content for the locations generator.
///
/// Futures are not required to be `Send`; generation runs on one task.
#[async_trait(?Send)]
pub trait SectionSource {
    type Tree: ContentTree;

    async fn load(&self, section: &Section) -> Result<Self::Tree, SourceError>;
}

/// Markup held in memory, keyed by href
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, href: impl Into<String>, markup: impl Into<String>) {
        self.documents.insert(href.into(), markup.into());
    }

    pub fn with_document(mut self, href: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(href, markup);
        self
    }
}

#[async_trait(?Send)]
impl SectionSource for MemorySource {
    type Tree = HtmlTree;

    async fn load(&self, section: &Section) -> Result<HtmlTree, SourceError> {
        self.documents
            .get(&section.href)
            .map(|markup| HtmlTree::parse(markup))
            .ok_or_else(|| SourceError::NotFound(section.href.clone()))
    }
}

/// Content documents on disk, resolved against a root directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait(?Send)]
impl SectionSource for FsSource {
    type Tree = HtmlTree;

    async fn load(&self, section: &Section) -> Result<HtmlTree, SourceError> {
        let path = self.root.join(&section.href);
        let markup = tokio::fs::read_to_string(&path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound(section.href.clone())
            } else {
                SourceError::Io {
                    href: section.href.clone(),
                    source,
                }
            }
        })?;
        Ok(HtmlTree::parse(&markup))
    }
}
