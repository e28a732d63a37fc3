//! CFI (Canonical Fragment Identifier) types for EPUB
//!
//! EPUB CFI is a standardized way to reference specific locations within EPUB publications.
//! Format: epubcfi(/6/4[chap01ref]!/4[body01]/10[para05]/2/1:3)
//!
//! An address is split into components:
//! - `base`: the package document part, before the `!` indirection
//! - `path`: the content document part, after the indirection
//! - `start` / `end`: the divergent tails of a simple range, after `,`
//!
//! The `Display` implementations in this module are the serializer.
//!
//! Reference: <https://idpf.org/epub/linking/cfi/epub-cfi.html>

use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters that must be escaped with `^` inside an ID assertion
const ESCAPED_CHARS: &[char] = &['^', '[', ']', '(', ')', ',', ';', '='];

/// Kind of node a step points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Element child, encoded as an even number
    Element,
    /// Text child, encoded as an odd number
    Text,
}

/// A single hop in a CFI path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Element or text step
    pub kind: StepKind,
    /// 0-based position among siblings of the same kind
    pub index: usize,
    /// Optional ID assertion [id]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Tail of a segment: character offset plus an opaque assertion
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    /// Character offset into a text node (UTF-16 code units)
    pub offset: Option<usize>,
    /// Text location assertion payload, kept verbatim
    pub assertion: Option<String>,
}

/// One syntactic component of a CFI
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Steps in this segment
    pub steps: Vec<Step>,
    /// Offset and assertion after the last step
    pub terminal: Terminal,
}

/// The two relative tails of a simple range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CfiRange {
    /// Start of the range (relative to the common path)
    pub start: Segment,
    /// End of the range (relative to the common path)
    pub end: Segment,
}

/// A complete EPUB CFI
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cfi {
    /// Package document component (`/6/4[chap01ref]`)
    pub base: Segment,
    /// Content document component, or the common prefix of a range
    pub path: Segment,
    /// Range tails, present only for ranges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<CfiRange>,
}

impl StepKind {
    fn as_str(self) -> &'static str {
        match self {
            StepKind::Element => "element",
            StepKind::Text => "text",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Step {
    /// Create an element step
    pub fn element(index: usize) -> Self {
        Self {
            kind: StepKind::Element,
            index,
            id: None,
        }
    }

    /// Create an element step with ID assertion
    pub fn element_with_id(index: usize, id: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Element,
            index,
            id: Some(id.into()),
        }
    }

    /// Create a text step
    pub fn text(index: usize) -> Self {
        Self {
            kind: StepKind::Text,
            index,
            id: None,
        }
    }

    /// Decode a wire integer: even values are elements, odd values are text.
    ///
    /// Returns `None` for `0`, which names no node.
    pub fn from_encoded(n: usize) -> Option<Self> {
        match n {
            0 => None,
            n if n % 2 == 0 => Some(Self::element(n / 2 - 1)),
            n => Some(Self::text((n - 1) / 2)),
        }
    }

    /// Wire integer for this step
    pub fn encoded(&self) -> usize {
        match self.kind {
            StepKind::Element => (self.index + 1) * 2,
            StepKind::Text => self.index * 2 + 1,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == StepKind::Text
    }

    pub fn is_element(&self) -> bool {
        self.kind == StepKind::Element
    }
}

impl Terminal {
    /// Terminal carrying only a character offset
    pub fn at(offset: usize) -> Self {
        Self {
            offset: Some(offset),
            assertion: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.assertion.is_none()
    }
}

impl Segment {
    /// Create an empty segment
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segment with steps and no terminal
    pub fn with_steps(steps: Vec<Step>) -> Self {
        Self {
            steps,
            terminal: Terminal::default(),
        }
    }

    /// Add a step to the segment
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Set the character offset
    pub fn set_offset(&mut self, offset: usize) {
        self.terminal.offset = Some(offset);
    }

    pub fn last_step(&self) -> Option<&Step> {
        self.steps.last()
    }
}

impl Cfi {
    /// Create a point CFI
    pub fn new(base: Segment, path: Segment) -> Self {
        Self {
            base,
            path,
            range: None,
        }
    }

    /// Create a range CFI; `path` holds the shared prefix
    pub fn with_range(base: Segment, path: Segment, range: CfiRange) -> Self {
        Self {
            base,
            path,
            range: Some(range),
        }
    }

    /// Check if this CFI represents a range (text selection)
    pub fn is_range(&self) -> bool {
        self.range.is_some()
    }

    /// Spine position, the index of the second step of the base.
    ///
    /// `/6/4` is spine item 1. Addresses built without a spine step report 0.
    pub fn spine_pos(&self) -> usize {
        self.base.steps.get(1).map(|step| step.index).unwrap_or(0)
    }

    /// Steps from the content root to the start point
    pub fn start_steps(&self) -> impl Iterator<Item = &Step> {
        self.path
            .steps
            .iter()
            .chain(self.range.iter().flat_map(|range| range.start.steps.iter()))
    }

    /// Terminal of the start point
    pub fn start_terminal(&self) -> &Terminal {
        match self.range {
            Some(ref range) => &range.start.terminal,
            None => &self.path.terminal,
        }
    }

    /// Steps from the content root to the end point
    pub fn end_steps(&self) -> impl Iterator<Item = &Step> {
        self.path
            .steps
            .iter()
            .chain(self.range.iter().flat_map(|range| range.end.steps.iter()))
    }

    /// Terminal of the end point
    pub fn end_terminal(&self) -> &Terminal {
        match self.range {
            Some(ref range) => &range.end.terminal,
            None => &self.path.terminal,
        }
    }

    /// Turn a range into a point at its start or its end. Points are left as-is.
    pub fn collapse(&mut self, to_start: bool) {
        let Some(range) = self.range.take() else {
            return;
        };
        let tail = if to_start { range.start } else { range.end };
        self.path.steps.extend(tail.steps);
        self.path.terminal = tail.terminal;
    }

    /// Owned variant of [`Cfi::collapse`]
    pub fn collapsed(mut self, to_start: bool) -> Self {
        self.collapse(to_start);
        self
    }
}

pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ESCAPED_CHARS.contains(&ch) {
            out.push('^');
        }
        out.push(ch);
    }
    out
}

// Display implementations for serialization

impl fmt::Display for Cfi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epubcfi({}!{}", self.base, self.path)?;
        if let Some(ref range) = self.range {
            write!(f, ",{},{}", range.start, range.end)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            write!(f, "/")?;
        }
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        write!(f, "{}", self.terminal)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoded())?;
        if let Some(ref id) = self.id {
            write!(f, "[{}]", escape(id))?;
        }
        Ok(())
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, ":")?;
        if let Some(offset) = self.offset {
            write!(f, "{}", offset)?;
        }
        if let Some(ref assertion) = self.assertion {
            write!(f, "[{}]", assertion)?;
        }
        Ok(())
    }
}
