//! CFI (Canonical Fragment Identifier) module for EPUB
//!
//! This module provides parsing, generation, comparison and resolution of
//! EPUB CFI strings.
//!
//! # Example CFI
//!
//! ```text
//! epubcfi(/6/4[chapter1]!/4/2/1:42)
//!         │  │          │ │ │ │ └── character offset 42
//!         │  │          │ │ │ └──── text node (odd = text)
//!         │  │          │ │ └────── element index
//!         │  │          │ └──────── element index (body)
//!         │  │          └────────── indirection (into content doc)
//!         │  └───────────────────── spine item with ID
//!         └──────────────────────── spine element
//! ```
//!
//! # Usage
//!
//! ```
//! use libros_cfi::cfi::{compare, is_before, parse, CfiBuilder};
//! use std::cmp::Ordering;
//!
//! // Parse a CFI string
//! let a = parse("epubcfi(/6/4!/4/2/1:10)").unwrap();
//!
//! // Build a CFI programmatically
//! let b = CfiBuilder::new()
//!     .package_step()
//!     .spine_item(1)
//!     .indirection()
//!     .element(1)
//!     .element(0)
//!     .text_node(0)
//!     .character_offset(20)
//!     .build();
//!
//! assert!(is_before(&a, &b));
//! assert_eq!(compare("epubcfi(/6/4!/4/2/1:10)", &b), Ordering::Less);
//! ```

mod comparator;
mod generator;
mod parser;
mod resolver;
mod types;

// Re-export main types
pub use types::{Cfi, CfiRange, Segment, Step, StepKind, Terminal};

// Re-export parser functions
pub use parser::{
    is_cfi_string, parse, parse_component, parse_step, parse_terminal, try_parse, CfiParseError,
};

// Re-export generator
pub use generator::{
    chapter_component, generate_cfi, generate_cfi_range, hoist_common, CfiBuilder,
    DEFAULT_SPINE_NODE_INDEX,
};

// Re-export comparator functions
pub use comparator::{
    compare, compare_cfi, compare_cfi_strings, is_after, is_before, is_in_range, CfiLike,
};

pub use resolver::{ResolveError, Resolver};
