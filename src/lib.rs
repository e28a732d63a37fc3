//! Libros CFI
//!
//! EPUB Canonical Fragment Identifiers and the reading locations index.
//!
//! # Modules
//!
//! - `cfi`: parse, serialize, compare and resolve CFIs
//! - `tree`: the content tree interface the resolver reads documents through
//! - `locations`: fixed-interval location index for reading progress
//! - `config`: environment-driven configuration
//! - `error`: crate error types

pub mod cfi;
pub mod config;
pub mod error;
pub mod locations;
pub mod tree;
