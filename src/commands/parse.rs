//! Parse command implementation

use anyhow::{Context, Result};

/// Print a parsed CFI as JSON
pub fn parse(input: &str) -> Result<()> {
    let cfi = libros_cfi::cfi::parse(input).with_context(|| format!("Invalid CFI: {}", input))?;

    println!("{}", serde_json::to_string_pretty(&cfi)?);
    Ok(())
}
