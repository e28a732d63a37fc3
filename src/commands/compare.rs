//! Compare command implementation

use anyhow::Result;
use std::cmp::Ordering;

/// Print -1, 0 or 1 for the reading order of two CFIs
pub fn compare(a: &str, b: &str) -> Result<()> {
    for input in [a, b] {
        if !libros_cfi::cfi::is_cfi_string(input) {
            tracing::warn!("Not a wrapped CFI: {}", input);
        }
    }

    let result = match libros_cfi::cfi::compare(a, b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    println!("{}", result);
    Ok(())
}
