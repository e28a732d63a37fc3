//! Locations command implementation

use anyhow::{Context, Result};
use std::path::Path;

use libros_cfi::config::Config;
use libros_cfi::locations::{FsSource, Locations, Section};

/// Generate and print the locations index for content documents in spine order
pub async fn locations(files: &[String], break_size: Option<usize>, config: &Config) -> Result<()> {
    let sections: Vec<Section> = files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let idref = Path::new(file)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string);
            Section::new(index, file.as_str(), idref, config.cfi.spine_node_index)
        })
        .collect();

    let mut locations = Locations::new(break_size.unwrap_or(config.locations.break_size))
        .with_prefetch(config.locations.prefetch)
        .with_ignore_class(config.cfi.ignore_class.clone());

    let source = FsSource::new("");
    let entries = locations
        .generate(&sections, &source)
        .await
        .context("Failed to generate locations")?;

    tracing::info!("{} locations from {} sections", entries.len(), sections.len());
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}
