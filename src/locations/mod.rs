//! Reading locations index
//!
//! A book's text is cut into chunks of `break_size` characters and every
//! chunk is recorded as a CFI string. The resulting array is ordered by the
//! CFI comparator, which makes it a cheap, edition-stable progress scale:
//! position `n` of `total` is `n / total` of the way through the book.
//!
//! Generation is the only asynchronous operation. Sections are fetched through
//! a [`SectionSource`] (optionally ahead of time), walked strictly in spine
//! order, and dropped before the next one is walked. Dropping the `generate`
//! future stops at a section boundary and keeps what was appended so far.

mod generator;
mod search;
mod section;

pub use generator::{chunk_ranges, parse_section};
pub use search::{index_of_sorted, insert_sorted, location_of};
pub use section::{FsSource, MemorySource, Section, SectionSource};

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cfi::{compare, parse, CfiLike};
use crate::config::{Config, DEFAULT_BREAK_SIZE};
use crate::error::LocationsError;

/// Where the reader currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// Index into the locations array
    Location(usize),
    /// A CFI string, mapped to a location once the index exists
    Cfi(String),
}

impl From<usize> for Position {
    fn from(location: usize) -> Self {
        Position::Location(location)
    }
}

impl From<&str> for Position {
    fn from(cfi: &str) -> Self {
        Position::Cfi(cfi.to_string())
    }
}

impl From<String> for Position {
    fn from(cfi: String) -> Self {
        Position::Cfi(cfi)
    }
}

/// Published whenever the current location changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationChanged {
    pub location: usize,
    pub percentage: f64,
}

/// Ordered array of location CFIs plus the reader's current position
#[derive(Debug)]
pub struct Locations {
    entries: Vec<String>,
    break_size: usize,
    prefetch: usize,
    ignore_class: Option<String>,
    current: Option<usize>,
    current_cfi: Option<String>,
    changed: watch::Sender<Option<LocationChanged>>,
}

impl Default for Locations {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_SIZE)
    }
}

impl Locations {
    pub fn new(break_size: usize) -> Self {
        let (changed, _) = watch::channel(None);
        Self {
            entries: Vec::new(),
            break_size,
            prefetch: 1,
            ignore_class: None,
            current: None,
            current_cfi: None,
            changed,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.locations.break_size)
            .with_prefetch(config.locations.prefetch)
            .with_ignore_class(config.cfi.ignore_class.clone())
    }

    /// Number of sections fetched ahead of the one being walked
    pub fn with_prefetch(mut self, prefetch: usize) -> Self {
        self.prefetch = prefetch.max(1);
        self
    }

    /// Class marking injected markup, skipped when building CFIs
    pub fn with_ignore_class(mut self, class: Option<String>) -> Self {
        self.ignore_class = class;
        self
    }

    /// Rebuild the index from `sections`, replacing any previous entries.
    ///
    /// Non-linear sections are skipped. A failed fetch aborts generation with
    /// the entries of the preceding sections kept.
    pub async fn generate<S: SectionSource>(
        &mut self,
        sections: &[Section],
        source: &S,
    ) -> Result<&[String], LocationsError> {
        self.entries.clear();
        self.current = None;

        let break_size = self.break_size;
        let ignore_class = self.ignore_class.clone();

        let mut loaded = stream::iter(sections.iter().filter(|section| section.linear))
            .map(move |section| async move {
                source
                    .load(section)
                    .await
                    .map(|tree| (section, tree))
                    .map_err(|err| LocationsError::Source {
                        index: section.index,
                        source: err,
                    })
            })
            .buffered(self.prefetch.max(1));

        while let Some(result) = loaded.next().await {
            let (section, tree) = result?;
            let chunk = parse_section(&tree, &section.cfi_base, break_size, ignore_class.as_deref());
            debug!(
                section = section.index,
                href = %section.href,
                entries = chunk.len(),
                "Generated locations for section"
            );
            drop(tree);
            self.entries.extend(chunk);
            tokio::task::yield_now().await;
        }

        info!(
            locations = self.entries.len(),
            break_size, "Generated locations"
        );

        if let Some(cfi) = self.current_cfi.clone() {
            self.set_current_location(Position::Cfi(cfi));
        }

        Ok(&self.entries)
    }

    /// Location of `cfi`: its index, or the insertion point clamped to `total`.
    ///
    /// `None` while the index is empty.
    pub fn location_from_cfi<C: CfiLike>(&self, cfi: C) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }

        // Unparseable input sorts before everything
        let location = match cfi.as_cfi() {
            Some(target) => location_of(&*target, &self.entries, |entry, target| {
                compare(entry.as_str(), target)
            }),
            None => 0,
        };

        Some(location.min(self.total()))
    }

    pub fn percentage_from_cfi<C: CfiLike>(&self, cfi: C) -> Option<f64> {
        self.location_from_cfi(cfi)
            .map(|location| self.percentage_from_location(location))
    }

    /// `location / total`, or 0 for location 0 or an index of one entry
    pub fn percentage_from_location(&self, location: usize) -> f64 {
        let total = self.total();
        if location == 0 || total == 0 {
            return 0.0;
        }
        location as f64 / total as f64
    }

    pub fn cfi_from_location(&self, location: usize) -> Option<&str> {
        self.entries.get(location).map(String::as_str)
    }

    /// CFI at `percentage` of the book.
    ///
    /// `1.0` and above give the end point of the last entry.
    pub fn cfi_from_percentage(&self, percentage: f64) -> Option<String> {
        if percentage > 1.0 {
            warn!(percentage, "Normalize percentage to between 0 and 1");
        }

        if percentage >= 1.0 {
            let last = parse(self.entries.last()?).ok()?;
            return Some(last.collapsed(false).to_string());
        }

        let location = (self.total() as f64 * percentage.max(0.0)).ceil() as usize;
        self.cfi_from_location(location).map(str::to_string)
    }

    /// Serialize the entries as a JSON array
    pub fn save(&self) -> Result<String, LocationsError> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Replace the entries with a saved JSON array. `break_size` is unchanged.
    ///
    /// The current location is dropped, or mapped again from its CFI.
    pub fn load(&mut self, json: &str) -> Result<&[String], LocationsError> {
        self.entries = serde_json::from_str(json)?;
        self.current = None;
        if let Some(cfi) = self.current_cfi.clone() {
            self.set_current_location(Position::Cfi(cfi));
        }
        Ok(&self.entries)
    }

    /// Move the reader and publish the change.
    ///
    /// A CFI is remembered and mapped again after the next generation.
    pub fn set_current_location(&mut self, position: impl Into<Position>) {
        let location = match position.into() {
            Position::Location(location) => {
                self.current = Some(location);
                if self.entries.is_empty() {
                    return;
                }
                location
            }
            Position::Cfi(cfi) => {
                let location = self.location_from_cfi(cfi.as_str());
                self.current_cfi = Some(cfi);
                let Some(location) = location else {
                    return;
                };
                self.current = Some(location);
                location
            }
        };

        let percentage = self.percentage_from_location(location);
        self.changed.send_replace(Some(LocationChanged {
            location,
            percentage,
        }));
    }

    pub fn current_location(&self) -> Option<usize> {
        self.current
    }

    /// Watch current-location changes
    pub fn subscribe(&self) -> watch::Receiver<Option<LocationChanged>> {
        self.changed.subscribe()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest location number
    pub fn total(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn break_size(&self) -> usize {
        self.break_size
    }
}
