//! Configuration management for the CFI engine

use std::env;
use std::str::FromStr;

use crate::cfi::DEFAULT_SPINE_NODE_INDEX;
use crate::error::ConfigError;

/// Default characters per location
pub const DEFAULT_BREAK_SIZE: usize = 150;

#[derive(Debug, Clone)]
pub struct Config {
    pub locations: LocationsConfig,
    pub cfi: CfiConfig,
}

#[derive(Debug, Clone)]
pub struct LocationsConfig {
    /// Characters per location
    pub break_size: usize,
    /// Sections fetched ahead of the one being walked
    pub prefetch: usize,
}

#[derive(Debug, Clone)]
pub struct CfiConfig {
    /// Class marking host-injected markup
    pub ignore_class: Option<String>,
    /// Position of `<spine>` among the package document's children
    pub spine_node_index: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locations: LocationsConfig {
                break_size: DEFAULT_BREAK_SIZE,
                prefetch: 1,
            },
            cfi: CfiConfig {
                ignore_class: None,
                spine_node_index: DEFAULT_SPINE_NODE_INDEX,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            locations: LocationsConfig {
                break_size: var_or("LOCATIONS_BREAK_SIZE", DEFAULT_BREAK_SIZE)?,
                prefetch: var_or("LOCATIONS_PREFETCH", 1)?,
            },
            cfi: CfiConfig {
                ignore_class: env::var("CFI_IGNORE_CLASS")
                    .ok()
                    .filter(|class| !class.trim().is_empty()),
                spine_node_index: var_or("SPINE_NODE_INDEX", DEFAULT_SPINE_NODE_INDEX)?,
            },
        })
    }
}

fn var_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
