//! Libros CFI - command-line tool for EPUB CFIs and reading locations

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libros_cfi::config::Config;

/// Parse and validate the break size (must be at least 1)
fn parse_break_size(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("break size must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "libros-cfi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CFI and print it as JSON
    Parse {
        /// CFI string
        cfi: String,
    },

    /// Compare two CFIs in reading order (prints -1, 0 or 1)
    Compare {
        /// First CFI string
        a: String,

        /// Second CFI string
        b: String,
    },

    /// Resolve a CFI against an (X)HTML content document
    Resolve {
        /// CFI string
        cfi: String,

        /// Content document path
        file: String,
    },

    /// Generate the locations index for content documents in spine order
    Locations {
        /// Content document paths, in spine order
        #[arg(required = true)]
        files: Vec<String>,

        /// Characters per location
        #[arg(short, long, value_parser = parse_break_size)]
        break_size: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "libros_cfi=debug"
    } else {
        "libros_cfi=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    match cli.command {
        Commands::Parse { cfi } => commands::parse(&cfi),

        Commands::Compare { a, b } => commands::compare(&a, &b),

        Commands::Resolve { cfi, file } => commands::resolve(&cfi, &file, &config),

        Commands::Locations { files, break_size } => {
            commands::locations(&files, break_size, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compare_args_documented() {
        let mut cmd = Cli::command();
        let compare = cmd.find_subcommand_mut("compare").unwrap();
        let help = compare.render_help().to_string();
        assert!(help.contains("First CFI string"));
        assert!(help.contains("Second CFI string"));
    }
}
