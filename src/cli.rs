//! CLI interface for the interest matcher

use crate::catalog::occupation::CATEGORY_COUNT;
use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interest-matcher")]
#[command(about = "Match a RIASEC interest profile against an occupation catalog")]
#[command(long_about = "Rank occupations by how closely their realistic, investigative, artistic, social, enterprising and conventional scores match yours, and explain the overall fit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend occupations for an interest profile
    Recommend {
        /// Six scores (0-100) in R,I,A,S,E,C order, e.g. 90,10,10,10,10,10
        #[arg(short, long)]
        scores: String,

        /// Catalog location: .json file or http(s) URL
        #[arg(long)]
        catalog: Option<String>,

        /// Similarity metric: cosine, weighted, hybrid
        #[arg(short, long)]
        metric: Option<String>,

        /// Weight profile: uniform, skewed, or six comma-separated numbers
        #[arg(short, long)]
        weights: Option<String>,

        /// Show every recommendation instead of the top entries
        #[arg(short, long)]
        all: bool,

        /// Number of entries to show when not showing all
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file; without a path a timestamped name is chosen
        #[arg(long, num_args = 0..=1)]
        save: Option<Option<PathBuf>>,

        /// Extra attempts when the catalog fails to load
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },

    /// Show one occupation from the catalog
    Occupation {
        /// Occupation name (close spellings are accepted)
        name: String,

        /// Catalog location: .json file or http(s) URL
        #[arg(long)]
        catalog: Option<String>,
    },

    /// List the catalog and report repaired entries
    Catalog {
        /// Catalog location: .json file or http(s) URL
        #[arg(long)]
        catalog: Option<String>,

        /// Only report coerced, padded or truncated entries
        #[arg(long)]
        validate: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Split the `--scores` argument into one raw value per category.
/// Values are parsed and clamped later; only the count is checked here.
pub fn split_scores(input: &str) -> Result<Vec<&str>, String> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != CATEGORY_COUNT {
        return Err(format!(
            "Expected {} comma-separated scores (R,I,A,S,E,C), got {}",
            CATEGORY_COUNT,
            parts.len()
        ));
    }
    Ok(parts)
}
