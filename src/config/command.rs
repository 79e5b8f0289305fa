//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Decode url-encoded form bodies. Settings come from the environment
/// (FORM_QUERY_STRING, PARSE_WORKERS, BENCH_ROUNDS, LOG_FORMAT, ...).
#[derive(Debug, Parser)]
#[command(name = "form_parse", version = crate::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// What the binary was asked to do.
#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Parse a url-encoded file and print the map as JSON
    Parse {
        /// File holding the encoded body
        input: PathBuf,
    },
    /// Build a body from a country-code CSV and benchmark parsing it
    Bench {
        /// CSV with one CODE,"Name" record per line
        csv: PathBuf,
    },
    /// Print the body built from a country-code CSV
    Build {
        /// CSV with one CODE,"Name" record per line
        csv: PathBuf,
    },
}
