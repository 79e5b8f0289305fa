//! Configuration module for form_parse.
//!
//! Settings come from environment variables; only the command and its file
//! argument come from the command line.
//!
//! # Example
//!
//! ```rust,ignore
//! use form_parse::config::Config;
//!
//! let config = Config::from_env()?;
//! let options = config.parser.parse_options();
//! println!("Workers: {}", config.pool.worker_count());
//! ```

mod bench;
mod command;
mod error;
mod logging;
mod parse;
mod parser;
mod pool;

pub use bench::BenchConfig;
pub use command::{Cli, Command};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use parse::{parse_bool, parse_duration};
pub use parser::ParserConfig;
pub use pool::PoolConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Parse mode and buffer pool limits.
    pub parser: ParserConfig,
    /// Worker pool sizing.
    pub pool: PoolConfig,
    /// Benchmark iteration counts.
    pub bench: BenchConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            parser: ParserConfig::from_env()?,
            pool: PoolConfig::from_env()?,
            bench: BenchConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!(
            "  Mode: {}",
            if self.parser.query_string {
                "query string (+ as space)"
            } else {
                "form body"
            }
        );
        if self.parser.case_insensitive {
            info!("  Keys: case-insensitive");
        }
        info!(
            "  Buffer pool: retain {}, max {} bytes",
            self.parser.pool_retain, self.parser.max_buffer_size
        );
        info!("  Workers: {}", self.pool.worker_count());
        info!("  Queue capacity: {}", self.pool.queue_capacity());

        match self.pool.timeout {
            Some(timeout) => info!("  Parse timeout: {}ms", timeout.as_millis()),
            None => info!("  Parse timeout: disabled"),
        }

        if self.bench.is_bounded() {
            info!(
                "  Bench: {} rounds x {} iterations",
                self.bench.rounds, self.bench.iterations
            );
        } else {
            info!("  Bench: {} iterations per round, unbounded", self.bench.iterations);
        }
    }
}
