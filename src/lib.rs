//! form_parse - Low-allocation `application/x-www-form-urlencoded` decoding.
//!
//! This crate decodes form bodies and query strings into a key/value map.
//! Decoding never fails: malformed `%` escapes are kept literally and invalid
//! UTF-8 is replaced with U+FFFD.
//!
//! # Features
//!
//! - **Lenient grammar**: `&`-separated pairs, first `=` splits key from value
//! - **Query-string mode**: `+` decodes to a space; form bodies keep it
//! - **Pooled scratch space**: at most one buffer rented per parse call,
//!   returned automatically when the call ends
//! - **Parallel parsing**: a worker pool for independent parse jobs
//! - **Benchmark harness**: repeated parsing with allocation reporting
//!
//! # Example
//!
//! ```rust
//! use form_parse::form::{self, ParseOptions};
//!
//! let map = form::parse(b"a=1&b=%41&a=2", false);
//! assert_eq!(map.get("a"), Some("2"));
//! assert_eq!(map.get("b"), Some("A"));
//!
//! let map = form::parse_with(b"Key=x", ParseOptions::default().case_insensitive());
//! assert_eq!(map.get("KEY"), Some("x"));
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod bench;
pub mod buffer;
pub mod config;
pub mod form;
pub mod logging;
pub mod pool;
pub mod samples;

// Re-exports for convenience
pub use buffer::BufferPool;
pub use config::Config;
pub use form::{parse, parse_with, FormMap, ParseOptions};
