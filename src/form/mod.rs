//! `application/x-www-form-urlencoded` decoding.
//!
//! Parsing is total: any byte sequence yields a map. Malformed `%` escapes
//! are kept literally and invalid UTF-8 becomes U+FFFD.
//!
//! ```text
//!   input ──▶ Pairs (split on & and =)
//!               │ key bytes, value bytes
//!               ▼
//!             Transcoder ──▶ percent::unescape   (scratch buffer from pool)
//!               │ key, value
//!               ▼
//!             FormMap (last write wins)
//! ```
//!
//! # Example
//!
//! ```rust
//! use form_parse::form;
//!
//! let map = form::parse(b"name=J%C3%BCrgen&q=a+b", true);
//! assert_eq!(map.get("name"), Some("Jürgen"));
//! assert_eq!(map.get("q"), Some("a b"));
//! ```

mod map;
pub mod percent;
mod scanner;
mod transcode;

pub use map::FormMap;
pub use scanner::Pairs;
pub use transcode::Transcoder;

use crate::buffer::BufferPool;

/// Options controlling a parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Decode `+` as a space (query strings). Form bodies keep `+`.
    pub query_string: bool,
    /// Compare keys ordinally. `false` is an explicit opt-in to
    /// case-insensitive keys.
    pub case_sensitive_keys: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            query_string: false,
            case_sensitive_keys: true,
        }
    }
}

impl ParseOptions {
    /// Form-body mode with case-sensitive keys.
    pub fn form_body() -> Self {
        Self::default()
    }

    /// Query-string mode with case-sensitive keys.
    pub fn query_string() -> Self {
        Self {
            query_string: true,
            ..Self::default()
        }
    }

    /// Same options with case-insensitive key comparison.
    pub fn case_insensitive(self) -> Self {
        Self {
            case_sensitive_keys: false,
            ..self
        }
    }
}

/// Parse `input` with case-sensitive keys using the shared buffer pool.
pub fn parse(input: &[u8], query_string_mode: bool) -> FormMap {
    let options = ParseOptions {
        query_string: query_string_mode,
        ..ParseOptions::default()
    };
    parse_in(input, options, BufferPool::shared())
}

/// Parse `input` with explicit options using the shared buffer pool.
pub fn parse_with(input: &[u8], options: ParseOptions) -> FormMap {
    parse_in(input, options, BufferPool::shared())
}

/// Parse `input`, renting scratch space from `pool`.
///
/// At most one buffer is held at a time and it is back in the pool when this
/// returns.
pub fn parse_in(input: &[u8], options: ParseOptions, pool: &BufferPool) -> FormMap {
    let mut map = FormMap::with_case_sensitivity(options.case_sensitive_keys);
    let mut transcoder = Transcoder::new(pool, options.query_string);

    for (key, value) in Pairs::new(input) {
        let key = transcoder.decode(key);
        let value = transcoder.decode(value);
        map.insert(key, value);
    }

    tracing::trace!(
        bytes = input.len(),
        pairs = map.len(),
        scratch = transcoder.scratch_capacity().unwrap_or(0),
        "form parsed"
    );

    map
}
