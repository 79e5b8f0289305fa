//! Parser and buffer pool configuration.

use super::parse::{env_bool, env_parse};
use super::ConfigError;
use crate::buffer::{BufferPool, DEFAULT_MAX_BUFFER_SIZE, DEFAULT_MAX_RETAINED};
use crate::form::ParseOptions;

/// Parse mode and scratch buffer limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Decode `+` as space (FORM_QUERY_STRING).
    pub query_string: bool,
    /// Opt-in case-insensitive keys (FORM_CASE_INSENSITIVE).
    pub case_insensitive: bool,
    /// Idle buffers kept by the pool (BUFFER_POOL_RETAIN).
    pub pool_retain: usize,
    /// Largest buffer kept on return, in bytes (BUFFER_MAX_SIZE).
    pub max_buffer_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            query_string: false,
            case_insensitive: false,
            pool_retain: DEFAULT_MAX_RETAINED,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

impl ParserConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            query_string: env_bool("FORM_QUERY_STRING", false),
            case_insensitive: env_bool("FORM_CASE_INSENSITIVE", false),
            pool_retain: env_parse("BUFFER_POOL_RETAIN", DEFAULT_MAX_RETAINED)?,
            max_buffer_size: env_parse("BUFFER_MAX_SIZE", DEFAULT_MAX_BUFFER_SIZE)?,
        })
    }

    /// Options for parse calls.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            query_string: self.query_string,
            case_sensitive_keys: !self.case_insensitive,
        }
    }

    /// A fresh buffer pool with the configured limits.
    pub fn buffer_pool(&self) -> BufferPool {
        BufferPool::with_limits(self.pool_retain, self.max_buffer_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_form_body_case_sensitive() {
        let options = ParserConfig::default().parse_options();
        assert_eq!(options, ParseOptions::form_body());
    }

    #[test]
    fn test_case_insensitive_flag() {
        let config = ParserConfig {
            query_string: true,
            case_insensitive: true,
            ..Default::default()
        };
        let options = config.parse_options();
        assert!(options.query_string);
        assert!(!options.case_sensitive_keys);
    }

    #[test]
    fn test_buffer_pool_limits() {
        let config = ParserConfig {
            pool_retain: 3,
            max_buffer_size: 4096,
            ..Default::default()
        };
        let pool = config.buffer_pool();
        assert_eq!(pool.max_retained(), 3);
        assert_eq!(pool.max_buffer_size(), 4096);
    }
}
