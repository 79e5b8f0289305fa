//! Sample form bodies built from country-code CSV files.
//!
//! The CSV has one `CODE,"Country Name"` record per line. Each record becomes
//! a `CODE=Country%20Name` pair and pairs are joined with `&`.

use std::fmt;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters gets escaped.
const DATA_STRING: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Errors loading sample input.
#[derive(Debug)]
pub enum SampleError {
    /// Reading the file failed.
    Io {
        path: String,
        error: std::io::Error,
    },
    /// A non-blank line without a comma.
    MalformedLine { line: usize, content: String },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Io { path, error } => write!(f, "IO error for '{}': {}", path, error),
            SampleError::MalformedLine { line, content } => {
                write!(f, "line {}: expected CODE,NAME but got '{}'", line, content)
            }
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SampleError::Io { error, .. } => Some(error),
            SampleError::MalformedLine { .. } => None,
        }
    }
}

/// Escape a string the way URI data strings are escaped.
pub fn escape_data_string(value: &str) -> String {
    utf8_percent_encode(value, DATA_STRING).to_string()
}

/// Join pairs into a url-encoded body, escaping both sides.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut body = String::new();
    for (key, value) in pairs {
        if !body.is_empty() {
            body.push('&');
        }
        body.extend(utf8_percent_encode(key, DATA_STRING));
        body.push('=');
        body.extend(utf8_percent_encode(value, DATA_STRING));
    }
    body
}

/// Read `(code, name)` records from CSV text.
///
/// Splits each line at its first comma and strips surrounding quotes from the
/// name. Blank lines are skipped.
pub fn parse_country_csv(text: &str) -> Result<Vec<(&str, &str)>, SampleError> {
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((code, name)) = line.split_once(',') else {
            return Err(SampleError::MalformedLine {
                line: idx + 1,
                content: line.to_string(),
            });
        };

        records.push((code, name.trim_matches('"')));
    }

    Ok(records)
}

/// Read a country-code CSV and build the url-encoded body for it.
pub fn load_country_body(path: &Path) -> Result<String, SampleError> {
    let text = std::fs::read_to_string(path).map_err(|error| SampleError::Io {
        path: path.display().to_string(),
        error,
    })?;

    let records = parse_country_csv(&text)?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded sample csv");

    Ok(encode_pairs(records))
}
