//! Test helpers and utilities

use std::collections::HashMap;

use form_parse::FormMap;

/// Build an expected map from string pairs.
pub fn expected(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Convert a parse result for comparison.
pub fn as_map(map: FormMap) -> HashMap<String, String> {
    map.into_inner()
}

/// Deterministic pseudo-random generator (64-bit LCG) so failures reproduce.
pub struct Lcg(u64);

#[allow(dead_code)]
impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, n: usize) -> usize {
        self.next_u32() as usize % n
    }

    /// Random bytes drawn from `alphabet`.
    pub fn bytes_from(&mut self, alphabet: &[u8], len: usize) -> Vec<u8> {
        (0..len).map(|_| alphabet[self.below(alphabet.len())]).collect()
    }
}

/// Bytes that stress the decoder: delimiters, escapes, hex digits, non-hex
/// letters, plus and raw non-ASCII.
#[allow(dead_code)]
pub const NASTY: &[u8] = b"ab=&%%+4Fzf0 \xc3\xa9\xff";
