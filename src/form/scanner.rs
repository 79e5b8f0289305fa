//! Splits raw form bytes into key/value segments.

/// Iterator over the raw `(key, value)` segments of a form body.
///
/// Pairs are separated by `&`, keys from values by the first `=`. A pair
/// without `=` is all key with an empty value. The remainder after the last
/// `&` only counts as a pair when it is non-empty, so `"a=1&"` yields one pair
/// while `"a=1&&b=2"` yields three (the middle one empty).
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    rest: &'a [u8],
}

impl<'a> Pairs<'a> {
    /// Scan `input` from the start.
    pub fn new(input: &'a [u8]) -> Self {
        Self { rest: input }
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let pair = match self.rest.iter().position(|&b| b == b'&') {
            Some(amp) => {
                let pair = &self.rest[..amp];
                self.rest = &self.rest[amp + 1..];
                pair
            }
            None => std::mem::take(&mut self.rest),
        };

        Some(split_pair(pair))
    }
}

/// Split one pair at its first `=`.
#[inline]
fn split_pair(pair: &[u8]) -> (&[u8], &[u8]) {
    match pair.iter().position(|&b| b == b'=') {
        Some(eq) => (&pair[..eq], &pair[eq + 1..]),
        None => (pair, &pair[pair.len()..]),
    }
}
