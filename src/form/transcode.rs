//! Raw segment to `String` conversion.
//!
//! Segments without `%` are converted straight from the input. Segments with
//! escapes are unescaped into one scratch buffer that lives as long as the
//! transcoder, so a whole parse call costs at most one rental from the pool
//! (plus one per growth step).

use crate::buffer::{BufferPool, ScratchBuffer};

use super::percent::{self, ESCAPE_LEN};

/// Per-call segment decoder owning the call's scratch buffer.
pub struct Transcoder<'p> {
    pool: &'p BufferPool,
    /// Rented on the first segment containing `%`.
    scratch: Option<ScratchBuffer<'p>>,
    /// Query-string mode: `+` decodes to a space.
    plus_as_space: bool,
}

impl<'p> Transcoder<'p> {
    pub fn new(pool: &'p BufferPool, plus_as_space: bool) -> Self {
        Self {
            pool,
            scratch: None,
            plus_as_space,
        }
    }

    /// Decode one raw segment.
    pub fn decode(&mut self, raw: &[u8]) -> String {
        let Some(first_percent) = raw.iter().position(|&b| b == b'%') else {
            return finish(raw, self.plus_as_space);
        };

        let plus_as_space = self.plus_as_space;
        let scratch = self.scratch_for(raw.len());
        unescape_into(raw, first_percent, scratch);

        finish(scratch, plus_as_space)
    }

    /// Capacity of the rented scratch buffer, if one has been rented.
    pub fn scratch_capacity(&self) -> Option<usize> {
        self.scratch.as_ref().map(|b| b.capacity())
    }

    /// Empty scratch buffer able to hold `len` bytes without reallocating.
    fn scratch_for(&mut self, len: usize) -> &mut ScratchBuffer<'p> {
        if self.scratch.as_ref().is_some_and(|b| b.capacity() < len) {
            // Hand the undersized buffer back before renting a larger one
            self.scratch = None;
        }

        let pool = self.pool;
        let scratch = self.scratch.get_or_insert_with(|| pool.rent(len));
        scratch.clear();
        scratch
    }
}

/// Copy `raw` into `out`, decoding escapes. `first_percent` is the index of
/// the first `%` in `raw`. Malformed escapes are copied literally.
fn unescape_into(raw: &[u8], first_percent: usize, out: &mut Vec<u8>) {
    let mut rest = raw;
    let mut next = Some(first_percent);

    while let Some(idx) = next {
        out.extend_from_slice(&rest[..idx]);
        rest = &rest[idx..];

        match percent::unescape(rest) {
            Some(byte) => {
                out.push(byte);
                rest = &rest[ESCAPE_LEN..];
            }
            None => {
                out.push(b'%');
                rest = &rest[1..];
            }
        }

        next = rest.iter().position(|&b| b == b'%');
    }

    out.extend_from_slice(rest);
}

/// Lossy UTF-8 conversion, then `+` to space in query-string mode.
#[inline]
fn finish(bytes: &[u8], plus_as_space: bool) -> String {
    let text = String::from_utf8_lossy(bytes);
    if plus_as_space && text.contains('+') {
        text.replace('+', " ")
    } else {
        text.into_owned()
    }
}
