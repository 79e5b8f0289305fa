//! Decoding behavior of the public parse functions.

use std::collections::HashMap;

use form_parse::form::{self, ParseOptions, Transcoder};
use form_parse::BufferPool;

use crate::helpers::{as_map, expected, Lcg};

#[test]
fn test_percent_escapes() {
    assert_eq!(
        as_map(form::parse(b"v=%41", false)),
        expected(&[("v", "A")])
    );
    assert_eq!(
        as_map(form::parse(b"v=%4", false)),
        expected(&[("v", "%4")])
    );
    assert_eq!(
        as_map(form::parse(b"v=%zz", false)),
        expected(&[("v", "%zz")])
    );
}

#[test]
fn test_plus_by_mode() {
    assert_eq!(
        as_map(form::parse(b"q=a+b", true)),
        expected(&[("q", "a b")])
    );
    assert_eq!(
        as_map(form::parse(b"q=a+b", false)),
        expected(&[("q", "a+b")])
    );
}

#[test]
fn test_utf8_multibyte_escapes() {
    let map = form::parse(b"city=M%C3%BCnchen&sym=%E2%82%AC%F0%9F%98%80", false);
    assert_eq!(map.get("city"), Some("München"));
    assert_eq!(map.get("sym"), Some("€😀"));
}

#[test]
fn test_raw_utf8_passes_through() {
    let map = form::parse("name=José&city=Zürich".as_bytes(), true);
    assert_eq!(map.get("name"), Some("José"));
    assert_eq!(map.get("city"), Some("Zürich"));
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let map = form::parse(b"a=%FF%FE&b=\xff", false);
    assert_eq!(map.get("a"), Some("\u{FFFD}\u{FFFD}"));
    assert_eq!(map.get("b"), Some("\u{FFFD}"));
}

#[test]
fn test_escaped_delimiters_do_not_split() {
    let map = form::parse(b"expr=1%2B1%3D2%26more", false);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("expr"), Some("1+1=2&more"));
}

#[test]
fn test_country_body() {
    let body = form_parse::samples::encode_pairs([
        ("US", "United States"),
        ("CI", "Côte d'Ivoire"),
        ("AX", "Åland Islands"),
    ]);
    let map = form::parse(body.as_bytes(), false);

    assert_eq!(
        as_map(map),
        expected(&[
            ("US", "United States"),
            ("CI", "Côte d'Ivoire"),
            ("AX", "Åland Islands"),
        ])
    );
}

/// Naive reference: split on '&', drop only a trailing empty remainder.
fn reference_pairs(text: &str) -> HashMap<String, String> {
    let mut pieces: Vec<&str> = text.split('&').collect();
    if pieces.last() == Some(&"") {
        pieces.pop();
    }

    pieces
        .into_iter()
        .map(|p| p.split_once('=').unwrap_or((p, "")))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_plain_input_values_equal_raw_slices() {
    // Without % or +, every decoded key and value is the raw slice.
    let mut rng = Lcg::new(7);
    for _ in 0..300 {
        let len = rng.below(40);
        let input = rng.bytes_from(b"abcXYZ019=&-_.~ ", len);
        let text = std::str::from_utf8(&input).unwrap();

        for mode in [false, true] {
            let map = form::parse(&input, mode);
            assert_eq!(as_map(map), reference_pairs(text), "input {:?}", text);
        }
    }
}

#[test]
fn test_form_mode_matches_percent_encoding_crate() {
    let mut rng = Lcg::new(42);
    let pool = BufferPool::new();

    for _ in 0..500 {
        let len = rng.below(24);
        let segment = rng.bytes_from(b"ab%4Fz0+ \xc3\xa9\xff", len);

        let ours = Transcoder::new(&pool, false).decode(&segment);
        let reference = percent_encoding::percent_decode(&segment)
            .decode_utf8_lossy()
            .into_owned();

        assert_eq!(ours, reference, "segment {:?}", segment);
    }

    assert_eq!(pool.stats().outstanding(), 0);
}

#[test]
fn test_query_mode_is_form_mode_with_plus_replaced() {
    let mut rng = Lcg::new(99);

    for _ in 0..300 {
        let len = rng.below(32);
        let input = rng.bytes_from(b"ab=&%4F+1", len);

        let form_map = form::parse_with(&input, ParseOptions::form_body());
        let query_map = form::parse_with(&input, ParseOptions::query_string());

        let mut replaced = HashMap::new();
        for (k, v) in form_map {
            replaced.insert(k.replace('+', " "), v.replace('+', " "));
        }
        assert_eq!(as_map(query_map), replaced, "input {:?}", input);
    }
}
