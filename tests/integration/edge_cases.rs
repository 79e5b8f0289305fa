//! Segment boundary and duplicate-key behavior.

use form_parse::form::{self, ParseOptions};

use crate::helpers::{as_map, expected, Lcg, NASTY};

#[test]
fn test_empty_input() {
    assert!(form::parse(b"", false).is_empty());
    assert!(form::parse(b"", true).is_empty());
}

#[test]
fn test_last_write_wins() {
    assert_eq!(
        as_map(form::parse(b"a=1&a=2", false)),
        expected(&[("a", "2")])
    );
}

#[test]
fn test_trailing_ampersand_adds_nothing() {
    assert_eq!(
        as_map(form::parse(b"a=1&", false)),
        expected(&[("a", "1")])
    );
}

#[test]
fn test_double_ampersand_adds_empty_pair() {
    assert_eq!(
        as_map(form::parse(b"a=1&&b=2", false)),
        expected(&[("a", "1"), ("", ""), ("b", "2")])
    );
}

#[test]
fn test_key_without_value() {
    assert_eq!(as_map(form::parse(b"k", false)), expected(&[("k", "")]));
    assert_eq!(as_map(form::parse(b"k=", false)), expected(&[("k", "")]));
}

#[test]
fn test_empty_key_with_value() {
    assert_eq!(as_map(form::parse(b"=v", false)), expected(&[("", "v")]));
}

#[test]
fn test_only_ampersands() {
    assert_eq!(as_map(form::parse(b"&", false)), expected(&[("", "")]));
    assert_eq!(as_map(form::parse(b"&&&", false)), expected(&[("", "")]));
}

#[test]
fn test_value_keeps_later_equals() {
    assert_eq!(
        as_map(form::parse(b"token=abc==&x=1", false)),
        expected(&[("token", "abc=="), ("x", "1")])
    );
}

#[test]
fn test_percent_at_segment_end() {
    assert_eq!(
        as_map(form::parse(b"a=50%&b=%", false)),
        expected(&[("a", "50%"), ("b", "%")])
    );
}

#[test]
fn test_escape_split_by_delimiter() {
    // The escape is cut short by '&', both halves stay literal
    assert_eq!(
        as_map(form::parse(b"a=%4&1=x", false)),
        expected(&[("a", "%4"), ("1", "x")])
    );
}

#[test]
fn test_case_sensitive_default() {
    let map = form::parse(b"Name=a&name=b", false);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("Name"), Some("a"));
    assert_eq!(map.get("name"), Some("b"));
    assert_eq!(map.get("NAME"), None);
}

#[test]
fn test_case_insensitive_opt_in() {
    let options = ParseOptions::query_string().case_insensitive();
    let map = form::parse_with(b"Name=a&NAME=b+c", options);

    assert!(!map.is_case_sensitive());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("name"), Some("b c"));
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Name"]);
}

#[test]
fn test_never_panics_on_arbitrary_bytes() {
    let mut rng = Lcg::new(2024);
    for _ in 0..2000 {
        let len = rng.below(64);
        let input = rng.bytes_from(NASTY, len);
        let map = form::parse(&input, rng.below(2) == 0);

        // Output never exceeds the number of pairs in the input
        assert!(map.len() <= input.iter().filter(|&&b| b == b'&').count() + 1);
    }

    // Every byte value, alone and after a '%'
    for byte in 0..=u8::MAX {
        form::parse(&[byte], false);
        form::parse(&[b'%', byte], true);
        form::parse(&[b'%', byte, byte], false);
    }
}
