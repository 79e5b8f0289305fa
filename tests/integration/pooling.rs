//! Scratch buffer accounting across parse calls.

use form_parse::buffer::BufferPool;
use form_parse::form::{self, ParseOptions};

use crate::helpers::{Lcg, NASTY};

#[test]
fn test_no_escape_no_rental() {
    let pool = BufferPool::new();
    form::parse_in(b"a=1&b=two+words&c", ParseOptions::query_string(), &pool);
    form::parse_in(b"", ParseOptions::default(), &pool);

    let stats = pool.stats();
    assert_eq!(stats.rented, 0);
    assert_eq!(stats.allocated, 0);
}

#[test]
fn test_one_rental_per_call() {
    let pool = BufferPool::new();
    form::parse_in(
        b"a=%41&b=%42&c=%43&%64=%44",
        ParseOptions::default(),
        &pool,
    );

    let stats = pool.stats();
    assert_eq!(stats.rented, 1);
    assert_eq!(stats.returned, 1);
}

#[test]
fn test_growth_rerents() {
    let pool = BufferPool::new();
    let long_value = "%41".repeat(200);
    let input = format!("k=%41&big={}", long_value);

    let map = form::parse_in(input.as_bytes(), ParseOptions::default(), &pool);
    assert_eq!(map.get("big").map(str::len), Some(200));

    let stats = pool.stats();
    // Small buffer for "%41", then a larger one for the 600-byte segment
    assert_eq!(stats.rented, 2);
    assert_eq!(stats.outstanding(), 0);
}

#[test]
fn test_warm_pool_stops_allocating() {
    let pool = BufferPool::new();
    let input = b"name=J%C3%BCrgen&city=K%C3%B6ln";

    form::parse_in(input, ParseOptions::default(), &pool);
    let warm = pool.stats();

    for _ in 0..100 {
        form::parse_in(input, ParseOptions::default(), &pool);
    }

    let delta = pool.stats().since(&warm);
    assert_eq!(delta.rented, 100);
    assert_eq!(delta.allocated, 0);
}

#[test]
fn test_every_call_returns_its_buffer() {
    let pool = BufferPool::with_limits(2, 256);
    let mut rng = Lcg::new(5);

    for _ in 0..500 {
        let len = rng.below(400);
        let input = rng.bytes_from(NASTY, len);
        form::parse_in(&input, ParseOptions::default(), &pool);
        assert_eq!(pool.stats().outstanding(), 0);
    }

    let stats = pool.stats();
    assert!(stats.idle <= 2);
    assert_eq!(stats.rented, stats.returned);
}
