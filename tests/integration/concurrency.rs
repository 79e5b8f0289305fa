//! Parallel parse calls sharing one buffer pool.

use std::sync::Arc;
use std::thread;

use form_parse::buffer::BufferPool;
use form_parse::config::PoolConfig;
use form_parse::form::{self, ParseOptions};
use form_parse::pool::{ParseJob, ParsePool};

use crate::helpers::{Lcg, NASTY};

fn inputs(seed: u64, count: usize) -> Vec<Vec<u8>> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let len = rng.below(200);
            rng.bytes_from(NASTY, len)
        })
        .collect()
}

#[test]
fn test_threads_match_single_threaded_results() {
    let inputs = Arc::new(inputs(11, 64));
    let expected: Vec<_> = inputs
        .iter()
        .map(|input| form::parse_in(input, ParseOptions::query_string(), &BufferPool::new()))
        .collect();

    let shared = Arc::new(BufferPool::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let inputs = Arc::clone(&inputs);
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                // Each thread walks the inputs from a different offset
                (0..inputs.len())
                    .map(|i| (i + t * 7) % inputs.len())
                    .map(|i| (i, form::parse_in(&inputs[i], ParseOptions::query_string(), &shared)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for (i, map) in handle.join().unwrap() {
            assert_eq!(map, expected[i], "input {}", i);
        }
    }

    assert_eq!(shared.stats().outstanding(), 0);
}

#[test]
fn test_shared_global_pool_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|t| {
            thread::spawn(move || {
                for n in 0..200 {
                    let input = format!("t={}&n={}&v=%3{}", t, n, n % 10);
                    let map = form::parse(input.as_bytes(), false);
                    assert_eq!(map.get("t"), Some(t.to_string().as_str()));
                    assert_eq!(map.get("n"), Some(n.to_string().as_str()));
                    assert_eq!(map.get("v"), Some((n % 10).to_string().as_str()));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_parse_pool_matches_direct_parse() {
    let inputs = inputs(23, 40);
    let expected: Vec<_> = inputs
        .iter()
        .map(|input| form::parse_with(input, ParseOptions::default()))
        .collect();

    let buffers = Arc::new(BufferPool::new());
    let pool = ParsePool::new(&PoolConfig::new(4, 64, None), Arc::clone(&buffers)).unwrap();

    let jobs = inputs
        .into_iter()
        .map(|input| ParseJob::new(input, ParseOptions::default()));
    let results = tokio_test::block_on(pool.parse_all(jobs));

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result.unwrap(), expected[i], "input {}", i);
    }

    assert_eq!(buffers.stats().outstanding(), 0);
    pool.shutdown();
}
