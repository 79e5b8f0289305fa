//! Integration tests for form_parse
//!
//! These exercise the public API only: decoding behavior, buffer pool
//! accounting and parallel parsing.
//!
//! Run with: cargo test --test integration

mod helpers;

mod concurrency;
mod decoding;
mod edge_cases;
mod pooling;
