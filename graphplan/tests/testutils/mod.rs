//! Test utilities for GraphPlan integration tests
//!
//! - movie_fixture: the movie schema most tests plan against
//! - recording_executor: a traversal executor that records every fragment it runs

#![allow(dead_code)]

pub mod movie_fixture;
pub mod recording_executor;

/// Install env_logger once per test binary; honours RUST_LOG
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
