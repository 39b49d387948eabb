//! Baseline proxy integration tests.

mod sampling;
