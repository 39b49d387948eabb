//! Timeout proxy integration tests.

mod deadlines;
