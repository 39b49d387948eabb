//! Circuit breaker integration tests.
//!
//! - state_machine.rs: Closed/Open/HalfOpen transitions
//! - leak_window.rs: failures spread across the leak window
//! - maintenance.rs: forced states and error count reset
