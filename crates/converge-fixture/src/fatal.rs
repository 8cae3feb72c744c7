//! # Fatal Abort Boundary
//!
//! The only place the fixture turns a returned error into a failed test.
//! A Rust test fails by panicking, so every function here diverges or
//! unwraps. `#[track_caller]` makes the reported location the test line
//! that issued the failing call, not this module.

use std::fmt;

use converge_core::{Convergence, ExpectationError};
use converge_store::StoreError;

/// Abort the current test with `message`.
#[track_caller]
pub fn fatal(message: impl fmt::Display) -> ! {
    panic!("{message}")
}

/// Unwrap a store result, aborting the test on any store error.
///
/// Store errors are never retried by the poll loop.
#[track_caller]
pub fn check<T>(result: Result<T, StoreError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fatal(err),
    }
}

/// Unwrap an expectation result, aborting the test on failure or timeout.
#[track_caller]
pub fn settle(result: Result<Convergence, ExpectationError>) -> Convergence {
    match result {
        Ok(done) => done,
        Err(err) => fatal(err),
    }
}
