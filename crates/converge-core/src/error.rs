//! # Error Types: Terminal Expectation Outcomes
//!
//! An expectation ends in success or in one of exactly two errors. Both are
//! terminal: the poll loop never resumes after producing one, and the test
//! harness is expected to abort the enclosing test on either.

use std::time::Duration;
use thiserror::Error;

/// A poll loop that did not converge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpectationError {
    /// The predicate reported a definite failure.
    #[error("failed expectation: {message}")]
    Failed {
        /// Message returned with the `Failed` verdict.
        message: String,
        /// 1-based attempt that produced the verdict.
        attempt: u32,
    },

    /// The deadline passed while the predicate was still pending.
    #[error("timeout waiting for: {message}")]
    TimedOut {
        /// Message of the last `Pending` verdict, empty if none was observed.
        message: String,
        /// Number of evaluations performed.
        attempts: u32,
        /// The timeout the loop was given.
        timeout: Duration,
    },
}

impl ExpectationError {
    /// The predicate message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            Self::Failed { message, .. } | Self::TimedOut { message, .. } => message,
        }
    }

    /// Number of predicate evaluations performed before termination.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Failed { attempt, .. } => *attempt,
            Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}
