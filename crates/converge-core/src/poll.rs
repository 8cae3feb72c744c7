//! # Poll Loop: Wait Until Converged, Failed, or Timed Out
//!
//! Repeatedly evaluates a predicate against external state that converges
//! asynchronously. Between evaluations the loop blocks for the interval at
//! the current position of its [`PollSchedule`].
//!
//! ## Termination
//!
//! - `Succeeded` returns [`Convergence`] immediately.
//! - `Failed` returns [`ExpectationError::Failed`] immediately. A failed
//!   verdict is never retried.
//! - Reaching the deadline while still `Pending` returns
//!   [`ExpectationError::TimedOut`] carrying the last pending message.
//!
//! The deadline is checked before every evaluation, so the loop never
//! evaluates past it, and it overshoots the deadline by at most one
//! interval of the schedule.
//!
//! The loop itself never panics or aborts. Turning an error into a failed
//! test is the caller's job.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::error::ExpectationError;
use crate::evaluation::Evaluation;
use crate::schedule::PollSchedule;

/// Timeout used when the caller does not supply one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A converged expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    /// Message of the `Succeeded` verdict.
    pub message: String,
    /// 1-based attempt that succeeded.
    pub attempts: u32,
    /// Time from the start of the wait to the successful evaluation.
    pub elapsed: Duration,
}

/// Runs poll loops against a clock and a backoff schedule.
///
/// A `Poller` holds no per-wait state. Every call to
/// [`await_expectation`](Self::await_expectation) builds its own deadline
/// and schedule cursor, so one poller can serve any number of sequential
/// or parallel waits.
#[derive(Clone)]
pub struct Poller {
    clock: Arc<dyn Clock>,
    schedule: PollSchedule,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl Poller {
    pub fn new(clock: Arc<dyn Clock>, schedule: PollSchedule) -> Self {
        Self { clock, schedule }
    }

    /// Poller on the wall clock with the default schedule.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), PollSchedule::default())
    }

    pub fn schedule(&self) -> &PollSchedule {
        &self.schedule
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Evaluate `predicate` until it succeeds, fails, or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// [`ExpectationError::Failed`] when the predicate returns `Failed`;
    /// [`ExpectationError::TimedOut`] when the deadline passes first.
    pub fn await_expectation<P>(
        &self,
        timeout: Duration,
        mut predicate: P,
    ) -> Result<Convergence, ExpectationError>
    where
        P: FnMut() -> Evaluation,
    {
        let start = self.clock.now();
        // An unrepresentable deadline means the wait is effectively unbounded.
        let deadline = start.checked_add(timeout);
        let mut cursor = self.schedule.cursor();
        let mut attempts: u32 = 0;
        let mut last_message = String::new();

        while before(self.clock.now(), deadline) {
            let interval = cursor.advance();
            attempts = attempts.saturating_add(1);

            match predicate() {
                Evaluation::Succeeded(message) => {
                    tracing::info!(attempt = attempts, "expectation succeeded: {message}");
                    return Ok(Convergence {
                        message,
                        attempts,
                        elapsed: self.clock.now().saturating_duration_since(start),
                    });
                }
                Evaluation::Failed(message) => {
                    return Err(ExpectationError::Failed {
                        message,
                        attempt: attempts,
                    });
                }
                Evaluation::Pending(message) => {
                    tracing::info!(
                        attempt = attempts,
                        next_poll = ?interval,
                        "expectation pending: {message}"
                    );
                    last_message = message;
                    self.clock.sleep(interval);
                }
            }
        }

        Err(ExpectationError::TimedOut {
            message: last_message,
            attempts,
            timeout,
        })
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::system()
    }
}

fn before(now: Instant, deadline: Option<Instant>) -> bool {
    deadline.map_or(true, |d| now < d)
}

/// Wait on the wall clock with the default schedule.
///
/// # Errors
///
/// See [`Poller::await_expectation`].
pub fn await_expectation<P>(timeout: Duration, predicate: P) -> Result<Convergence, ExpectationError>
where
    P: FnMut() -> Evaluation,
{
    Poller::system().await_expectation(timeout, predicate)
}
