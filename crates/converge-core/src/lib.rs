//! # converge-core: Polling Assertion Engine
//!
//! Verifies eventually-consistent state by evaluating a caller-supplied
//! predicate until it reports a definite verdict or a deadline passes.
//!
//! ## Components
//!
//! - **Evaluation** (`evaluation.rs`): the three-way verdict returned by every
//!   predicate invocation: `Pending`, `Succeeded`, `Failed`.
//!
//! - **Poll schedule** (`schedule.rs`): immutable, non-decreasing backoff
//!   intervals (10ms up to 1s by default) walked by a per-wait cursor that
//!   plateaus at the last interval.
//!
//! - **Clock** (`clock.rs`): injectable time source. `SystemClock` blocks the
//!   calling thread; `ManualClock` advances virtual time and records sleeps.
//!
//! - **Poll loop** (`poll.rs`): `Poller::await_expectation` owns the deadline
//!   and the succeed/fail/timeout decision.
//!
//! ## Crate Policy
//!
//! - The loop returns `Result<Convergence, ExpectationError>`. It never
//!   panics on a failed or timed-out expectation; aborting a test is the
//!   harness's concern.
//! - No global state. Every wait owns its deadline and cursor.
//! - No dependencies on other `converge-*` crates.

pub mod clock;
pub mod error;
pub mod evaluation;
pub mod poll;
pub mod schedule;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ExpectationError;
pub use evaluation::{Evaluation, EvaluationState};
pub use poll::{await_expectation, Convergence, Poller, DEFAULT_TIMEOUT};
pub use schedule::{PollSchedule, ScheduleCursor, ScheduleError};
