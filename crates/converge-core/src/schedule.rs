//! # Poll Schedule: Growing-Then-Plateauing Backoff
//!
//! The wait between two predicate evaluations starts short, so fast
//! convergence is observed quickly, and grows until it reaches the last
//! configured interval, where it stays for the rest of the wait.
//!
//! A [`PollSchedule`] is immutable. Each poll loop walks it through its own
//! [`ScheduleCursor`], so two loops never share position.

use std::time::Duration;
use thiserror::Error;

/// Default intervals, in milliseconds.
const DEFAULT_INTERVALS_MS: [u64; 8] = [10, 20, 50, 100, 200, 300, 500, 1000];

/// Rejected schedule definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A schedule must have at least one interval.
    #[error("poll schedule must contain at least one interval")]
    Empty,

    /// Intervals must be monotonically non-decreasing.
    #[error("poll schedule decreases at index {index}: {previous:?} -> {next:?}")]
    Decreasing {
        /// Index of the offending interval.
        index: usize,
        /// The interval before it.
        previous: Duration,
        /// The offending interval.
        next: Duration,
    },
}

/// An ordered, non-empty, non-decreasing sequence of wait intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSchedule {
    intervals: Vec<Duration>,
}

impl PollSchedule {
    /// Build a schedule from explicit intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Empty`] for an empty list and
    /// [`ScheduleError::Decreasing`] if any interval is shorter than the one
    /// before it.
    pub fn new(intervals: Vec<Duration>) -> Result<Self, ScheduleError> {
        if intervals.is_empty() {
            return Err(ScheduleError::Empty);
        }
        for (index, pair) in intervals.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(ScheduleError::Decreasing {
                    index: index + 1,
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        Ok(Self { intervals })
    }

    /// A schedule that always waits the same interval.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            intervals: vec![interval],
        }
    }

    pub fn intervals(&self) -> &[Duration] {
        &self.intervals
    }

    /// The plateau interval, repeated once the schedule is exhausted.
    pub fn max_interval(&self) -> Duration {
        // Non-empty by construction.
        self.intervals[self.intervals.len() - 1]
    }

    /// Start a fresh walk over this schedule.
    pub fn cursor(&self) -> ScheduleCursor<'_> {
        ScheduleCursor {
            schedule: self,
            index: None,
        }
    }
}

impl Default for PollSchedule {
    /// 10ms, 20ms, 50ms, 100ms, 200ms, 300ms, 500ms, 1s.
    fn default() -> Self {
        Self {
            intervals: DEFAULT_INTERVALS_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        }
    }
}

/// Position within a [`PollSchedule`].
///
/// Starts before the first interval. Each [`advance`](Self::advance) moves
/// one step forward, saturating at the last index.
#[derive(Debug, Clone)]
pub struct ScheduleCursor<'a> {
    schedule: &'a PollSchedule,
    index: Option<usize>,
}

impl ScheduleCursor<'_> {
    /// Step forward and return the interval at the new position.
    pub fn advance(&mut self) -> Duration {
        let last = self.schedule.intervals.len() - 1;
        let next = match self.index {
            None => 0,
            Some(i) => (i + 1).min(last),
        };
        self.index = Some(next);
        self.schedule.intervals[next]
    }

    /// The interval at the current position, or `None` before the first
    /// [`advance`](Self::advance).
    pub fn current(&self) -> Option<Duration> {
        self.index.map(|i| self.schedule.intervals[i])
    }

    /// Current index, `None` before the first advance.
    pub fn position(&self) -> Option<usize> {
        self.index
    }
}
