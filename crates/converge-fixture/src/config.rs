//! Fixture configuration.
//!
//! Defaults suit a local end-to-end run. Override via environment variables
//! or explicit construction.

use std::time::Duration;

use converge_core::{PollSchedule, ScheduleError, DEFAULT_TIMEOUT};

/// Default namespace the control-plane under test runs in.
pub const DEFAULT_NAMESPACE: &str = "argocd-e2e";

/// Default pause on the when/then transitions.
pub const DEFAULT_WHEN_THEN_SLEEP: Duration = Duration::from_millis(100);

/// Settings shared by every phase of a test session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Namespace used when the test does not switch to another one.
    pub namespace: String,
    /// Timeout applied by `Consequences::expect`.
    pub expect_timeout: Duration,
    /// Pause before `Actions::then` and `Consequences::when` return, giving
    /// an asynchronous action time to start taking effect.
    pub when_then_sleep: Duration,
    /// Backoff between predicate evaluations.
    pub poll_schedule: PollSchedule,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            expect_timeout: DEFAULT_TIMEOUT,
            when_then_sleep: DEFAULT_WHEN_THEN_SLEEP,
            poll_schedule: PollSchedule::default(),
        }
    }
}

impl FixtureConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CONVERGE_E2E_NAMESPACE` (default: `argocd-e2e`)
    /// - `CONVERGE_EXPECT_TIMEOUT_SECS` (default: 30, must be > 0)
    /// - `CONVERGE_WHEN_THEN_SLEEP_MS` (default: 100)
    /// - `CONVERGE_POLL_SCHEDULE_MS` (default: `10,20,50,100,200,300,500,1000`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let namespace = lookup("CONVERGE_E2E_NAMESPACE")
            .filter(|ns| !ns.trim().is_empty())
            .unwrap_or(defaults.namespace);

        let expect_timeout = match lookup("CONVERGE_EXPECT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_u64("CONVERGE_EXPECT_TIMEOUT_SECS", &raw)?),
            None => defaults.expect_timeout,
        };
        if expect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let when_then_sleep = match lookup("CONVERGE_WHEN_THEN_SLEEP_MS") {
            Some(raw) => Duration::from_millis(parse_u64("CONVERGE_WHEN_THEN_SLEEP_MS", &raw)?),
            None => defaults.when_then_sleep,
        };

        let poll_schedule = match lookup("CONVERGE_POLL_SCHEDULE_MS") {
            Some(raw) => parse_schedule(&raw)?,
            None => defaults.poll_schedule,
        };

        Ok(Self {
            namespace,
            expect_timeout,
            when_then_sleep,
            poll_schedule,
        })
    }
}

fn parse_u64(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw.to_string()))
}

fn parse_schedule(raw: &str) -> Result<PollSchedule, ConfigError> {
    let intervals = raw
        .split(',')
        .map(|part| parse_u64("CONVERGE_POLL_SCHEDULE_MS", part).map(Duration::from_millis))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PollSchedule::new(intervals)?)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but does not parse. Carries the variable name and
    /// the raw value.
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),

    /// The default expectation timeout is zero.
    #[error("CONVERGE_EXPECT_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,

    /// `CONVERGE_POLL_SCHEDULE_MS` parses but is not a valid schedule.
    #[error("invalid poll schedule: {0}")]
    Schedule(#[from] ScheduleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = FixtureConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, FixtureConfig::default());
        assert_eq!(cfg.namespace, "argocd-e2e");
        assert_eq!(cfg.expect_timeout, Duration::from_secs(30));
        assert_eq!(cfg.when_then_sleep, Duration::from_millis(100));
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = FixtureConfig::from_lookup(lookup(&[
            ("CONVERGE_E2E_NAMESPACE", "staging-e2e"),
            ("CONVERGE_EXPECT_TIMEOUT_SECS", "90"),
            ("CONVERGE_WHEN_THEN_SLEEP_MS", "0"),
            ("CONVERGE_POLL_SCHEDULE_MS", "5, 5, 25"),
        ]))
        .unwrap();
        assert_eq!(cfg.namespace, "staging-e2e");
        assert_eq!(cfg.expect_timeout, Duration::from_secs(90));
        assert_eq!(cfg.when_then_sleep, Duration::ZERO);
        assert_eq!(
            cfg.poll_schedule.intervals(),
            &[
                Duration::from_millis(5),
                Duration::from_millis(5),
                Duration::from_millis(25)
            ]
        );
    }

    #[test]
    fn blank_namespace_falls_back_to_default() {
        let cfg = FixtureConfig::from_lookup(lookup(&[("CONVERGE_E2E_NAMESPACE", "  ")])).unwrap();
        assert_eq!(cfg.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = FixtureConfig::from_lookup(lookup(&[("CONVERGE_EXPECT_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "CONVERGE_EXPECT_TIMEOUT_SECS"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = FixtureConfig::from_lookup(lookup(&[("CONVERGE_EXPECT_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn rejects_decreasing_schedule() {
        let err = FixtureConfig::from_lookup(lookup(&[("CONVERGE_POLL_SCHEDULE_MS", "50,10")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Schedule(ScheduleError::Decreasing { .. })));
    }

    #[test]
    fn from_env_reads_process_environment() {
        std::env::set_var("CONVERGE_E2E_NAMESPACE", "from-env-test");
        let cfg = FixtureConfig::from_env();
        std::env::remove_var("CONVERGE_E2E_NAMESPACE");
        assert_eq!(cfg.unwrap().namespace, "from-env-test");
    }
}
