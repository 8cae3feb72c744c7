//! # Evaluation: The Three-Way Predicate Verdict
//!
//! Every predicate invocation produces exactly one [`Evaluation`]. A boolean
//! would collapse "not yet" and "never" into the same value; the three-way
//! split lets a predicate stop the poll loop early when its condition can no
//! longer become true (the object was deleted, the status went terminal).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The verdict of a single predicate invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum Evaluation {
    /// The observed state has not converged yet. Keep polling.
    Pending(String),
    /// The observed state satisfies the expectation.
    Succeeded(String),
    /// The observed state can never satisfy the expectation.
    Failed(String),
}

/// Discriminant of an [`Evaluation`], without the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationState {
    Pending,
    Succeeded,
    Failed,
}

impl Evaluation {
    pub fn pending(message: impl Into<String>) -> Self {
        Self::Pending(message.into())
    }

    pub fn succeeded(message: impl Into<String>) -> Self {
        Self::Succeeded(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// The state discriminant.
    pub fn state(&self) -> EvaluationState {
        match self {
            Self::Pending(_) => EvaluationState::Pending,
            Self::Succeeded(_) => EvaluationState::Succeeded,
            Self::Failed(_) => EvaluationState::Failed,
        }
    }

    /// The diagnostic message attached to the verdict.
    pub fn message(&self) -> &str {
        match self {
            Self::Pending(m) | Self::Succeeded(m) | Self::Failed(m) => m,
        }
    }

    /// Consume the verdict, keeping only its message.
    pub fn into_message(self) -> String {
        match self {
            Self::Pending(m) | Self::Succeeded(m) | Self::Failed(m) => m,
        }
    }

    /// Whether the verdict ends the poll loop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending(_))
    }
}

impl fmt::Display for EvaluationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.state(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_message() {
        assert_eq!(Evaluation::pending("waiting").message(), "waiting");
        assert_eq!(Evaluation::succeeded("done").message(), "done");
        assert_eq!(Evaluation::failed("gone").into_message(), "gone");
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!Evaluation::pending("x").is_terminal());
        assert!(Evaluation::succeeded("x").is_terminal());
        assert!(Evaluation::failed("x").is_terminal());
    }

    #[test]
    fn state_matches_variant() {
        assert_eq!(Evaluation::pending("").state(), EvaluationState::Pending);
        assert_eq!(
            Evaluation::succeeded("").state(),
            EvaluationState::Succeeded
        );
        assert_eq!(Evaluation::failed("").state(), EvaluationState::Failed);
    }

    #[test]
    fn display_includes_state_and_message() {
        assert_eq!(
            Evaluation::pending("app not found").to_string(),
            "pending: app not found"
        );
        assert_eq!(Evaluation::failed("deleted").to_string(), "failed: deleted");
    }

    #[test]
    fn serializes_as_tagged_object() {
        let json = serde_json::to_value(Evaluation::succeeded("ok")).unwrap();
        assert_eq!(json, serde_json::json!({"state": "succeeded", "message": "ok"}));

        let back: Evaluation = serde_json::from_value(json).unwrap();
        assert_eq!(back, Evaluation::succeeded("ok"));
    }
}
