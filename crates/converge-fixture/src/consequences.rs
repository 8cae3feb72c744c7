//! # Consequences: The "Then" Phase
//!
//! Asserts on eventually-consistent state. Each `expect*` call runs one
//! poll loop over a caller-supplied expectation, which receives this
//! [`Consequences`] to look objects up through the session's store clients.
//!
//! Lookups report a missing object as `None`, so an expectation can answer
//! `Pending` while the control-plane catches up. A store that cannot answer
//! aborts the test at once; the poll loop does not retry it.

use std::time::Duration;

use converge_core::{Convergence, Evaluation, ExpectationError};
use converge_store::{Application, ApplicationSet};

use crate::actions::Actions;
use crate::context::Context;
use crate::fatal::{check, settle};

/// Consequence phase of a given/when/then test.
#[derive(Debug, Clone)]
pub struct Consequences {
    actions: Actions,
}

impl Consequences {
    pub(crate) fn new(actions: Actions) -> Self {
        Self { actions }
    }

    pub fn context(&self) -> &Context {
        self.actions.context()
    }

    /// Wait for `expectation` with the configured default timeout.
    #[track_caller]
    pub fn expect<E>(self, expectation: E) -> Self
    where
        E: FnMut(&Consequences) -> Evaluation,
    {
        let timeout = self.context().config().expect_timeout;
        self.expect_with_timeout(expectation, timeout)
    }

    /// Wait for `expectation`, aborting the test if it fails or `timeout`
    /// elapses first.
    #[track_caller]
    pub fn expect_with_timeout<E>(self, expectation: E, timeout: Duration) -> Self
    where
        E: FnMut(&Consequences) -> Evaluation,
    {
        settle(self.try_expect_with_timeout(expectation, timeout));
        self
    }

    /// Wait for `expectation` and hand back the outcome instead of aborting.
    pub fn try_expect_with_timeout<E>(
        &self,
        mut expectation: E,
        timeout: Duration,
    ) -> Result<Convergence, ExpectationError>
    where
        E: FnMut(&Consequences) -> Evaluation,
    {
        self.context()
            .poller()
            .await_expectation(timeout, || expectation(self))
    }

    /// Run an arbitrary block between expectations.
    pub fn and<F>(self, block: F) -> Self
    where
        F: FnOnce(&Self),
    {
        block(&self);
        self
    }

    /// Back to the setup phase.
    pub fn given(self) -> Context {
        self.actions.given()
    }

    /// Pause for the configured when/then interval, then return to the
    /// action phase.
    pub fn when(self) -> Actions {
        self.context().pause();
        tracing::debug!(name = %self.context().application_set_name(), "then -> when");
        self.actions
    }

    /// The application named `name` in the current namespace, if any.
    #[track_caller]
    pub fn app(&self, name: &str) -> Option<Application> {
        self.apps().into_iter().find(|app| app.metadata.name == name)
    }

    /// Every application in the current namespace.
    #[track_caller]
    pub fn apps(&self) -> Vec<Application> {
        let ctx = self.context();
        check(ctx.clients().applications().list(ctx.namespace()))
    }

    /// The application set named `name`, read through the client selected
    /// by the namespace override.
    #[track_caller]
    pub fn application_set(&self, name: &str) -> Option<ApplicationSet> {
        let ctx = self.context();
        let client = check(ctx.clients().application_sets_for(ctx.namespace_override()));
        check(client.get(name))
    }
}
