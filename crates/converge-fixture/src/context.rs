//! # Context: The "Given" Phase
//!
//! Holds the test session: store clients, configuration, clock, the name of
//! the application set under test, and an optional namespace override. The
//! session is threaded through every phase by value. Nothing is global, so
//! tests running in parallel never observe each other's settings.

use std::sync::Arc;

use converge_core::{Clock, Poller, SystemClock};
use converge_store::StoreClients;

use crate::actions::Actions;
use crate::config::FixtureConfig;

/// Session state for one test.
#[derive(Clone)]
pub struct Context {
    clients: StoreClients,
    config: FixtureConfig,
    clock: Arc<dyn Clock>,
    poller: Poller,
    name: String,
    switch_to_namespace: Option<String>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("switch_to_namespace", &self.switch_to_namespace)
            .field("config", &self.config)
            .field("clients", &self.clients)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Session on the wall clock.
    pub fn new(clients: StoreClients, config: FixtureConfig) -> Self {
        Self::with_clock(clients, config, Arc::new(SystemClock))
    }

    /// Session on an injected clock. Phase pauses and poll backoff both
    /// go through it.
    pub fn with_clock(clients: StoreClients, config: FixtureConfig, clock: Arc<dyn Clock>) -> Self {
        let poller = Poller::new(Arc::clone(&clock), config.poll_schedule.clone());
        Self {
            clients,
            config,
            clock,
            poller,
            name: String::new(),
            switch_to_namespace: None,
        }
    }

    /// Set the name of the application set under test.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Run the rest of the test against another namespace. Application sets
    /// are then read through the external client registered for it.
    pub fn switch_to_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.switch_to_namespace = Some(namespace.into());
        self
    }

    /// Move to the action phase.
    pub fn when(self) -> Actions {
        tracing::debug!(name = %self.name, "given -> when");
        Actions::new(self)
    }

    pub fn application_set_name(&self) -> &str {
        &self.name
    }

    pub fn namespace_override(&self) -> Option<&str> {
        self.switch_to_namespace.as_deref()
    }

    /// The namespace the test currently operates in.
    pub fn namespace(&self) -> &str {
        self.switch_to_namespace
            .as_deref()
            .unwrap_or(&self.config.namespace)
    }

    pub fn clients(&self) -> &StoreClients {
        &self.clients
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Block for the configured when/then pause.
    pub(crate) fn pause(&self) {
        self.clock.sleep(self.config.when_then_sleep);
    }
}
