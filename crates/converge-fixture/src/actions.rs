//! # Actions: The "When" Phase
//!
//! Mutates the store on behalf of the test. Every store error aborts the
//! test immediately.

use converge_store::{ApplicationSet, ApplicationSetClient};

use crate::consequences::Consequences;
use crate::context::Context;
use crate::fatal::{check, fatal};

/// Action phase of a given/when/then test.
#[derive(Debug, Clone)]
pub struct Actions {
    context: Context,
}

impl Actions {
    pub(crate) fn new(context: Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    #[track_caller]
    fn application_sets(&self) -> &dyn ApplicationSetClient {
        &**check(
            self.context
                .clients()
                .application_sets_for(self.context.namespace_override()),
        )
    }

    /// Create the application set under test with `spec`.
    #[track_caller]
    pub fn create(self, spec: serde_json::Value) -> Self {
        let set = ApplicationSet::new(self.context.namespace(), self.context.application_set_name())
            .with_spec(spec);
        self.create_application_set(set)
    }

    /// Create an explicitly built application set. Its name becomes the
    /// name under test.
    #[track_caller]
    pub fn create_application_set(mut self, set: ApplicationSet) -> Self {
        let stored = check(self.application_sets().apply(set));
        tracing::info!(
            namespace = %stored.metadata.namespace,
            name = %stored.metadata.name,
            "created application set"
        );
        self.context = self.context.name(stored.metadata.name);
        self
    }

    /// Modify the stored application set under test.
    #[track_caller]
    pub fn update<F>(self, mutate: F) -> Self
    where
        F: FnOnce(&mut ApplicationSet),
    {
        let client = self.application_sets();
        let name = self.context.application_set_name();
        let Some(mut set) = check(client.get(name)) else {
            fatal(format!("cannot update application set {name}: not found"));
        };
        mutate(&mut set);
        let stored = check(client.apply(set));
        tracing::info!(
            name = %stored.metadata.name,
            generation = stored.metadata.generation,
            "updated application set"
        );
        self
    }

    /// Delete the application set under test.
    #[track_caller]
    pub fn delete(self) -> Self {
        let name = self.context.application_set_name();
        let removed = check(self.application_sets().delete(name));
        tracing::info!(name, removed, "deleted application set");
        self
    }

    /// Run an arbitrary block between actions.
    pub fn and<F>(self, block: F) -> Self
    where
        F: FnOnce(&Self),
    {
        block(&self);
        self
    }

    /// Back to the setup phase.
    pub fn given(self) -> Context {
        self.context
    }

    /// Pause for the configured when/then interval, then move to the
    /// consequence phase.
    pub fn then(self) -> Consequences {
        self.context.pause();
        tracing::debug!(name = %self.context.application_set_name(), "when -> then");
        Consequences::new(self)
    }
}
