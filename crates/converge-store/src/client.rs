//! # Store Client Interface
//!
//! Traits through which the fixture reads and writes control-plane
//! resources, plus [`StoreClients`], the bundle a test session carries.
//!
//! Application sets are served by namespace-bound clients. A test that
//! switches to another namespace reads its application sets through the
//! external client registered for that namespace, while applications are
//! always listed through the shared application client with an explicit
//! namespace argument.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::model::{Application, ApplicationSet};

/// Access to applications across namespaces.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc` by every phase of a test.
pub trait ApplicationClient: Send + Sync {
    /// List the applications in `namespace`, ordered by name.
    fn list(&self, namespace: &str) -> Result<Vec<Application>, StoreError>;

    /// Create or replace an application. Returns the stored object.
    fn apply(&self, app: Application) -> Result<Application, StoreError>;

    /// Delete an application. Returns whether it existed.
    fn delete(&self, namespace: &str, name: &str) -> Result<bool, StoreError>;
}

/// Access to application sets within one namespace.
pub trait ApplicationSetClient: Send + Sync {
    /// The namespace this client is bound to.
    fn namespace(&self) -> &str;

    /// Fetch an application set by name. `Ok(None)` when it does not exist.
    fn get(&self, name: &str) -> Result<Option<ApplicationSet>, StoreError>;

    /// Create or replace an application set in this client's namespace.
    fn apply(&self, set: ApplicationSet) -> Result<ApplicationSet, StoreError>;

    /// Delete an application set. Returns whether it existed.
    fn delete(&self, name: &str) -> Result<bool, StoreError>;
}

/// The store clients available to one test session.
#[derive(Clone)]
pub struct StoreClients {
    applications: Arc<dyn ApplicationClient>,
    application_sets: Arc<dyn ApplicationSetClient>,
    external_application_sets: HashMap<String, Arc<dyn ApplicationSetClient>>,
}

impl fmt::Debug for StoreClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut external: Vec<&str> = self
            .external_application_sets
            .keys()
            .map(String::as_str)
            .collect();
        external.sort_unstable();
        f.debug_struct("StoreClients")
            .field("default_namespace", &self.application_sets.namespace())
            .field("external_namespaces", &external)
            .finish_non_exhaustive()
    }
}

impl StoreClients {
    pub fn new(
        applications: Arc<dyn ApplicationClient>,
        application_sets: Arc<dyn ApplicationSetClient>,
    ) -> Self {
        Self {
            applications,
            application_sets,
            external_application_sets: HashMap::new(),
        }
    }

    /// Register the application set client used when a test switches to
    /// `client.namespace()`.
    pub fn with_external(mut self, client: Arc<dyn ApplicationSetClient>) -> Self {
        self.external_application_sets
            .insert(client.namespace().to_string(), client);
        self
    }

    /// Clients backed by one [`MemoryStore`]: the default namespace plus
    /// one external client per entry of `external_namespaces`.
    pub fn in_memory(store: &MemoryStore, namespace: &str, external_namespaces: &[&str]) -> Self {
        let mut clients = Self::new(
            Arc::new(store.clone()),
            Arc::new(store.application_sets(namespace)),
        );
        for ns in external_namespaces {
            clients = clients.with_external(Arc::new(store.application_sets(ns)));
        }
        clients
    }

    pub fn applications(&self) -> &Arc<dyn ApplicationClient> {
        &self.applications
    }

    /// Select the application set client for an optional namespace override.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoClientForNamespace`] if the override names a
    /// namespace without a registered external client.
    pub fn application_sets_for(
        &self,
        namespace_override: Option<&str>,
    ) -> Result<&Arc<dyn ApplicationSetClient>, StoreError> {
        match namespace_override {
            None => Ok(&self.application_sets),
            Some(ns) => self.external_application_sets.get(ns).ok_or_else(|| {
                StoreError::NoClientForNamespace {
                    namespace: ns.to_string(),
                }
            }),
        }
    }
}
