//! # converge-store: Control-Plane Store Clients
//!
//! The collaborator the polling engine reads through. Defines the resource
//! model observed by expectations, the client traits used to list
//! applications and fetch application sets, and an in-memory backend for
//! tests.
//!
//! ## Namespace Routing
//!
//! A test session holds [`StoreClients`]: one application client, the
//! application set client for the test namespace, and optional external
//! application set clients keyed by namespace. A namespace override on the
//! session selects the matching external client.
//!
//! ## Absence Is Not An Error
//!
//! Looking up an object that does not exist yet returns `Ok(None)` or an
//! empty list. Only a store that cannot answer returns a [`StoreError`].

pub mod client;
pub mod error;
pub mod memory;
pub mod model;

pub use client::{ApplicationClient, ApplicationSetClient, StoreClients};
pub use error::StoreError;
pub use memory::{MemoryStore, NamespacedApplicationSets};
pub use model::{Application, ApplicationSet, ObjectMeta};
