//! # converge-fixture: Given/When/Then Harness
//!
//! Wraps the polling engine in the three-phase protocol used by end-to-end
//! tests of an eventually-consistent control-plane:
//!
//! - **Given** ([`Context`]): session setup. Store clients, configuration,
//!   clock, name of the application set under test, namespace override.
//! - **When** ([`Actions`]): create, update, or delete the application set.
//! - **Then** ([`Consequences`]): poll expectations until they converge.
//!
//! ```no_run
//! use converge_core::Evaluation;
//! use converge_fixture::{Context, FixtureConfig};
//! use converge_store::{MemoryStore, StoreClients};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! let config = FixtureConfig::default();
//! let clients = StoreClients::in_memory(&store, &config.namespace, &[]);
//!
//! Context::new(clients, config)
//!     .name("simple-list-generator")
//!     .when()
//!     .create(json!({"generators": [{"list": {"elements": []}}]}))
//!     .then()
//!     .expect(|c| match c.app("my-cluster-guestbook") {
//!         Some(_) => Evaluation::succeeded("application generated"),
//!         None => Evaluation::pending("application not generated yet"),
//!     });
//! ```
//!
//! ## Failure Semantics
//!
//! A failed or timed-out expectation, and any store error, abort the test
//! by panicking (see [`fatal`]). Use
//! [`Consequences::try_expect_with_timeout`] to inspect an outcome instead.

pub mod actions;
pub mod config;
pub mod consequences;
pub mod context;
pub mod fatal;
pub mod logging;

pub use actions::Actions;
pub use config::{ConfigError, FixtureConfig};
pub use consequences::Consequences;
pub use context::Context;
pub use logging::init_tracing;
