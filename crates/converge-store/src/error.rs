//! Store client error types.

/// Errors from store clients.
///
/// A missing object is not an error. Lookups report absence as `None`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("store unavailable during {operation}: {reason}")]
    Unavailable {
        /// The operation that was attempted, e.g. `list applications`.
        operation: String,
        /// Human-readable cause.
        reason: String,
    },

    /// A namespace override names a namespace with no registered client.
    #[error("no application set client registered for namespace {namespace}")]
    NoClientForNamespace {
        /// The requested namespace.
        namespace: String,
    },

    /// The object cannot be stored as given.
    #[error("invalid object: {0}")]
    InvalidObject(String),
}
