//! Error types for the role store.

/// Errors returned by [`RoleStoreClient`](crate::RoleStoreClient).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleStoreError {
    #[error("role store unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}
