//! Error types for the identity provider.

/// Errors returned by [`AuthNResolverClient`](crate::AuthNResolverClient).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthNResolverError {
    /// The token was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The provider could not be reached or answered with a server error.
    #[error("identity provider unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthNResolverError {
    /// `true` when the caller simply is not authenticated, as opposed to a
    /// provider fault.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
