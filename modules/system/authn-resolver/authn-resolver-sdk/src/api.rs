//! Public API trait for the identity provider.

use async_trait::async_trait;

use crate::error::AuthNResolverError;
use crate::models::AuthenticationResult;

/// Identity provider consulted by the access gate.
///
/// Implementations validate a session token and return the verified
/// identity behind it. They must not cache decisions across requests.
#[async_trait]
pub trait AuthNResolverClient: Send + Sync {
    /// Validate a bearer token and resolve the identity behind it.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is empty, unknown, expired or rejected
    /// - `ServiceUnavailable` if the backing provider cannot be reached
    /// - `Internal` for unexpected errors (e.g. an undecodable answer)
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError>;
}
