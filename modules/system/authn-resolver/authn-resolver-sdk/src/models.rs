//! Models for the identity provider.

use brgy_security::Identity;

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// The verified caller.
    pub identity: Identity,
}

impl From<Identity> for AuthenticationResult {
    fn from(identity: Identity) -> Self {
        Self { identity }
    }
}
