use authn_resolver_sdk::AuthNResolverError;
use brgy_security::Role;
use role_store_sdk::RoleStoreError;

/// Why a caller could not be resolved.
///
/// The gate never surfaces these to the end user: every variant ends in a
/// login redirect (or a pass-through on a login page).
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No credential was presented.
    #[error("no credentials presented")]
    Unauthenticated,

    #[error("identity provider: {0}")]
    IdentityProvider(#[from] AuthNResolverError),

    #[error("role store: {0}")]
    RoleStore(#[from] RoleStoreError),

    #[error("caller resolution timed out")]
    Timeout,
}

impl GateError {
    /// `true` for failures of a collaborator, as opposed to a caller that
    /// simply is not signed in.
    #[must_use]
    pub fn is_provider_fault(&self) -> bool {
        match self {
            Self::Unauthenticated => false,
            Self::IdentityProvider(e) => !e.is_unauthorized(),
            Self::RoleStore(_) | Self::Timeout => true,
        }
    }
}

/// Invalid gate configuration. Raised once, at start-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateConfigError {
    #[error("{what} must be an absolute path starting with '/', got {value:?}")]
    NotAbsolute { what: &'static str, value: String },

    #[error("redirect parameter name must not be empty")]
    EmptyRedirectParam,

    #[error("role {0} cannot inherit its own routes")]
    SelfInheritance(Role),

    #[error("invalid override header name {0:?}")]
    InvalidHeaderName(String),

    #[error("session cookie name must not be empty")]
    EmptySessionCookie,

    #[error("resolve timeout must be greater than zero")]
    ZeroTimeout,
}
