//! The access decision.
//!
//! Evaluation order for one request:
//! 1. Login pages: a resolvable caller is sent on (`redirectTo` target or
//!    home dashboard); anyone else sees the page if it is public, and is
//!    sent to login otherwise.
//! 2. Public paths pass without touching any provider.
//! 3. The caller is resolved; failure of any kind sends them to login with
//!    the original path in `redirectTo`.
//! 4. The role is checked against the policy; a refused caller is sent to
//!    their home dashboard.

use std::sync::Arc;
use std::time::Duration;

use authn_resolver_sdk::AuthNResolverClient;
use brgy_security::SecurityContext;
use http::HeaderMap;
use role_store_sdk::RoleStoreClient;

use crate::caller::{CallerResolver, build_caller_resolver};
use crate::config::AccessGateConfig;
use crate::error::{GateConfigError, GateError};
use crate::policy::AccessPolicy;

/// Who is being let through.
#[derive(Debug, Clone)]
pub enum Caller {
    /// Public path, or a login page visited without a session.
    Anonymous,
    Authenticated(SecurityContext),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// An authenticated caller opened a login page.
    AlreadyAuthenticated,
    /// The caller's role does not cover the requested path.
    Forbidden,
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Forward the request unchanged.
    Pass(Caller),
    /// Send the caller to the login flow.
    Login { location: String },
    /// Send the caller elsewhere on the site.
    Redirect {
        location: String,
        reason: RedirectReason,
    },
}

impl GateDecision {
    /// Target of the redirect, `None` for a pass-through.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Pass(_) => None,
            Self::Login { location } | Self::Redirect { location, .. } => Some(location),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

/// Stateless request gate over an immutable policy.
pub struct AccessGate {
    policy: Arc<AccessPolicy>,
    callers: Arc<dyn CallerResolver>,
    roles: Arc<dyn RoleStoreClient>,
    resolve_timeout: Duration,
}

impl AccessGate {
    #[must_use]
    pub fn new(
        policy: Arc<AccessPolicy>,
        callers: Arc<dyn CallerResolver>,
        roles: Arc<dyn RoleStoreClient>,
        resolve_timeout: Duration,
    ) -> Self {
        Self {
            policy,
            callers,
            roles,
            resolve_timeout,
        }
    }

    /// Build the gate described by `cfg` on top of the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] if the configuration is invalid.
    pub fn from_config(
        cfg: &AccessGateConfig,
        authn: Arc<dyn AuthNResolverClient>,
        roles: Arc<dyn RoleStoreClient>,
    ) -> Result<Self, GateConfigError> {
        if cfg.resolve_timeout_ms == 0 {
            return Err(GateConfigError::ZeroTimeout);
        }
        let policy = AccessPolicy::from_config(&cfg.policy)?;
        let callers = build_caller_resolver(&cfg.identity, authn)?;

        Ok(Self::new(
            Arc::new(policy),
            callers,
            roles,
            Duration::from_millis(cfg.resolve_timeout_ms),
        ))
    }

    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Decide what happens to a request for `path` (with raw `query`).
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub async fn decide(&self, path: &str, query: Option<&str>, headers: &HeaderMap) -> GateDecision {
        if self.policy.is_login_path(path) {
            return match self.resolve(headers).await {
                Ok(ctx) => {
                    let location = self.policy.post_login_location(ctx.role(), query);
                    tracing::debug!(role = %ctx.role(), %location, "already signed in, leaving login page");
                    GateDecision::Redirect {
                        location,
                        reason: RedirectReason::AlreadyAuthenticated,
                    }
                }
                Err(err) => {
                    log_resolution_failure(&err);
                    if self.policy.is_public(path) {
                        GateDecision::Pass(Caller::Anonymous)
                    } else {
                        GateDecision::Login {
                            location: self.policy.login_location(path),
                        }
                    }
                }
            };
        }

        if self.policy.is_public(path) {
            return GateDecision::Pass(Caller::Anonymous);
        }

        let ctx = match self.resolve(headers).await {
            Ok(ctx) => ctx,
            Err(err) => {
                log_resolution_failure(&err);
                return GateDecision::Login {
                    location: self.policy.login_location(path),
                };
            }
        };

        if self.policy.is_allowed(ctx.role(), path) {
            return GateDecision::Pass(Caller::Authenticated(ctx));
        }

        let location = self.policy.home_for(ctx.role()).to_owned();
        tracing::info!(
            subject = ctx.subject_id(),
            role = %ctx.role(),
            %location,
            "role not permitted on path, redirecting home"
        );
        GateDecision::Redirect {
            location,
            reason: RedirectReason::Forbidden,
        }
    }

    async fn resolve(&self, headers: &HeaderMap) -> Result<SecurityContext, GateError> {
        match tokio::time::timeout(self.resolve_timeout, self.resolve_unbounded(headers)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(GateError::Timeout),
        }
    }

    async fn resolve_unbounded(&self, headers: &HeaderMap) -> Result<SecurityContext, GateError> {
        let caller = self.callers.resolve(headers).await?;

        let role = match caller.role {
            Some(role) => role,
            None => self
                .roles
                .get_role(&caller.identity)
                .await?
                .unwrap_or_else(|| {
                    tracing::debug!(
                        subject = caller.identity.subject_id(),
                        default_role = %self.policy.default_role(),
                        "no role on record, applying default"
                    );
                    self.policy.default_role()
                }),
        };

        Ok(SecurityContext::new(caller.identity, role))
    }
}

fn log_resolution_failure(err: &GateError) {
    if err.is_provider_fault() {
        tracing::warn!(error = %err, "caller resolution failed, treating as unauthenticated");
    } else {
        tracing::debug!(error = %err, "unauthenticated request");
    }
}
