//! Caller resolution strategies.
//!
//! A [`CallerResolver`] turns request headers into an identity and, when the
//! channel carries one, a role. The strategy is picked from configuration:
//! [`ProviderCallerResolver`] validates credentials with the identity
//! provider, [`TrustedHeaderCallerResolver`] additionally accepts a caller
//! named in a trusted header and falls back to the provider otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use authn_resolver_sdk::AuthNResolverClient;
use brgy_security::{Identity, Role};
use http::header::{AUTHORIZATION, COOKIE, HeaderName};
use http::HeaderMap;
use serde::Deserialize;

use crate::config::{CallerConfig, CallerStrategy};
use crate::error::{GateConfigError, GateError};

/// Identity of the caller plus the role, if the channel supplied one.
#[derive(Debug, Clone)]
pub struct ResolvedCaller {
    pub identity: Identity,
    /// `Some` when the role came with the identity; `None` means the role
    /// store has to be asked.
    pub role: Option<Role>,
}

#[async_trait]
pub trait CallerResolver: Send + Sync {
    /// Resolve the caller behind a request.
    ///
    /// # Errors
    ///
    /// [`GateError::Unauthenticated`] when no credential is presented,
    /// [`GateError::IdentityProvider`] when the provider rejects it or fails.
    async fn resolve(&self, headers: &HeaderMap) -> Result<ResolvedCaller, GateError>;
}

/// Resolves callers through the identity provider.
pub struct ProviderCallerResolver {
    authn: Arc<dyn AuthNResolverClient>,
    session_cookie: String,
}

impl ProviderCallerResolver {
    #[must_use]
    pub fn new(authn: Arc<dyn AuthNResolverClient>, session_cookie: impl Into<String>) -> Self {
        Self {
            authn,
            session_cookie: session_cookie.into(),
        }
    }
}

#[async_trait]
impl CallerResolver for ProviderCallerResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<ResolvedCaller, GateError> {
        let Some(token) = extract_credential(headers, &self.session_cookie) else {
            return Err(GateError::Unauthenticated);
        };

        let result = self.authn.authenticate(token).await?;
        Ok(ResolvedCaller {
            identity: result.identity,
            role: None,
        })
    }
}

/// Override payload carried by the trusted header.
#[derive(Debug, Deserialize)]
struct CallerOverride {
    id: String,
    role: Role,
}

/// Accepts a caller named in a trusted header; everything else goes to the
/// identity provider. Must only be enabled where the header cannot be set
/// by end users.
pub struct TrustedHeaderCallerResolver {
    header: HeaderName,
    fallback: ProviderCallerResolver,
}

impl TrustedHeaderCallerResolver {
    #[must_use]
    pub fn new(header: HeaderName, fallback: ProviderCallerResolver) -> Self {
        Self { header, fallback }
    }

    fn read_override(&self, headers: &HeaderMap) -> Option<ResolvedCaller> {
        let raw = headers.get(&self.header)?;
        let parsed = raw
            .to_str()
            .ok()
            .and_then(|s| serde_json::from_str::<CallerOverride>(s).ok())
            .filter(|o| !o.id.trim().is_empty());

        let Some(caller) = parsed else {
            tracing::debug!(header = %self.header, "ignoring malformed caller override");
            return None;
        };

        Some(ResolvedCaller {
            identity: Identity::new(caller.id),
            role: Some(caller.role),
        })
    }
}

#[async_trait]
impl CallerResolver for TrustedHeaderCallerResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<ResolvedCaller, GateError> {
        if let Some(caller) = self.read_override(headers) {
            return Ok(caller);
        }
        self.fallback.resolve(headers).await
    }
}

/// Build the resolver selected by `cfg.strategy`.
///
/// # Errors
///
/// Returns [`GateConfigError`] if the cookie or header name is unusable.
pub fn build_caller_resolver(
    cfg: &CallerConfig,
    authn: Arc<dyn AuthNResolverClient>,
) -> Result<Arc<dyn CallerResolver>, GateConfigError> {
    if cfg.session_cookie.is_empty() {
        return Err(GateConfigError::EmptySessionCookie);
    }
    let provider = ProviderCallerResolver::new(authn, cfg.session_cookie.clone());

    match cfg.strategy {
        CallerStrategy::Provider => Ok(Arc::new(provider)),
        CallerStrategy::TrustedHeader => {
            let header = HeaderName::from_bytes(cfg.override_header.as_bytes())
                .map_err(|_| GateConfigError::InvalidHeaderName(cfg.override_header.clone()))?;
            tracing::warn!(
                header = %header,
                "trusted caller override enabled; requests carrying this header bypass the identity provider"
            );
            Ok(Arc::new(TrustedHeaderCallerResolver::new(header, provider)))
        }
    }
}

/// Session credential of the request: the bearer token, or the session cookie.
fn extract_credential<'a>(headers: &'a HeaderMap, session_cookie: &str) -> Option<&'a str> {
    extract_bearer_token(headers).or_else(|| extract_cookie(headers, session_cookie))
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
        .filter(|token| !token.is_empty())
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::MockAuthN;
    use http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        map
    }

    fn trusted(authn: Arc<MockAuthN>) -> Arc<dyn CallerResolver> {
        let cfg = CallerConfig {
            strategy: CallerStrategy::TrustedHeader,
            ..CallerConfig::default()
        };
        build_caller_resolver(&cfg, authn).unwrap()
    }

    #[test]
    fn bearer_token_is_preferred_over_cookie() {
        let h = headers(&[
            ("authorization", "Bearer tok-a"),
            ("cookie", "sb-access-token=tok-b"),
        ]);
        assert_eq!(extract_credential(&h, "sb-access-token"), Some("tok-a"));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let h = headers(&[
            ("cookie", "theme=dark"),
            ("cookie", "lang=fil; sb-access-token=tok-c; other=1"),
        ]);
        assert_eq!(extract_credential(&h, "sb-access-token"), Some("tok-c"));
    }

    #[test]
    fn empty_or_foreign_credentials_are_ignored() {
        let h = headers(&[("authorization", "Basic abc"), ("cookie", "sb-access-token=")]);
        assert_eq!(extract_credential(&h, "sb-access-token"), None);

        let h = headers(&[("authorization", "Bearer   ")]);
        assert_eq!(extract_credential(&h, "sb-access-token"), None);
    }

    #[tokio::test]
    async fn provider_strategy_without_credentials_skips_provider() {
        let authn = Arc::new(MockAuthN::with_tokens(&[("tok", "user-1")]));
        let resolver = build_caller_resolver(&CallerConfig::default(), authn.clone()).unwrap();

        let err = resolver.resolve(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, GateError::Unauthenticated));
        assert_eq!(authn.calls(), 0);
    }

    #[tokio::test]
    async fn provider_strategy_ignores_override_header() {
        let authn = Arc::new(MockAuthN::with_tokens(&[]));
        let resolver = build_caller_resolver(&CallerConfig::default(), authn).unwrap();

        let h = headers(&[("x-brgy-caller", r#"{"id":"root","role":"superadmin"}"#)]);
        assert!(resolver.resolve(&h).await.is_err());
    }

    #[tokio::test]
    async fn trusted_header_supplies_identity_and_role() {
        let authn = Arc::new(MockAuthN::with_tokens(&[]));
        let resolver = trusted(authn.clone());

        let h = headers(&[("x-brgy-caller", r#"{"id":"tanod-9","role":"tanod"}"#)]);
        let caller = resolver.resolve(&h).await.unwrap();

        assert_eq!(caller.identity.subject_id(), "tanod-9");
        assert_eq!(caller.role, Some(Role::Tanod));
        assert_eq!(authn.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_override_falls_back_to_provider() {
        let authn = Arc::new(MockAuthN::with_tokens(&[("tok", "user-1")]));
        let resolver = trusted(authn.clone());

        for payload in [
            "not json",
            r#"{"id":"x","role":"mayor"}"#,
            r#"{"id":"  ","role":"admin"}"#,
            r#"{"role":"admin"}"#,
        ] {
            let h = headers(&[("x-brgy-caller", payload), ("authorization", "Bearer tok")]);
            let caller = resolver.resolve(&h).await.unwrap();

            assert_eq!(caller.identity.subject_id(), "user-1", "payload {payload}");
            assert_eq!(caller.role, None);
        }
        assert_eq!(authn.calls(), 4);
    }

    #[test]
    fn invalid_override_header_name_is_rejected() {
        let cfg = CallerConfig {
            strategy: CallerStrategy::TrustedHeader,
            override_header: "bad header".to_owned(),
            ..CallerConfig::default()
        };

        let err = build_caller_resolver(&cfg, Arc::new(MockAuthN::with_tokens(&[])))
            .err()
            .unwrap();
        assert_eq!(err, GateConfigError::InvalidHeaderName("bad header".to_owned()));
    }
}
