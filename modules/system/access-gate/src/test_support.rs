#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, AuthenticationResult};
use brgy_security::{Identity, Role};
use role_store_sdk::{RoleStoreClient, RoleStoreError};

use crate::config::{AccessGateConfig, CallerStrategy};
use crate::gate::AccessGate;

/// Identity provider with a fixed token table that counts its calls.
pub struct MockAuthN {
    tokens: HashMap<String, String>,
    failure: Option<AuthNResolverError>,
    calls: AtomicUsize,
}

impl MockAuthN {
    /// `pairs` maps bearer token to subject id.
    #[must_use]
    pub fn with_tokens(pairs: &[(&str, &str)]) -> Self {
        Self {
            tokens: pairs
                .iter()
                .map(|(t, s)| ((*t).to_owned(), (*s).to_owned()))
                .collect(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that fails every call with `err`.
    #[must_use]
    pub fn failing(err: AuthNResolverError) -> Self {
        Self {
            failure: Some(err),
            ..Self::with_tokens(&[])
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthNResolverClient for MockAuthN {
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.tokens
            .get(bearer_token)
            .map(|subject| {
                AuthenticationResult::from(
                    Identity::new(subject.clone()).with_access_token(bearer_token),
                )
            })
            .ok_or_else(|| AuthNResolverError::Unauthorized("unknown token".to_owned()))
    }
}

/// Role store with a fixed table, optional failure and optional latency.
pub struct MockRoleStore {
    roles: HashMap<String, Role>,
    failure: Option<RoleStoreError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockRoleStore {
    #[must_use]
    pub fn with_roles(pairs: &[(&str, Role)]) -> Self {
        Self {
            roles: pairs.iter().map(|(s, r)| ((*s).to_owned(), *r)).collect(),
            failure: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing(err: RoleStoreError) -> Self {
        Self {
            failure: Some(err),
            ..Self::with_roles(&[])
        }
    }

    /// Store that answers correctly, but only after `delay`.
    #[must_use]
    pub fn slow(pairs: &[(&str, Role)], delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::with_roles(pairs)
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoleStoreClient for MockRoleStore {
    async fn get_role(&self, identity: &Identity) -> Result<Option<Role>, RoleStoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.roles.get(identity.subject_id()).copied())
    }
}

/// One bearer token per role: `tok-<role>` authenticates `user-<role>`,
/// who holds that role.
#[must_use]
pub fn role_fixtures() -> (MockAuthN, MockRoleStore) {
    let tokens: Vec<(String, String)> = Role::ALL
        .iter()
        .map(|r| (format!("tok-{r}"), format!("user-{r}")))
        .collect();
    let token_refs: Vec<(&str, &str)> = tokens
        .iter()
        .map(|(t, s)| (t.as_str(), s.as_str()))
        .collect();

    let subjects: Vec<(String, Role)> = Role::ALL.iter().map(|r| (format!("user-{r}"), *r)).collect();
    let subject_refs: Vec<(&str, Role)> = subjects.iter().map(|(s, r)| (s.as_str(), *r)).collect();

    (
        MockAuthN::with_tokens(&token_refs),
        MockRoleStore::with_roles(&subject_refs),
    )
}

/// Gate over the stock route table.
#[must_use]
pub fn stock_gate(
    strategy: CallerStrategy,
    authn: Arc<MockAuthN>,
    roles: Arc<MockRoleStore>,
) -> AccessGate {
    let mut cfg = AccessGateConfig::default();
    cfg.identity.strategy = strategy;
    AccessGate::from_config(&cfg, authn, roles).unwrap()
}
