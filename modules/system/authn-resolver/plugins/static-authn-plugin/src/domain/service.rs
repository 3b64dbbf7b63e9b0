//! Token lookup for the static identity provider.

use std::collections::HashMap;

use authn_resolver_sdk::AuthenticationResult;
use brgy_security::Identity;

use crate::config::{AuthnMode, IdentityConfig, StaticAuthnPluginConfig};

/// Identities known to the provider, compiled from configuration.
enum Directory {
    /// Every non-empty token is the same person.
    Anyone(Identity),
    /// Only listed tokens are accepted. A repeated token keeps its last entry.
    Listed(HashMap<String, Identity>),
}

/// Development identity provider backed by configuration instead of a
/// real auth service.
pub struct Service {
    directory: Directory,
}

impl Service {
    #[must_use]
    pub fn from_config(cfg: &StaticAuthnPluginConfig) -> Self {
        let directory = match cfg.mode {
            AuthnMode::AcceptAll => Directory::Anyone(template(&cfg.default_identity)),
            AuthnMode::StaticTokens => Directory::Listed(
                cfg.tokens
                    .iter()
                    .map(|entry| (entry.token.clone(), template(&entry.identity)))
                    .collect(),
            ),
        };
        Self { directory }
    }

    /// The identity behind `bearer_token`, carrying the token itself.
    ///
    /// `None` for an empty token or one the directory does not list.
    #[must_use]
    pub fn authenticate(&self, bearer_token: &str) -> Option<AuthenticationResult> {
        let known = match (&self.directory, bearer_token) {
            (_, "") => return None,
            (Directory::Anyone(identity), _) => identity,
            (Directory::Listed(by_token), token) => by_token.get(token)?,
        };
        Some(known.clone().with_access_token(bearer_token).into())
    }
}

fn template(cfg: &IdentityConfig) -> Identity {
    let identity = Identity::new(cfg.subject_id.as_str());
    match &cfg.email {
        Some(email) => identity.with_email(email.as_str()),
        None => identity,
    }
}
