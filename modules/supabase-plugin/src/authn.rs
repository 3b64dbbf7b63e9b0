//! Identity provider backed by Supabase Auth.

use std::sync::Arc;

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, AuthenticationResult};
use brgy_security::Identity;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::SupabaseClient;

/// Subset of the `GET /auth/v1/user` answer the gate needs.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Validates session tokens against `GET {url}/auth/v1/user`.
pub struct SupabaseAuthN {
    client: Arc<SupabaseClient>,
}

impl SupabaseAuthN {
    #[must_use]
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthNResolverClient for SupabaseAuthN {
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        let url = self
            .client
            .user_url()
            .map_err(|e| AuthNResolverError::Internal(e.to_string()))?;

        let resp = self
            .client
            .get(url, bearer_token)
            .await
            .map_err(|e| AuthNResolverError::ServiceUnavailable(e.without_url().to_string()))?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AuthNResolverError::Unauthorized(format!(
                    "supabase rejected session ({})",
                    resp.status()
                )));
            }
            status if !status.is_success() => {
                return Err(AuthNResolverError::ServiceUnavailable(format!(
                    "supabase auth answered {status}"
                )));
            }
            _ => {}
        }

        let user: SupabaseUser = resp
            .json()
            .await
            .map_err(|e| AuthNResolverError::Internal(format!("undecodable user: {e}")))?;
        if user.id.trim().is_empty() {
            return Err(AuthNResolverError::Internal("user without id".to_owned()));
        }

        tracing::debug!(subject = %user.id, "supabase session validated");

        let mut identity = Identity::new(user.id).with_access_token(bearer_token);
        if let Some(email) = user.email {
            identity = identity.with_email(email);
        }
        Ok(AuthenticationResult::from(identity))
    }
}
