//! Client implementation for the static identity provider.

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, AuthenticationResult};

use super::service::Service;

#[async_trait]
impl AuthNResolverClient for Service {
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        self.authenticate(bearer_token).ok_or_else(|| {
            tracing::debug!("static authn rejected token");
            AuthNResolverError::Unauthorized("token not recognized".to_owned())
        })
    }
}
