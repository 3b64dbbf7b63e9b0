//! Role store backed by the Supabase `profiles` table (PostgREST).

use std::sync::Arc;

use async_trait::async_trait;
use brgy_security::{Identity, Role};
use role_store_sdk::{RoleStoreClient, RoleStoreError};
use serde_json::{Map, Value};

use crate::client::SupabaseClient;

/// Reads `<role_column>` from `<profiles_table>` where `id` equals the
/// caller's subject id.
///
/// The request carries the caller's own access token when the identity has
/// one, so row-level security on the table applies; otherwise the anon key.
pub struct SupabaseRoleStore {
    client: Arc<SupabaseClient>,
}

impl SupabaseRoleStore {
    #[must_use]
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    fn role_from_rows(&self, subject: &str, rows: &[Map<String, Value>]) -> Result<Option<Role>, RoleStoreError> {
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        match row.get(self.client.role_column()) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => match raw.parse::<Role>() {
                Ok(role) => Ok(Some(role)),
                Err(err) => {
                    tracing::warn!(%subject, error = %err, "profile carries an unknown role, ignoring it");
                    Ok(None)
                }
            },
            Some(other) => Err(RoleStoreError::Internal(format!(
                "role column holds a non-string value: {other}"
            ))),
        }
    }
}

#[async_trait]
impl RoleStoreClient for SupabaseRoleStore {
    async fn get_role(&self, identity: &Identity) -> Result<Option<Role>, RoleStoreError> {
        let subject = identity.subject_id();
        let url = self
            .client
            .profile_role_url(subject)
            .map_err(|e| RoleStoreError::Internal(e.to_string()))?;
        let bearer = identity.access_token().unwrap_or(self.client.anon_key());

        let resp = self
            .client
            .get(url, bearer)
            .await
            .map_err(|e| RoleStoreError::Unavailable(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RoleStoreError::Unavailable(format!(
                "profiles lookup answered {status}"
            )));
        }

        let rows: Vec<Map<String, Value>> = resp
            .json()
            .await
            .map_err(|e| RoleStoreError::Internal(format!("undecodable profile rows: {e}")))?;

        let role = self.role_from_rows(subject, &rows)?;
        tracing::debug!(%subject, role = ?role, "profile role looked up");
        Ok(role)
    }
}
