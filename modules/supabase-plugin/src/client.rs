//! Shared HTTP plumbing for the Supabase REST endpoints.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::SupabaseConfig;
use crate::error::SupabaseConfigError;

/// One connection pool and the project coordinates, shared by the identity
/// provider and the role store.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base: Url,
    anon_key: SecretString,
    profiles_table: String,
    role_column: String,
}

impl SupabaseClient {
    /// Validate `cfg` and build the client.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseConfigError`] if the URL is not an http(s) URL, the
    /// anon key or a table/column name is empty, the timeout is zero, or the
    /// HTTP client cannot be built.
    pub fn from_config(cfg: &SupabaseConfig) -> Result<Self, SupabaseConfigError> {
        let mut base = Url::parse(&cfg.url).map_err(|e| SupabaseConfigError::InvalidUrl {
            url: cfg.url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SupabaseConfigError::InvalidUrl {
                url: cfg.url.clone(),
                reason: "scheme must be http or https".to_owned(),
            });
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        if !cfg.has_anon_key() {
            return Err(SupabaseConfigError::MissingAnonKey);
        }
        if cfg.profiles_table.trim().is_empty() {
            return Err(SupabaseConfigError::EmptyName("profiles_table"));
        }
        if cfg.role_column.trim().is_empty() {
            return Err(SupabaseConfigError::EmptyName("role_column"));
        }
        if cfg.timeout_ms == 0 {
            return Err(SupabaseConfigError::ZeroTimeout);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base,
            anon_key: cfg.anon_key.clone(),
            profiles_table: cfg.profiles_table.clone(),
            role_column: cfg.role_column.clone(),
        })
    }

    pub(crate) fn user_url(&self) -> Result<Url, url::ParseError> {
        self.base.join("auth/v1/user")
    }

    pub(crate) fn profile_role_url(&self, subject_id: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base.join(&format!("rest/v1/{}", self.profiles_table))?;
        url.query_pairs_mut()
            .append_pair("select", &self.role_column)
            .append_pair("id", &format!("eq.{subject_id}"));
        Ok(url)
    }

    pub(crate) fn role_column(&self) -> &str {
        &self.role_column
    }

    /// GET `url` with the anon key and `bearer` as the `Authorization` token.
    pub(crate) async fn get(&self, url: Url, bearer: &str) -> reqwest::Result<reqwest::Response> {
        self.http
            .get(url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer)
            .send()
            .await
    }

    pub(crate) fn anon_key(&self) -> &str {
        self.anon_key.expose_secret()
    }
}
