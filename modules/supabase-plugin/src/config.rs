use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

/// Connection settings for the Supabase project backing authentication
/// and the profile table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,

    /// Public anon key, sent as `apikey` on every request.
    #[serde(serialize_with = "redacted")]
    pub anon_key: SecretString,

    /// Table holding one row per user, keyed by `id`.
    pub profiles_table: String,

    /// Column of `profiles_table` holding the role name.
    pub role_column: String,

    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: SecretString::from(String::new()),
            profiles_table: "profiles".to_owned(),
            role_column: "role".to_owned(),
            timeout_ms: 3_000,
        }
    }
}

impl SupabaseConfig {
    pub(crate) fn has_anon_key(&self) -> bool {
        !self.anon_key.expose_secret().trim().is_empty()
    }
}

fn redacted<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    if secret.expose_secret().is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str("[REDACTED]")
    }
}
