//! Server configuration.
//!
//! Layers, lowest priority first: built-in defaults, the optional YAML file
//! given with `--config`, then `BRGY__`-prefixed environment variables
//! (`BRGY__SERVER__BIND_ADDR=0.0.0.0:8080`).

use std::path::{Path, PathBuf};

use access_gate::AccessGateConfig;
use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};
use static_authn_plugin::StaticAuthnPluginConfig;
use static_role_plugin::StaticRolePluginConfig;
use supabase_plugin::SupabaseConfig;

pub const ENV_PREFIX: &str = "BRGY__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gate: AccessGateConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Directory with the built web application.
    pub site_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            site_dir: PathBuf::from("site"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Identity provider and role store implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// In-memory tables. Development and demos only.
    Static(StaticBackendConfig),
    Supabase(SupabaseConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Static(StaticBackendConfig::default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticBackendConfig {
    pub authn: StaticAuthnPluginConfig,
    pub roles: StaticRolePluginConfig,
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or any layer does not deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }
}
