//! Backend wiring, router and serve loop.

use std::sync::Arc;

use access_gate::{AccessGate, GateState, access_gate_middleware};
use anyhow::Context;
use authn_resolver_sdk::AuthNResolverClient;
use axum::Router;
use axum::routing::get;
use role_store_sdk::RoleStoreClient;
use supabase_plugin::{SupabaseAuthN, SupabaseClient, SupabaseRoleStore};
use tower::Layer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, BackendConfig, ServerConfig};

/// Identity provider and role store selected by configuration.
pub struct Backend {
    pub authn: Arc<dyn AuthNResolverClient>,
    pub roles: Arc<dyn RoleStoreClient>,
}

impl Backend {
    /// # Errors
    ///
    /// Fails if the Supabase settings are invalid.
    pub fn from_config(cfg: &BackendConfig) -> anyhow::Result<Self> {
        match cfg {
            BackendConfig::Static(cfg) => {
                tracing::warn!("static identity backend in use; do not run this in production");
                Ok(Self {
                    authn: Arc::new(static_authn_plugin::Service::from_config(&cfg.authn)),
                    roles: Arc::new(static_role_plugin::Service::from_config(&cfg.roles)),
                })
            }
            BackendConfig::Supabase(cfg) => {
                let client = Arc::new(
                    SupabaseClient::from_config(cfg).context("invalid supabase configuration")?,
                );
                tracing::info!(url = %cfg.url, table = %cfg.profiles_table, "supabase backend configured");
                Ok(Self {
                    authn: Arc::new(SupabaseAuthN::new(client.clone())),
                    roles: Arc::new(SupabaseRoleStore::new(client)),
                })
            }
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// `GET /healthz` answers directly; every other request goes through the
/// gate and is then served from the site directory.
#[must_use]
pub fn router(cfg: &ServerConfig, gate: Arc<AccessGate>) -> Router {
    let gate_layer =
        axum::middleware::from_fn_with_state(GateState::new(gate), access_gate_middleware);
    let site = gate_layer.layer(ServeDir::new(&cfg.site_dir));

    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(site)
        .layer(TraceLayer::new_for_http())
}

/// Build the gate and serve until Ctrl-C.
///
/// # Errors
///
/// Fails on invalid configuration or if the listener cannot be bound.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let backend = Backend::from_config(&cfg.backend)?;
    let gate = AccessGate::from_config(&cfg.gate, backend.authn, backend.roles)
        .context("invalid access gate configuration")?;
    let app = router(&cfg.server, Arc::new(gate));

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        site_dir = %cfg.server.site_dir.display(),
        "brgy-server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::StaticBackendConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use brgy_security::Role;
    use http_body_util::BodyExt;
    use static_authn_plugin::{AuthnMode, IdentityConfig, StaticAuthnPluginConfig, TokenMapping};
    use static_role_plugin::{RoleAssignment, StaticRolePluginConfig};
    use tower::ServiceExt;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "landing").unwrap();
        std::fs::create_dir(dir.path().join("portal")).unwrap();
        std::fs::write(dir.path().join("portal/index.html"), "resident portal").unwrap();
        dir
    }

    fn backend_cfg() -> BackendConfig {
        BackendConfig::Static(StaticBackendConfig {
            authn: StaticAuthnPluginConfig {
                mode: AuthnMode::StaticTokens,
                tokens: vec![TokenMapping {
                    token: "juan-session".to_owned(),
                    identity: IdentityConfig {
                        subject_id: "juan".to_owned(),
                        email: None,
                    },
                }],
                ..StaticAuthnPluginConfig::default()
            },
            roles: StaticRolePluginConfig {
                assignments: vec![RoleAssignment {
                    subject_id: "juan".to_owned(),
                    role: Role::Resident,
                }],
            },
        })
    }

    fn app(dir: &tempfile::TempDir) -> Router {
        let cfg = AppConfig {
            server: ServerConfig {
                site_dir: dir.path().to_path_buf(),
                ..ServerConfig::default()
            },
            backend: backend_cfg(),
            ..AppConfig::default()
        };
        let backend = Backend::from_config(&cfg.backend).unwrap();
        let gate = AccessGate::from_config(&cfg.gate, backend.authn, backend.roles).unwrap();
        router(&cfg.server, Arc::new(gate))
    }

    async fn text(resp: axum::response::Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn healthz_bypasses_gate() {
        let dir = site();
        let resp = app(&dir)
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "ok");
    }

    #[tokio::test]
    async fn landing_page_is_public() {
        let dir = site();
        let resp = app(&dir)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "landing");
    }

    #[tokio::test]
    async fn portal_requires_session_then_serves_files() {
        let dir = site();

        let resp = app(&dir)
            .oneshot(Request::get("/portal/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers()[header::LOCATION],
            "/auth/login?redirectTo=%2Fportal%2F"
        );

        let resp = app(&dir)
            .oneshot(
                Request::get("/portal/")
                    .header(header::AUTHORIZATION, "Bearer juan-session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "resident portal");
    }

    #[tokio::test]
    async fn resident_is_kept_out_of_admin() {
        let dir = site();
        let resp = app(&dir)
            .oneshot(
                Request::get("/admin/system")
                    .header(header::COOKIE, "sb-access-token=juan-session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers()[header::LOCATION], "/portal");
    }

    #[test]
    fn invalid_supabase_backend_is_rejected() {
        let cfg = BackendConfig::Supabase(supabase_plugin::SupabaseConfig::default());
        assert!(Backend::from_config(&cfg).is_err());
    }
}
