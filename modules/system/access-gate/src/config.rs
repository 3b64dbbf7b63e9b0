//! Configuration for the access gate.
//!
//! Every default mirrors the production route table of the barangay web
//! application, so an empty configuration yields the stock gate.

use std::collections::BTreeMap;

use brgy_security::Role;
use serde::{Deserialize, Serialize};

/// Top-level gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessGateConfig {
    /// Upper bound for identity + role resolution of one request.
    pub resolve_timeout_ms: u64,

    /// How the caller's identity is obtained.
    pub identity: CallerConfig,

    /// Route table.
    pub policy: AccessPolicyConfig,
}

impl Default for AccessGateConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: 5_000,
            identity: CallerConfig::default(),
            policy: AccessPolicyConfig::default(),
        }
    }
}

/// Caller resolution strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerStrategy {
    /// Credentials are validated by the identity provider.
    #[default]
    Provider,
    /// A trusted header may name the caller and role directly. Test and
    /// demonstration deployments only.
    TrustedHeader,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallerConfig {
    pub strategy: CallerStrategy,

    /// Header carrying the `{ "id": .., "role": .. }` override payload.
    /// Only read under [`CallerStrategy::TrustedHeader`].
    pub override_header: String,

    /// Cookie holding the session token when no `Authorization` header is sent.
    pub session_cookie: String,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            strategy: CallerStrategy::Provider,
            override_header: "x-brgy-caller".to_owned(),
            session_cookie: "sb-access-token".to_owned(),
        }
    }
}

/// Route table: public paths, login paths and per-role prefixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessPolicyConfig {
    /// Prefixes reachable without authentication. `/` matches only the root.
    pub public_paths: Vec<String>,

    /// Login-type paths, matched exactly.
    pub login_paths: Vec<String>,

    /// Where unauthenticated callers are sent.
    pub login_redirect: String,

    /// Query parameter carrying the originally requested path.
    pub redirect_param: String,

    /// Role assumed when the role store has no record for an identity.
    pub default_role: Role,

    /// Home dashboard for roles without an entry in `roles`.
    pub fallback_home: String,

    pub roles: BTreeMap<Role, RoleRoutesConfig>,
}

/// Routes of a single role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleRoutesConfig {
    /// Landing page used after login and when access is refused.
    pub home: String,

    /// Path prefixes this role may access.
    pub prefixes: Vec<String>,

    /// Roles whose own prefixes this role may also access (one level).
    pub inherits: Vec<Role>,
}

impl RoleRoutesConfig {
    fn new(home: &str, prefixes: &[&str], inherits: &[Role]) -> Self {
        Self {
            home: home.to_owned(),
            prefixes: prefixes.iter().map(|p| (*p).to_owned()).collect(),
            inherits: inherits.to_vec(),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for AccessPolicyConfig {
    fn default() -> Self {
        let roles = BTreeMap::from([
            (Role::Resident, RoleRoutesConfig::new("/portal", &["/portal"], &[])),
            (
                Role::HealthWorker,
                RoleRoutesConfig::new("/health-portal", &["/health-portal"], &[]),
            ),
            (Role::Tanod, RoleRoutesConfig::new("/net", &["/net", "/tanod"], &[])),
            (
                Role::BarangayOfficial,
                RoleRoutesConfig::new("/Bofficial", &["/Bofficial"], &[]),
            ),
            (Role::Admin, RoleRoutesConfig::new("/admin", &["/admin"], &[])),
            // Resident routes are deliberately not inherited.
            (
                Role::Superadmin,
                RoleRoutesConfig::new(
                    "/heartclif",
                    &["/heartclif", "/ResQNet", "/admin"],
                    &[
                        Role::HealthWorker,
                        Role::Tanod,
                        Role::BarangayOfficial,
                        Role::Admin,
                    ],
                ),
            ),
        ]);

        Self {
            public_paths: owned(&[
                "/",
                "/auth/login",
                "/auth/forgot-password",
                "/register",
                "/register/success",
                "/emergency",
                "/documents",
                "/weather",
                "/enrollment",
            ]),
            login_paths: owned(&["/auth/login", "/login"]),
            login_redirect: "/auth/login".to_owned(),
            redirect_param: "redirectTo".to_owned(),
            default_role: Role::Resident,
            fallback_home: "/portal".to_owned(),
            roles,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_stock_route_table() {
        let cfg: AccessGateConfig = serde_saphyr::from_str("{}").unwrap();

        assert_eq!(cfg.resolve_timeout_ms, 5_000);
        assert_eq!(cfg.identity.strategy, CallerStrategy::Provider);
        assert_eq!(cfg.policy.default_role, Role::Resident);
        assert_eq!(cfg.policy.login_redirect, "/auth/login");
        assert_eq!(cfg.policy.public_paths.len(), 9);
        assert_eq!(cfg.policy.roles.len(), Role::ALL.len());
        assert_eq!(cfg.policy.roles[&Role::Tanod].home, "/net");
        assert!(
            !cfg.policy.roles[&Role::Superadmin]
                .inherits
                .contains(&Role::Resident)
        );
    }

    #[test]
    fn parses_trusted_header_strategy_and_role_keys() {
        let yaml = r#"
resolve_timeout_ms: 250
identity:
  strategy: trusted_header
  override_header: "x-demo-caller"
policy:
  default_role: tanod
  roles:
    admin:
      home: "/admin"
      prefixes: ["/admin", "/reports"]
"#;
        let cfg: AccessGateConfig = serde_saphyr::from_str(yaml).unwrap();

        assert_eq!(cfg.resolve_timeout_ms, 250);
        assert_eq!(cfg.identity.strategy, CallerStrategy::TrustedHeader);
        assert_eq!(cfg.identity.override_header, "x-demo-caller");
        assert_eq!(cfg.identity.session_cookie, "sb-access-token");
        assert_eq!(cfg.policy.default_role, Role::Tanod);
        // A configured role table replaces the stock one.
        assert_eq!(cfg.policy.roles.len(), 1);
        assert_eq!(
            cfg.policy.roles[&Role::Admin].prefixes,
            vec!["/admin".to_owned(), "/reports".to_owned()]
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let parsed: Result<AccessGateConfig, _> =
            serde_saphyr::from_str("policy:\n  public: [\"/\"]\n");
        assert!(parsed.is_err());
    }
}
