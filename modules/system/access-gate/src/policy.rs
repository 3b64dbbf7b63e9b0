//! Compiled, immutable route policy.

use std::collections::HashMap;

use brgy_security::Role;
use url::form_urlencoded;

use crate::config::AccessPolicyConfig;
use crate::error::GateConfigError;

/// A validated path prefix.
///
/// The root prefix `/` only matches the root path itself; any other prefix
/// matches every path that starts with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix(String);

impl PathPrefix {
    fn parse(what: &'static str, raw: &str) -> Result<Self, GateConfigError> {
        ensure_absolute(what, raw)?;
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.0 == "/" {
            path == "/"
        } else {
            path.starts_with(self.0.as_str())
        }
    }
}

fn ensure_absolute(what: &'static str, value: &str) -> Result<(), GateConfigError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(GateConfigError::NotAbsolute {
            what,
            value: value.to_owned(),
        })
    }
}

fn parse_prefixes(what: &'static str, raw: &[String]) -> Result<Vec<PathPrefix>, GateConfigError> {
    raw.iter().map(|p| PathPrefix::parse(what, p)).collect()
}

fn any_match(prefixes: &[PathPrefix], path: &str) -> bool {
    prefixes.iter().any(|p| p.matches(path))
}

/// Strips one trailing slash, except from the root path.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug, Clone)]
struct RoleRoutes {
    home: String,
    allowed: Vec<PathPrefix>,
}

/// Route policy built once at start-up and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public: Vec<PathPrefix>,
    login_paths: Vec<String>,
    login_redirect: String,
    redirect_param: String,
    default_role: Role,
    fallback_home: String,
    routes: HashMap<Role, RoleRoutes>,
}

impl AccessPolicy {
    /// Validate `cfg` and flatten role inheritance.
    ///
    /// # Errors
    ///
    /// Returns [`GateConfigError`] when a path is not absolute, the redirect
    /// parameter is empty, or a role inherits itself.
    pub fn from_config(cfg: &AccessPolicyConfig) -> Result<Self, GateConfigError> {
        let public = parse_prefixes("public path", &cfg.public_paths)?;

        for login in &cfg.login_paths {
            ensure_absolute("login path", login)?;
        }
        ensure_absolute("login redirect", &cfg.login_redirect)?;
        ensure_absolute("fallback home", &cfg.fallback_home)?;
        if cfg.redirect_param.is_empty() {
            return Err(GateConfigError::EmptyRedirectParam);
        }

        let mut own: HashMap<Role, Vec<PathPrefix>> = HashMap::new();
        for (role, routes) in &cfg.roles {
            ensure_absolute("home dashboard", &routes.home)?;
            own.insert(*role, parse_prefixes("role prefix", &routes.prefixes)?);
        }

        let mut flattened = HashMap::new();
        for (role, routes) in &cfg.roles {
            let mut allowed = own.get(role).cloned().unwrap_or_default();
            for parent in &routes.inherits {
                if parent == role {
                    return Err(GateConfigError::SelfInheritance(*role));
                }
                if let Some(inherited) = own.get(parent) {
                    allowed.extend(inherited.iter().cloned());
                }
            }
            flattened.insert(
                *role,
                RoleRoutes {
                    home: routes.home.clone(),
                    allowed,
                },
            );
        }

        Ok(Self {
            public,
            login_paths: cfg
                .login_paths
                .iter()
                .map(|p| normalize(p).to_owned())
                .collect(),
            login_redirect: cfg.login_redirect.clone(),
            redirect_param: cfg.redirect_param.clone(),
            default_role: cfg.default_role,
            fallback_home: cfg.fallback_home.clone(),
            routes: flattened,
        })
    }

    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        any_match(&self.public, path)
    }

    #[must_use]
    pub fn is_login_path(&self, path: &str) -> bool {
        let path = normalize(path);
        self.login_paths.iter().any(|p| p == path)
    }

    /// Whether `role` may access `path`, counting inherited prefixes.
    #[must_use]
    pub fn is_allowed(&self, role: Role, path: &str) -> bool {
        self.routes
            .get(&role)
            .is_some_and(|routes| any_match(&routes.allowed, path))
    }

    #[must_use]
    pub fn home_for(&self, role: Role) -> &str {
        self.routes
            .get(&role)
            .map_or(self.fallback_home.as_str(), |routes| routes.home.as_str())
    }

    #[must_use]
    pub fn default_role(&self) -> Role {
        self.default_role
    }

    /// Login URL that brings the caller back to `original_path` afterwards.
    #[must_use]
    pub fn login_location(&self, original_path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.redirect_param, original_path)
            .finish();
        format!("{}?{query}", self.login_redirect)
    }

    /// Where an already authenticated caller who opened a login page goes:
    /// the requested `redirectTo` target if it is a usable local path,
    /// otherwise the role's home dashboard.
    #[must_use]
    pub fn post_login_location(&self, role: Role, query: Option<&str>) -> String {
        query
            .and_then(|q| self.redirect_target(q))
            .unwrap_or_else(|| self.home_for(role).to_owned())
    }

    fn redirect_target(&self, query: &str) -> Option<String> {
        let (_, target) = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| *key == self.redirect_param.as_str())?;
        is_local_redirect(&target).then(|| target.into_owned())
    }
}

/// Accepts site-local paths only. The root counts as "no target".
///
/// The target ends up verbatim in a `Location` header, so anything outside
/// printable ASCII (controls, whitespace, raw UTF-8) is refused.
fn is_local_redirect(target: &str) -> bool {
    target.starts_with('/')
        && target != "/"
        && !target.starts_with("//")
        && !target.contains('\\')
        && target.bytes().all(|b| b.is_ascii_graphic())
}
