//! Configuration for the static identity provider.

use serde::{Deserialize, Serialize};

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthnPluginConfig {
    /// Authentication mode.
    pub mode: AuthnMode,

    /// Identity returned for every non-empty token in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Token-to-identity table used in `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

/// Authentication mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthnMode {
    /// Any non-empty token maps to `default_identity`.
    #[default]
    AcceptAll,
    /// Only tokens listed in `tokens` are accepted.
    StaticTokens,
}

/// Identity handed out for a token.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub subject_id: String,
    pub email: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject_id: "00000000-0000-0000-0000-000000000001".to_owned(),
            email: None,
        }
    }
}

/// A single token entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    pub token: String,
    pub identity: IdentityConfig,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_config_defaults_to_accept_all() {
        let cfg: StaticAuthnPluginConfig = serde_saphyr::from_str("{}").unwrap();

        assert_eq!(cfg.mode, AuthnMode::AcceptAll);
        assert!(cfg.tokens.is_empty());
        assert_eq!(
            cfg.default_identity.subject_id,
            "00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn parses_static_tokens() {
        let yaml = r#"
mode: static_tokens
tokens:
  - token: "tok-tanod"
    identity:
      subject_id: "tanod-7"
      email: "tanod7@brgy.example"
"#;
        let cfg: StaticAuthnPluginConfig = serde_saphyr::from_str(yaml).unwrap();

        assert_eq!(cfg.mode, AuthnMode::StaticTokens);
        assert_eq!(cfg.tokens.len(), 1);
        assert_eq!(cfg.tokens[0].identity.subject_id, "tanod-7");
        assert_eq!(
            cfg.tokens[0].identity.email.as_deref(),
            Some("tanod7@brgy.example")
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let parsed: Result<StaticAuthnPluginConfig, _> =
            serde_saphyr::from_str("mode: accept_all\nvendor: \"x\"\n");
        assert!(parsed.is_err());
    }
}
