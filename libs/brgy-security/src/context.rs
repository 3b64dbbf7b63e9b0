use secrecy::{ExposeSecret, SecretString};

use crate::role::Role;

/// A verified caller identity as reported by the Identity Provider.
///
/// The access token, when present, is the credential the identity was
/// resolved from. It is kept secret so it never ends up in logs, and is
/// forwarded to the Role Store so row-level security applies to the lookup.
#[derive(Debug, Clone)]
pub struct Identity {
    subject_id: String,
    email: Option<String>,
    access_token: Option<SecretString>,
}

impl Identity {
    #[must_use]
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: None,
            access_token: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    #[inline]
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Raw access token. Callers must not log the returned value.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(ExposeSecret::expose_secret)
    }
}

/// Identity plus resolved role for the duration of one request.
///
/// Inserted into the request extensions when the access gate lets an
/// authenticated request through.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    identity: Identity,
    role: Role,
}

impl SecurityContext {
    #[must_use]
    pub fn new(identity: Identity, role: Role) -> Self {
        Self { identity, role }
    }

    #[inline]
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[inline]
    #[must_use]
    pub fn subject_id(&self) -> &str {
        self.identity.subject_id()
    }

    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn access_token_is_redacted_in_debug_output() {
        let identity = Identity::new("user-1").with_access_token("super-secret-jwt");
        let rendered = format!("{identity:?}");

        assert!(!rendered.contains("super-secret-jwt"));
        assert_eq!(identity.access_token(), Some("super-secret-jwt"));
    }

    #[test]
    fn context_exposes_identity_and_role() {
        let identity = Identity::new("user-2").with_email("kap@example.ph");
        let ctx = SecurityContext::new(identity, Role::BarangayOfficial);

        assert_eq!(ctx.subject_id(), "user-2");
        assert_eq!(ctx.identity().email(), Some("kap@example.ph"));
        assert_eq!(ctx.role(), Role::BarangayOfficial);
        assert!(ctx.identity().access_token().is_none());
    }
}
