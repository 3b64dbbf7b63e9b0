use std::collections::HashMap;

use brgy_security::Role;

use crate::config::StaticRolePluginConfig;

/// In-memory role table built from configuration.
///
/// When a subject is listed more than once the last assignment wins.
pub struct Service {
    roles: HashMap<String, Role>,
}

impl Service {
    #[must_use]
    pub fn from_config(cfg: &StaticRolePluginConfig) -> Self {
        let roles = cfg
            .assignments
            .iter()
            .map(|a| (a.subject_id.clone(), a.role))
            .collect();

        Self { roles }
    }

    #[must_use]
    pub fn role_of(&self, subject_id: &str) -> Option<Role> {
        self.roles.get(subject_id).copied()
    }
}
