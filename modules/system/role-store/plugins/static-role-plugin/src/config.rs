use brgy_security::Role;
use serde::{Deserialize, Serialize};

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRolePluginConfig {
    /// Subject-to-role assignments. Subjects not listed have no record.
    pub assignments: Vec<RoleAssignment>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoleAssignment {
    pub subject_id: String,
    pub role: Role,
}
