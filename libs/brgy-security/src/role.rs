use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Permission class assigned to an authenticated identity.
///
/// The set is closed: the Role Store can only hand out one of these values,
/// and the access policy is keyed by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    HealthWorker,
    Tanod,
    BarangayOfficial,
    Admin,
    Superadmin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Resident,
        Role::HealthWorker,
        Role::Tanod,
        Role::BarangayOfficial,
        Role::Admin,
        Role::Superadmin,
    ];

    /// Wire name of the role, as stored in the profiles table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::HealthWorker => "health_worker",
            Role::Tanod => "tanod",
            Role::BarangayOfficial => "barangay_official",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}
