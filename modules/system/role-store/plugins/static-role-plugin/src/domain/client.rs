use async_trait::async_trait;
use brgy_security::{Identity, Role};
use role_store_sdk::{RoleStoreClient, RoleStoreError};

use super::service::Service;

#[async_trait]
impl RoleStoreClient for Service {
    async fn get_role(&self, identity: &Identity) -> Result<Option<Role>, RoleStoreError> {
        Ok(self.role_of(identity.subject_id()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{RoleAssignment, StaticRolePluginConfig};

    fn service() -> Service {
        Service::from_config(&StaticRolePluginConfig {
            assignments: vec![
                RoleAssignment {
                    subject_id: "tanod-1".to_owned(),
                    role: Role::Tanod,
                },
                RoleAssignment {
                    subject_id: "promoted".to_owned(),
                    role: Role::Resident,
                },
                RoleAssignment {
                    subject_id: "promoted".to_owned(),
                    role: Role::Admin,
                },
            ],
        })
    }

    #[tokio::test]
    async fn returns_assigned_role() {
        let svc = service();
        let store: &dyn RoleStoreClient = &svc;

        let role = store.get_role(&Identity::new("tanod-1")).await.unwrap();
        assert_eq!(role, Some(Role::Tanod));
    }

    #[tokio::test]
    async fn unknown_subject_has_no_record() {
        let svc = service();
        let store: &dyn RoleStoreClient = &svc;

        let role = store.get_role(&Identity::new("stranger")).await.unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn last_assignment_wins() {
        let svc = service();
        let store: &dyn RoleStoreClient = &svc;

        let role = store.get_role(&Identity::new("promoted")).await.unwrap();
        assert_eq!(role, Some(Role::Admin));
    }
}
