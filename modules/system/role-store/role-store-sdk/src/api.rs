//! Public API trait for the role store.

use async_trait::async_trait;
use brgy_security::{Identity, Role};

use crate::error::RoleStoreError;

/// Source of the single role associated with an identity.
#[async_trait]
pub trait RoleStoreClient: Send + Sync {
    /// Look up the role held by `identity`.
    ///
    /// Returns `Ok(None)` when the store has no record for the identity.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the backing store cannot be reached
    /// - `Internal` for unexpected errors (e.g. an undecodable answer)
    async fn get_role(&self, identity: &Identity) -> Result<Option<Role>, RoleStoreError>;
}
