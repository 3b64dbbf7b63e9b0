//! Role Store SDK
//!
//! - [`RoleStoreClient`] - API trait implemented by role backends
//! - [`RoleStoreError`] - Error types
//!
//! A role store answers one question: which [`Role`](brgy_security::Role)
//! does an authenticated identity hold. "No record" is a normal answer
//! (`Ok(None)`); the access gate applies its default-role policy to it.

pub mod api;
pub mod error;

pub use api::RoleStoreClient;
pub use error::RoleStoreError;
