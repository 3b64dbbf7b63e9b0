//! AuthN Resolver SDK
//!
//! This crate provides the public API of the identity provider the access
//! gate consults:
//!
//! - [`AuthNResolverClient`] - API trait implemented by identity backends
//! - [`AuthenticationResult`] - Authentication result model
//! - [`AuthNResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::AuthNResolverClient;
//!
//! let authn: Arc<dyn AuthNResolverClient> = Arc::new(backend);
//!
//! // Authenticate a bearer token
//! let result = authn.authenticate("eyJhbGciOi...").await?;
//! let identity = result.identity;
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::AuthNResolverClient;
pub use error::AuthNResolverError;
pub use models::AuthenticationResult;
