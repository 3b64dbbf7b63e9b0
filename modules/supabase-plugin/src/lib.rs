#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Supabase backend for the access gate.
//!
//! - [`SupabaseAuthN`] validates session tokens against Supabase Auth
//! - [`SupabaseRoleStore`] reads the caller's role from the profiles table
//!
//! Both share one [`SupabaseClient`] and therefore one connection pool.

pub mod authn;
pub mod client;
pub mod config;
pub mod error;
pub mod role_store;

pub use authn::SupabaseAuthN;
pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use error::SupabaseConfigError;
pub use role_store::SupabaseRoleStore;
