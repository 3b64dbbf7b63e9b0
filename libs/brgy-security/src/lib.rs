#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod context;
pub mod role;

pub use context::{Identity, SecurityContext};
pub use role::{Role, UnknownRole};
