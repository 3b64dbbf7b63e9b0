#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Role-based access gate for the barangay web application.
//!
//! Every page request passes through [`AccessGate::decide`]: public pages go
//! straight through, anonymous callers are sent to login, and authenticated
//! callers are confined to the dashboards their role covers. The
//! [`access_gate_middleware`] plugs the gate into an axum router.

pub mod caller;
pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod policy;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use caller::{CallerResolver, ResolvedCaller, build_caller_resolver};
pub use config::{AccessGateConfig, AccessPolicyConfig, CallerConfig, CallerStrategy, RoleRoutesConfig};
pub use error::{GateConfigError, GateError};
pub use gate::{AccessGate, Caller, GateDecision, RedirectReason};
pub use middleware::{GateState, access_gate_middleware};
pub use policy::AccessPolicy;
