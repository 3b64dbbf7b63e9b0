use std::sync::Arc;

use axum::response::{IntoResponse, Redirect};

use crate::gate::{AccessGate, Caller, GateDecision};

/// Shared state for [`access_gate_middleware`].
#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<AccessGate>,
}

impl GateState {
    #[must_use]
    pub fn new(gate: Arc<AccessGate>) -> Self {
        Self { gate }
    }
}

/// Access gate middleware.
///
/// For each request:
/// 1. Asks the [`AccessGate`] for a decision on the path and query
/// 2. On pass: inserts the `SecurityContext` of an authenticated caller and runs the handler
/// 3. Otherwise: answers with a temporary redirect, the handler is never reached
pub async fn access_gate_middleware(
    axum::extract::State(state): axum::extract::State<GateState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let decision = state
        .gate
        .decide(req.uri().path(), req.uri().query(), req.headers())
        .await;

    match decision {
        GateDecision::Pass(Caller::Authenticated(ctx)) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        GateDecision::Pass(Caller::Anonymous) => next.run(req).await,
        GateDecision::Login { location } | GateDecision::Redirect { location, .. } => {
            Redirect::temporary(&location).into_response()
        }
    }
}
