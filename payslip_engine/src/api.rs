//! HTTP API for the Payslip Engine.
//!
//! This module exposes the slip and mileage derivations as a small
//! REST API using the [`axum`](https://crates.io/crates/axum)
//! framework.  Clients post a draft and receive the derived totals or
//! the submission payload in JSON.  All handlers share the active
//! [`PayrollPolicy`].

use crate::draft::SalarySlipDraft;
use crate::engine::{compute_totals, preview_batch};
use crate::mileage::MileageClaimDraft;
use crate::policy::PayrollPolicy;
use crate::presets::{selectable_deduction_presets, Preset, ALLOWANCE_PRESETS};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Application state shared across requests.
pub struct AppState {
    pub policy: RwLock<PayrollPolicy>,
}

/// Build the API router around the given policy.  Returns the router
/// and a handle to the state.
pub fn build_router(policy: PayrollPolicy) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        policy: RwLock::new(policy),
    });
    let router = Router::new()
        .route("/api/payroll/preview", post(preview_handler))
        .route("/api/payroll/batch", post(batch_handler))
        .route("/api/payroll/payload", post(payload_handler))
        .route("/api/payroll/presets", get(presets_handler))
        .route("/api/mileage/claim", post(mileage_claim_handler))
        .route("/api/mileage/rates", get(mileage_rates_handler))
        .route("/api/policy", get(policy_handler))
        .with_state(state.clone());
    (router, state)
}

/// Handler for POST /api/payroll/preview
async fn preview_handler(State(app_state): State<Arc<AppState>>, Json(mut draft): Json<SalarySlipDraft>) -> Response {
    draft.sanitize();
    let policy = app_state.policy.read().await;
    Json(compute_totals(&draft, &policy)).into_response()
}

/// Handler for POST /api/payroll/batch
async fn batch_handler(State(app_state): State<Arc<AppState>>, Json(mut drafts): Json<Vec<SalarySlipDraft>>) -> Response {
    drafts.iter_mut().for_each(SalarySlipDraft::sanitize);
    let policy = app_state.policy.read().await.clone();
    debug!(drafts = drafts.len(), "batch preview requested");
    // Parallel work runs off the async executor.
    match tokio::task::spawn_blocking(move || preview_batch(&drafts, &policy)).await {
        Ok(preview) => Json(preview).into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// Handler for POST /api/payroll/payload
async fn payload_handler(State(app_state): State<Arc<AppState>>, Json(mut draft): Json<SalarySlipDraft>) -> Response {
    draft.sanitize();
    let policy = app_state.policy.read().await;
    match draft.to_payload(&policy) {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            debug!(error = %err, "rejected salary slip submission");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
    }
}

/// Handler for GET /api/payroll/presets
async fn presets_handler() -> Response {
    let deductions: Vec<&Preset> = selectable_deduction_presets().collect();
    Json(serde_json::json!({
        "allowances": ALLOWANCE_PRESETS,
        "deductions": deductions,
    }))
    .into_response()
}

/// Handler for POST /api/mileage/claim
async fn mileage_claim_handler(
    State(app_state): State<Arc<AppState>>,
    Json(mut claim): Json<MileageClaimDraft>,
) -> Response {
    claim.sanitize();
    let policy = app_state.policy.read().await;
    Json(claim.to_claim(&policy.mileage)).into_response()
}

/// Handler for GET /api/mileage/rates
async fn mileage_rates_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let policy = app_state.policy.read().await;
    Json(policy.mileage.clone()).into_response()
}

/// Handler for GET /api/policy
async fn policy_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let policy = app_state.policy.read().await;
    Json(policy.clone()).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Launch the API server.  Binds to `addr` and blocks until the server
/// terminates (e.g. when interrupted).
pub async fn serve(addr: SocketAddr, policy: PayrollPolicy) -> Result<()> {
    let (router, _state) = build_router(policy);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
