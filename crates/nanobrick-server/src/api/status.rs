//! Service status endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::{ServiceStatus, StatusResponse};
use crate::state::AppState;

/// Service version reported by `/api/status`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Readiness of each service and whether the advisor is configured.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let llm_ready = state.llm_available();
    let assisted = if llm_ready {
        "active (LLM)"
    } else {
        "active (fallback)"
    };
    let backend = match &state.advisor {
        Some(advisor) => advisor.model_label().to_string(),
        None => "not configured".to_string(),
    };

    Json(StatusResponse {
        status: "online".to_string(),
        version: VERSION.to_string(),
        services: ServiceStatus {
            ai_classifier: assisted.to_string(),
            quantum_optimizer: "active".to_string(),
            material_calculator: assisted.to_string(),
            llm_backend: backend,
        },
        llm_available: llm_ready,
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}
