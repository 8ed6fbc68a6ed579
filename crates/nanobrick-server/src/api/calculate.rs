//! Bio-brick property calculator endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::api::elapsed_ms;
use crate::dto::{CalculateRequest, CalculateResponse, Composition, Dimensions};
use crate::error::ApiError;
use crate::fallback::{self, FALLBACK_MODEL};
use crate::state::AppState;

/// Density assumed when the advisor omits one.
const DEFAULT_DENSITY: f64 = 1200.0;

/// Predict brick properties for a composition.
///
/// Shares are rescaled to sum to 100 before anything else.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Result<Response, ApiError> {
    let composition = req.normalized().ok_or_else(|| {
        ApiError::BadRequest("composition shares must sum to a positive number".to_string())
    })?;
    let start = Instant::now();

    if let Some(advisor) = &state.advisor {
        match advisor.predict_materials(&composition.rounded(1)).await {
            Ok(data) => {
                let (report, density) = advisor_report(&data);
                return Ok(Json(CalculateResponse {
                    success: true,
                    ai_powered: true,
                    model: advisor.model_label().to_string(),
                    composition: composition.rounded(1),
                    report,
                    dimensions: Dimensions::for_density(density),
                    processing_time_ms: elapsed_ms(start),
                })
                .into_response());
            }
            Err(e) => tracing::warn!(error = %e, "LLM calculate failed, using fallback"),
        }
    }

    Ok(Json(fallback_response(&composition, start)).into_response())
}

fn fallback_response(
    composition: &Composition,
    start: Instant,
) -> CalculateResponse<fallback::MaterialEstimate> {
    let estimate = fallback::estimate_materials(composition, &mut rand::thread_rng());
    let dimensions = Dimensions::for_density(estimate.density_kg_m3);
    CalculateResponse {
        success: true,
        ai_powered: false,
        model: FALLBACK_MODEL.to_string(),
        composition: composition.rounded(1),
        report: estimate,
        dimensions,
        processing_time_ms: elapsed_ms(start),
    }
}

/// The advisor's sections plus the density they imply.
fn advisor_report(data: &Value) -> (Value, f64) {
    let field = |key: &str| data.get(key).cloned().unwrap_or_else(|| json!({}));
    let density = data
        .pointer("/properties/density/value")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_DENSITY);

    let report = json!({
        "properties": field("properties"),
        "sustainability": field("sustainability"),
        "quality": field("quality"),
        "ai_analysis": data.get("ai_analysis").cloned().unwrap_or_else(|| json!("")),
    });
    (report, density)
}
