//! Waste classification endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use crate::api::elapsed_ms;
use crate::dto::{ClassifyRequest, ClassifyResponse, round_dp};
use crate::fallback::{self, FALLBACK_MODEL};
use crate::state::AppState;

/// Classify a waste sample, preferring the advisor when one is configured.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Response {
    let start = Instant::now();

    if let Some(advisor) = &state.advisor {
        match advisor.classify_waste(&req.waste_type, &req.condition).await {
            Ok(data) => {
                return Json(ClassifyResponse {
                    success: true,
                    ai_powered: true,
                    model: advisor.model_label().to_string(),
                    report: advisor_report(&data, &req),
                    processing_time_ms: elapsed_ms(start),
                })
                .into_response();
            }
            Err(e) => tracing::warn!(error = %e, "LLM classify failed, using fallback"),
        }
    }

    let mut rng = rand::thread_rng();
    let report = fallback::classify_waste(&req.waste_type, &req.condition, &mut rng);
    Json(ClassifyResponse {
        success: true,
        ai_powered: false,
        model: FALLBACK_MODEL.to_string(),
        report,
        processing_time_ms: fallback::classification_time_ms(&mut rng),
    })
    .into_response()
}

/// Numeric properties rounded to 2 dp; nulls dropped.
fn rounded_properties(properties: Option<&Value>) -> Map<String, Value> {
    let Some(map) = properties.and_then(Value::as_object) else {
        return Map::new();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match v.as_f64() {
                Some(x) => json!(round_dp(x, 2)),
                None => v.clone(),
            };
            (k.clone(), v)
        })
        .collect()
}

/// Reshape the advisor's reply into the classification response body.
fn advisor_report(data: &Value, req: &ClassifyRequest) -> Value {
    let or = |key: &str, default: Value| data.get(key).cloned().unwrap_or(default);

    json!({
        "classification": {
            "type": or("type", json!(format!("Agricultural Waste ({})", req.waste_type))),
            "category": or("category", json!("Organic Material")),
            "properties": rounded_properties(data.get("properties")),
        },
        "ripeness": or("ripeness", json!({ "level": req.condition, "usability": 75 })),
        "damage_assessment": or("damage_assessment", json!({
            "level": req.condition,
            "processable": true,
            "recommended_process": "standard",
            "explanation": "",
        })),
        "ai_analysis": or("ai_analysis", json!("")),
        "confidence": or("confidence", json!(90)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ClassifyRequest {
        ClassifyRequest {
            waste_type: "date".into(),
            condition: "fresh".into(),
        }
    }

    #[test]
    fn test_properties_rounded_and_nulls_dropped() {
        let data = json!({
            "properties": {
                "fiber_content": 12.3456,
                "starch_content": null,
                "note": "dry",
            }
        });
        let report = advisor_report(&data, &request());
        let props = &report["classification"]["properties"];
        assert_eq!(props["fiber_content"], json!(12.35));
        assert!(props.get("starch_content").is_none());
        assert_eq!(props["note"], "dry");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let report = advisor_report(&json!({}), &request());
        assert_eq!(report["classification"]["type"], "Agricultural Waste (date)");
        assert_eq!(report["ripeness"]["level"], "fresh");
        assert_eq!(report["confidence"], 90);
    }
}
