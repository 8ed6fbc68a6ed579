//! Nanofiber extraction simulator endpoint.

use axum::Json;
use serde::Serialize;

use crate::dto::ExtractRequest;
use crate::fallback::{self, ExtractionReport};

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: ExtractionReport,
}

pub async fn extract(Json(req): Json<ExtractRequest>) -> Json<ExtractResponse> {
    let report = fallback::extract_nanofiber(&req, &mut rand::thread_rng());
    Json(ExtractResponse {
        success: true,
        report,
    })
}
