//! Data transfer objects for the HTTP API.
//!
//! Request bodies use the front-end's camelCase field names and fill every
//! missing field with a default, so `{}` is a valid body for each endpoint.

use serde::{Deserialize, Serialize};

/// Round to `dp` decimal places.
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (value * scale).round() / scale
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    #[serde(default = "default_waste_type")]
    pub waste_type: String,
    #[serde(default = "default_condition")]
    pub condition: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default = "default_fiber_ratio")]
    pub fiber_ratio: f64,
    #[serde(default = "default_binding_energy")]
    pub binding_energy: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

/// Raw composition shares; need not sum to 100.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    #[serde(default = "default_banana")]
    pub banana: f64,
    #[serde(default = "default_date")]
    pub date: f64,
    #[serde(default = "default_starch")]
    pub starch: f64,
    #[serde(default = "default_ash")]
    pub ash: f64,
    #[serde(default = "default_nano")]
    pub nano: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_treatment")]
    pub treatment: String,
    /// Treatment duration in minutes, kept as sent so it echoes unchanged.
    #[serde(default = "default_duration")]
    pub duration: serde_json::Number,
}

impl ExtractRequest {
    /// Duration in minutes as a float.
    pub fn duration_minutes(&self) -> f64 {
        self.duration.as_f64().unwrap_or(DEFAULT_DURATION_MIN as f64)
    }
}

fn default_waste_type() -> String {
    "banana".into()
}
fn default_condition() -> String {
    "moderate".into()
}
fn default_fiber_ratio() -> f64 {
    40.0
}
fn default_binding_energy() -> f64 {
    50.0
}
fn default_iterations() -> usize {
    50
}
fn default_banana() -> f64 {
    40.0
}
fn default_date() -> f64 {
    25.0
}
fn default_starch() -> f64 {
    20.0
}
fn default_ash() -> f64 {
    10.0
}
fn default_nano() -> f64 {
    5.0
}
fn default_source() -> String {
    "banana".into()
}
fn default_treatment() -> String {
    "enzymatic".into()
}
const DEFAULT_DURATION_MIN: u64 = 60;

fn default_duration() -> serde_json::Number {
    DEFAULT_DURATION_MIN.into()
}

// ============================================================================
// Composition
// ============================================================================

/// Brick composition in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub banana_fiber: f64,
    pub date_paste: f64,
    pub banana_starch: f64,
    pub agricultural_ash: f64,
    pub nanocellulose: f64,
}

impl Composition {
    pub fn total(&self) -> f64 {
        self.banana_fiber
            + self.date_paste
            + self.banana_starch
            + self.agricultural_ash
            + self.nanocellulose
    }

    /// Each share rounded to `dp` decimal places.
    #[must_use]
    pub fn rounded(&self, dp: i32) -> Self {
        Self {
            banana_fiber: round_dp(self.banana_fiber, dp),
            date_paste: round_dp(self.date_paste, dp),
            banana_starch: round_dp(self.banana_starch, dp),
            agricultural_ash: round_dp(self.agricultural_ash, dp),
            nanocellulose: round_dp(self.nanocellulose, dp),
        }
    }
}

impl CalculateRequest {
    /// Composition rescaled to sum to 100.
    ///
    /// Returns `None` when the total is zero, negative, or not finite.
    pub fn normalized(&self) -> Option<Composition> {
        let raw = Composition {
            banana_fiber: self.banana,
            date_paste: self.date,
            banana_starch: self.starch,
            agricultural_ash: self.ash,
            nanocellulose: self.nano,
        };
        let total = raw.total();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        if total == 100.0 {
            return Some(raw);
        }
        let factor = 100.0 / total;
        Some(Composition {
            banana_fiber: raw.banana_fiber * factor,
            date_paste: raw.date_paste * factor,
            banana_starch: raw.banana_starch * factor,
            agricultural_ash: raw.agricultural_ash * factor,
            nanocellulose: raw.nanocellulose * factor,
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response for `GET /api/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceStatus,
    pub llm_available: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub ai_classifier: String,
    pub quantum_optimizer: String,
    pub material_calculator: String,
    pub llm_backend: String,
}

/// Response for `POST /api/classify`.
///
/// `report` is either the rule-based assessment or the advisor's JSON.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse<R> {
    pub success: bool,
    pub ai_powered: bool,
    pub model: String,
    #[serde(flatten)]
    pub report: R,
    pub processing_time_ms: u64,
}

/// Response for `POST /api/calculate`.
#[derive(Debug, Serialize)]
pub struct CalculateResponse<R> {
    pub success: bool,
    pub ai_powered: bool,
    pub model: String,
    pub composition: Composition,
    #[serde(flatten)]
    pub report: R,
    pub dimensions: Dimensions,
    pub processing_time_ms: u64,
}

/// Standard brick format and its mass at a given density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    pub standard: String,
    /// Kilograms per brick.
    pub weight_per_unit: f64,
}

/// Brick volume in m³ (240 × 115 × 75 mm).
const BRICK_VOLUME_M3: f64 = 0.00207;

impl Dimensions {
    pub fn for_density(density_kg_m3: f64) -> Self {
        Self {
            standard: "240 × 115 × 75 mm".to_string(),
            weight_per_unit: round_dp(density_kg_m3 * BRICK_VOLUME_M3, 2),
        }
    }
}

/// Response for `POST /api/optimize`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub success: bool,
    pub real_quantum: bool,
    pub optimization: OptimizationSummary,
    pub quantum_metrics: QuantumMetrics,
    pub optimal_configuration: OptimalConfiguration,
    pub energy_history: Vec<EnergySample>,
    pub algorithm: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub initial_energy: f64,
    pub optimal_energy: f64,
    /// Percent decrease relative to `|initial_energy|`.
    pub energy_reduction: f64,
    pub iterations_completed: usize,
    pub convergence_achieved: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuantumMetrics {
    pub qubits_used: usize,
    pub circuit_depth: usize,
    pub gate_count: usize,
    pub backend: String,
    pub ansatz: String,
}

/// Material configuration scores derived from the ground-state energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalConfiguration {
    pub cellulose_alignment: f64,
    pub polymer_binding: f64,
    pub nanofiber_distribution: f64,
    pub crystallinity_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    pub iteration: usize,
    pub energy: f64,
}
