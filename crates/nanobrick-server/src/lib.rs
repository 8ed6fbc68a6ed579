//! NanoBrick API server.
//!
//! JSON endpoints for the NanoBrick bio-composite demo:
//!
//! - `GET  /api/status`: service readiness
//! - `POST /api/classify`: agricultural waste classification
//! - `POST /api/optimize`: variational energy minimization
//! - `POST /api/calculate`: bio-brick property estimate
//! - `POST /api/extract`: nanofiber extraction simulation
//!
//! Classification and property estimates come from a generative
//! [`MaterialAdvisor`] when one is configured, with rule-based fallbacks
//! otherwise or on failure.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nanobrick_server::{AppState, Config, create_router};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let addr = config.bind_address().unwrap();
//!     let app = create_router(Arc::new(AppState::new(config)));
//!
//!     let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use dto::{Composition, OptimizeResponse, StatusResponse};
pub use error::ApiError;
pub use llm::{GeminiClient, LlmError, LlmResult, MaterialAdvisor};
pub use server::create_router;
pub use state::AppState;
