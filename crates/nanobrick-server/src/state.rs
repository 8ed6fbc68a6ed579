//! Application state for the API server.

use std::sync::Arc;

use crate::config::Config;
use crate::llm::MaterialAdvisor;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Generative advisor; `None` means every request uses the rule-based path.
    pub advisor: Option<Arc<dyn MaterialAdvisor>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            advisor: None,
        }
    }

    /// Attach a material advisor.
    pub fn with_advisor(mut self, advisor: Arc<dyn MaterialAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn llm_available(&self) -> bool {
        self.advisor.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
