//! Dispatch parameters for the job dispatcher.
//!
//! [`DispatchParams`] groups the static parameters that control how the
//! [`ProcessJobUseCase`](crate::use_cases::process_job::ProcessJobUseCase)
//! runs a delivery. These are application-layer concerns, not domain policy.

use council_domain::{JobId, StageTemperatures};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Deliveries allowed per message before it is dead-lettered.
    pub max_attempts: u32,
    /// Sampling temperature per stage.
    pub temperatures: StageTemperatures,
    /// Public base URL used to build `result_url` in webhook payloads.
    pub public_base_url: Option<String>,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            temperatures: StageTemperatures::default(),
            public_base_url: None,
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_temperatures(mut self, temperatures: StageTemperatures) -> Self {
        self.temperatures = temperatures;
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// URL at which a completed job's result can be fetched, if published
    pub fn result_url_for(&self, job_id: &JobId) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base| format!("{}/jobs/{}/result", base.trim_end_matches('/'), job_id))
    }
}
