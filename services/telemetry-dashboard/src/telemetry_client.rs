//! Client for the telemetry source and the threshold settings store

use std::sync::Arc;

use crate::config::TelemetryConfig;
use crate::io::{HttpClient, HttpResponse};
use crate::types::{SensorReading, StoreError, ThresholdSettings, ThresholdSubmission};
use crate::DashboardError;

/// Talks to `/api/sensor-data` and `/api/settings` on the backend
pub struct TelemetryClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelemetryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TelemetryClient {
    pub fn new(config: &TelemetryConfig, http: Arc<dyn HttpClient>) -> Self {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created TelemetryClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest reading.
    ///
    /// Transport failures, non-2xx responses and malformed payloads all
    /// come back as errors.
    pub async fn fetch_reading(&self) -> crate::Result<SensorReading> {
        let url = format!("{}/api/sensor-data", self.base_url);
        let response = self.http.get(&url).await?;
        ensure_success(&url, &response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetch the thresholds currently held by the store
    pub async fn fetch_settings(&self) -> crate::Result<ThresholdSettings> {
        let url = format!("{}/api/settings", self.base_url);
        let response = self.http.get(&url).await?;
        ensure_success(&url, &response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Submit thresholds to the store.
    ///
    /// A non-2xx response carrying `{"error": ...}` becomes
    /// [`DashboardError::Rejected`]; any other non-2xx becomes
    /// [`DashboardError::Status`].
    pub async fn save_settings(&self, submission: &ThresholdSubmission) -> crate::Result<()> {
        let url = format!("{}/api/settings", self.base_url);
        let body = serde_json::to_value(submission)?;
        tracing::debug!("Submitting settings: {}", body);

        let response = self.http.post_json(&url, &body).await?;
        if response.is_success() {
            return Ok(());
        }

        match serde_json::from_str::<StoreError>(&response.body) {
            Ok(rejection) => Err(DashboardError::Rejected(rejection.error)),
            Err(_) => Err(DashboardError::Status {
                url,
                status: response.status,
            }),
        }
    }
}

fn ensure_success(url: &str, response: &HttpResponse) -> crate::Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(DashboardError::Status {
            url: url.to_string(),
            status: response.status,
        })
    }
}
