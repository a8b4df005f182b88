//! Error types for the telemetry dashboard

/// Errors that can occur in the telemetry dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not be completed (offline, refused, timed out)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// A response arrived with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The settings store refused the submitted thresholds
    #[error("Settings rejected: {0}")]
    Rejected(String),

    /// A payload could not be parsed or built
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
