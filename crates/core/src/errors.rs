use thiserror::Error;

/// Unified error type for the entire stock-forecasting-core library.
///
/// Aggregation itself never fails; every variant here describes an upstream
/// data-availability or configuration problem.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({endpoint}): HTTP {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors often carry the full request URL; drop the query
        // string so part ids and export parameters stay out of user-facing text.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for CoreError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        CoreError::Configuration(format!("Invalid API token header: {e}"))
    }
}
