// src/errors.rs
use thiserror::Error;

/// Failure talking to the trading backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. The message shape is relied on by the form and by
    /// whoever reads the log file, keep it stable.
    #[error("{method} {path} failed: {status} {body}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("{method} {path} failed: {source}")]
    Transport {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path} returned invalid JSON: {source}")]
    Decode {
        method: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected form input. `Display` is the exact text shown next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill all fields with valid numbers.")]
    IncompleteFields,

    #[error("Quantity must be > 0.")]
    NonPositiveQuantity,

    #[error("Stop-loss should be below Buy Price.")]
    StopLossNotBelowBuy,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TRADE_API_BASE_URL is not set; the dashboard has no backend to talk to")]
    MissingBaseUrl,

    #[error("Invalid API base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}
