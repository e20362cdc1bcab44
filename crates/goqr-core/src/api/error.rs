use thiserror::Error;

use crate::models::UsageInfo;
use crate::utils::truncate_string;

#[derive(Error, Debug)]
pub enum ApiError {
    /// GitHub answered with something other than 200. Displays as the
    /// server's own message so it can be shown verbatim.
    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
        usage: Option<UsageInfo>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Build an `Api` error from a failed response body. Prefers GitHub's
    /// `{"message": ...}`; falls back to the status line and raw body.
    pub fn from_status(status: reqwest::StatusCode, body: &str, usage: Option<UsageInfo>) -> Self {
        let message = match serde_json::from_str::<crate::models::content::ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => format!(
                "{}: {}",
                status,
                truncate_string(body.trim(), MAX_ERROR_BODY_LENGTH)
            ),
        };
        ApiError::Api {
            status,
            message,
            usage,
        }
    }

    /// Rate-limit snapshot carried by the failed response, if any
    pub fn usage(&self) -> Option<&UsageInfo> {
        match self {
            ApiError::Api { usage, .. } => usage.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }
}
