use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            409 => ErrorCode::Conflict,
            400 | 422 => ErrorCode::Validation,
            _ => ErrorCode::Internal,
        }
    }
}

/// Error body reported by the backend on a non-success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    #[serde(alias = "error")]
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds an error from a raw response, preferring a structured body when one is present.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct LooseBody {
            #[serde(default)]
            code: Option<ErrorCode>,
            #[serde(alias = "error")]
            message: String,
        }

        let fallback_code = ErrorCode::from_status(status);
        match serde_json::from_str::<LooseBody>(body) {
            Ok(parsed) => Self::new(parsed.code.unwrap_or(fallback_code), parsed.message),
            Err(_) => {
                let trimmed = body.trim();
                let message = if trimmed.is_empty() {
                    format!("backend responded with status {status}")
                } else {
                    trimmed.to_string()
                };
                Self::new(fallback_code, message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
