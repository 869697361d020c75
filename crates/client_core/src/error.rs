use composition::DraftError;
use shared::{
    domain::CoffeeId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

/// A failed round trip to the catalog store or order gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected the request ({status}): {}", .error.message)]
    Rejected { status: u16, error: ApiError },
    #[error("unreadable backend response from {0}")]
    Decode(String),
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn rejected(status: u16, code: ErrorCode, message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            status,
            error: ApiError::new(code, message),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            GatewayError::Rejected { error, .. } => Some(error.code),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("no draft is open")]
    NoDraft,
    #[error("coffee {0} is not in the loaded catalog")]
    UnknownCoffee(CoffeeId),
}
