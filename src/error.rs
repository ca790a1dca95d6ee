use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),

    #[error("Malformed policy document: {0}")]
    MalformedDocument(String),

    #[error("Unknown directive name: {0}")]
    UnknownDirective(String),

    #[error("Unknown sandbox token: {0}")]
    UnknownSandboxToken(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedDocument(_)
            | Self::UnknownDirective(_)
            | Self::UnknownSandboxToken(_) => StatusCode::BAD_REQUEST,

            Self::InvalidHeaderValue(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
