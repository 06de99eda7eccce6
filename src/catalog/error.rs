use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not be reached, or every retry failed.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog returned status {status}")]
    Upstream { status: u16 },

    #[error("failed to decode catalog payload: {0}")]
    Decode(String),

    /// The product record was rejected before it reached the store.
    #[error("invalid product: {0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}

impl CatalogError {
    /// Status surfaced to HTTP clients for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Unavailable(_)
            | CatalogError::Upstream { .. }
            | CatalogError::Decode(_) => StatusCode::BAD_GATEWAY,
            CatalogError::Invalid(_) => StatusCode::BAD_REQUEST,
            CatalogError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
