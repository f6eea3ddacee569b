//! Backend client error types.

use super::convert::ConversionError;

/// Coarse classification used by the panels to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request rejected, unreachable, or non-success status.
    Transport,
    /// Response arrived but had an unexpected shape.
    MalformedPayload,
}

/// Errors from the analysis backend client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body could not be decoded or failed validation
    #[error("malformed payload: {message}")]
    Malformed {
        message: String,
        body: Option<String>,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Http(_) | ApiError::Status { .. } => ErrorKind::Transport,
            ApiError::Malformed { .. } => ErrorKind::MalformedPayload,
        }
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        ApiError::Malformed {
            message: err.to_string(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::Status {
            status: 400,
            message: "Estación no encontrada".into(),
        };
        assert_eq!(err.to_string(), "API error 400: Estación no encontrada");
        assert_eq!(err.kind(), ErrorKind::Transport);

        let err = ApiError::Malformed {
            message: "expected array".into(),
            body: Some("{}".into()),
        };
        assert_eq!(err.to_string(), "malformed payload: expected array");
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
    }

    #[test]
    fn conversion_errors_are_malformed() {
        let err: ApiError = ConversionError::InvalidStationId(String::new()).into();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
        assert!(err.to_string().contains("invalid station id"));
    }
}
