//! Routing service error types.

/// Errors from a driving-directions lookup.
///
/// Every variant is recoverable: the route pipeline falls back to a straight
/// line for the affected segment.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Routing service returned an error status
    #[error("routing error {status}: {message}")]
    Status { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Service answered but found no drivable route
    #[error("no route found ({code})")]
    NoRoute { code: String },

    /// No routing service configured
    #[error("routing service not configured")]
    NotConfigured,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DirectionsError::NoRoute {
            code: "NoRoute".into(),
        };
        assert_eq!(err.to_string(), "no route found (NoRoute)");

        let err = DirectionsError::Status {
            status: 429,
            message: "Too Many Requests".into(),
        };
        assert_eq!(err.to_string(), "routing error 429: Too Many Requests");
    }
}
