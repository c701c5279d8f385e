//! Fleet client errors

use thiserror::Error;

/// Errors that can occur when talking to the fleet service
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Fleet service unavailable at {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Fleet service error {status}{}: {message}", code_suffix(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The body could not be parsed as the expected record type
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FleetError {
    /// Service error code such as `DRONE_WEIGHT_LIMIT`, when one was sent
    pub fn code(&self) -> Option<&str> {
        match self {
            FleetError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for an operator notification
    pub fn user_message(&self) -> String {
        match self {
            FleetError::Api { message, .. } if !message.is_empty() => message.clone(),
            FleetError::Api { status, .. } => format!("Fleet service returned {}", status),
            other => other.to_string(),
        }
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({})", c))
        .unwrap_or_default()
}

/// Result type alias for fleet operations
pub type FleetResult<T> = Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = FleetError::Api {
            status: 400,
            code: Some("DRONE_NOT_FOUND".to_string()),
            message: "Drone d-9 does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fleet service error 400 (DRONE_NOT_FOUND): Drone d-9 does not exist"
        );
        assert_eq!(err.code(), Some("DRONE_NOT_FOUND"));
        assert_eq!(err.user_message(), "Drone d-9 does not exist");

        let err = FleetError::Api {
            status: 502,
            code: None,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "Fleet service error 502: ");
        assert_eq!(err.user_message(), "Fleet service returned 502");
    }
}
