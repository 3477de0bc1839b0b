//! Error types for Skyline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkylineError>;

#[derive(Error, Debug)]
pub enum SkylineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SkylineError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SkylineError::InvalidInput(_) => 3,
            SkylineError::Api(ApiError::Authentication(_)) => 2,
            SkylineError::Api(_) => 1,
            SkylineError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Errors surfaced by the XRPC boundary.
///
/// Everything here is recoverable from the stream engine's point of view: a
/// failed fetch abandons the cycle and the loop retries on the next interval.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed ({context}): status {status}")]
    Status { status: u16, context: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Malformed feed record: {0}")]
    MalformedRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = SkylineError::InvalidInput("Empty content".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let error = SkylineError::Api(ApiError::Authentication("bad credentials".to_string()));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_other_api_errors() {
        let network = SkylineError::Api(ApiError::Network("connection refused".to_string()));
        assert_eq!(network.exit_code(), 1);

        let status = SkylineError::Api(ApiError::Status {
            status: 500,
            context: "fetch timeline".to_string(),
        });
        assert_eq!(status.exit_code(), 1);

        let decode = SkylineError::Api(ApiError::Decode("unexpected EOF".to_string()));
        assert_eq!(decode.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = SkylineError::Config(ConfigError::MissingField(
            "credentials.identifier".to_string(),
        ));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_status() {
        let error = SkylineError::Api(ApiError::Status {
            status: 429,
            context: "fetch timeline".to_string(),
        });
        let message = format!("{}", error);
        assert_eq!(
            message,
            "API error: Request failed (fetch timeline): status 429"
        );
    }

    #[test]
    fn test_error_message_formatting_malformed_record() {
        let error = ApiError::MalformedRecord("missing field `uri`".to_string());
        let message = format!("{}", error);
        assert!(message.contains("Malformed feed record"));
        assert!(message.contains("uri"));
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::MissingField("test".to_string());
        let error: SkylineError = config_error.into();
        assert!(matches!(error, SkylineError::Config(_)));
    }

    #[test]
    fn test_error_conversion_from_api_error() {
        let api_error = ApiError::Network("test".to_string());
        let error: SkylineError = api_error.into();
        assert!(matches!(error, SkylineError::Api(_)));
    }

    #[test]
    fn test_invalid_value_formatting() {
        let error = ConfigError::InvalidValue {
            field: "interval".to_string(),
            reason: "must be positive".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Invalid value for interval: must be positive"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_err() -> Result<()> {
            Err(SkylineError::InvalidInput("test".to_string()))
        }
        assert!(returns_err().is_err());
    }
}
