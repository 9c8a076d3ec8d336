use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Booking API returned status {status} for {endpoint}")]
    ApiStatusError { endpoint: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No station matches '{query}'")]
    StationNotFound { query: String },

    #[error("Multiple station matches for '{query}', please specify according to: {candidates}")]
    AmbiguousStation { query: String, candidates: String },

    #[error("Connection {from} -> {to} has no trains to retrieve a departure time from")]
    EmptyConnection { from: String, to: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::ApiError(_) | CheckError::ApiStatusError { .. } => ErrorCategory::Network,
            CheckError::StationNotFound { .. }
            | CheckError::AmbiguousStation { .. }
            | CheckError::EmptyConnection { .. }
            | CheckError::ProcessingError { .. } => ErrorCategory::Data,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CheckError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Transient: a later scheduled run may succeed without any change.
            CheckError::ApiError(_) | CheckError::ApiStatusError { .. } => ErrorSeverity::Medium,
            CheckError::StationNotFound { .. }
            | CheckError::AmbiguousStation { .. }
            | CheckError::EmptyConnection { .. }
            | CheckError::ProcessingError { .. } => ErrorSeverity::High,
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CheckError::ApiError(_) => {
                "Check network connectivity and whether the booking API is reachable".to_string()
            }
            CheckError::ApiStatusError { status, .. } => format!(
                "The booking API rejected the request with status {}; retry later or verify the endpoint",
                status
            ),
            CheckError::StationNotFound { query } => {
                format!("Try a different spelling for '{}' (the API matches localized names)", query)
            }
            CheckError::AmbiguousStation { .. } => {
                "Use a more specific station name from the listed candidates".to_string()
            }
            CheckError::EmptyConnection { .. } => {
                "The API returned a connection without trains; try a different date".to_string()
            }
            CheckError::ProcessingError { .. } => {
                "The API response shape changed; inspect the raw response with --verbose".to_string()
            }
            CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            CheckError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the booking API: {}", self),
            ErrorCategory::Data => format!("Unexpected booking data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = CheckError::MissingConfigError {
            field: "endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_ambiguous_station_message_lists_candidates() {
        let err = CheckError::AmbiguousStation {
            query: "Wien".to_string(),
            candidates: "Wien Hbf (1), Wien Meidling (2)".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Wien Hbf"));
        assert!(msg.contains("please specify"));
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
