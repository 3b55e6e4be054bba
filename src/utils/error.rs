use thiserror::Error;

#[derive(Error, Debug)]
pub enum TravelError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input for '{field}': {message}")]
    InputError { field: String, message: String },

    #[error("Authentication failed ({status}): {message}")]
    AuthError { status: u16, message: String },

    #[error("Rate limited by the language model service: {message}")]
    RateLimitedError { message: String },

    #[error("Language model service error {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response from language model service: {message}")]
    InvalidResponseError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Service,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TravelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TravelError::InputError { .. } => ErrorCategory::Input,
            TravelError::ConfigError { .. }
            | TravelError::ConfigValidationError { .. }
            | TravelError::InvalidConfigValueError { .. }
            | TravelError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TravelError::ApiError(_)
            | TravelError::AuthError { .. }
            | TravelError::RateLimitedError { .. }
            | TravelError::ServiceError { .. }
            | TravelError::InvalidResponseError { .. } => ErrorCategory::Service,
            TravelError::CsvError(_) | TravelError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            // 服務錯誤通常可由使用者重新觸發
            ErrorCategory::Service => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_service_error(&self) -> bool {
        self.category() == ErrorCategory::Service
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TravelError::InputError { field, message } => {
                format!("Please check the '{}' field: {}", field, message)
            }
            TravelError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            TravelError::AuthError { .. } => {
                format!("Travel plan generation failed: {}", self)
            }
            TravelError::RateLimitedError { .. } | TravelError::ServiceError { .. } => {
                format!("Travel plan generation failed: {}", self)
            }
            TravelError::ApiError(e) => {
                format!("Could not reach the language model service: {}", e)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TravelError::InputError { .. } => "Correct the highlighted input and try again",
            TravelError::MissingConfigError { .. } => {
                "Set GOOGLE_API_KEY in the environment or in a .env file"
            }
            TravelError::AuthError { .. } => "Verify that the API key is valid and enabled",
            TravelError::RateLimitedError { .. } => "Wait a moment before generating another plan",
            TravelError::ApiError(_) => "Check your network connection and try again",
            TravelError::ServiceError { .. } | TravelError::InvalidResponseError { .. } => {
                "Try generating the plan again later"
            }
            TravelError::ConfigError { .. }
            | TravelError::ConfigValidationError { .. }
            | TravelError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line options"
            }
            TravelError::CsvError(_) => "Check the catalog CSV files for malformed rows",
            TravelError::IoError(_) => "Check that the output directory is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, TravelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_are_medium_severity() {
        let err = TravelError::RateLimitedError {
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Service);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_service_error());
    }

    #[test]
    fn test_input_error_message_names_field() {
        let err = TravelError::InputError {
            field: "budget".to_string(),
            message: "must be at least 100".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.user_friendly_message().contains("'budget'"));
    }

    #[test]
    fn test_exit_codes_separate_input_from_service_failures() {
        let input = TravelError::InputError {
            field: "budget".to_string(),
            message: "invalid float literal".to_string(),
        };
        let service = TravelError::ServiceError {
            status: 500,
            message: "boom".to_string(),
        };
        let config = TravelError::ConfigError {
            message: "missing file".to_string(),
        };

        assert_eq!(input.exit_code(), 1);
        assert_eq!(config.exit_code(), 1);
        assert_eq!(service.exit_code(), 2);
        assert_eq!(
            TravelError::IoError(std::io::Error::other("disk full")).exit_code(),
            3
        );
    }

    #[test]
    fn test_service_error_keeps_provider_message() {
        let err = TravelError::ServiceError {
            status: 503,
            message: "The model is overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.user_friendly_message().contains("The model is overloaded"));
    }
}
