use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Invalid date for '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Unknown booking status: '{value}'")]
    UnknownStatus { value: String },

    #[error("Booking cannot go from '{from}' via '{action}'")]
    InvalidTransition { from: String, action: String },

    #[error("Request rejected by server: {reason}")]
    Rejected { reason: String },

    #[error("Car {car_id} is not available for {start} to {end}")]
    Unavailable {
        car_id: u64,
        start: String,
        end: String,
    },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Domain,
    Backend,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RentalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RentalError::ApiError(_) => ErrorCategory::Network,
            RentalError::IoError(_) | RentalError::SerializationError(_) => ErrorCategory::System,
            RentalError::ConfigError { .. }
            | RentalError::ConfigValidationError { .. }
            | RentalError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RentalError::InvalidDate { .. }
            | RentalError::InvalidRange { .. }
            | RentalError::ValidationError { .. } => ErrorCategory::Input,
            RentalError::UnknownStatus { .. }
            | RentalError::InvalidTransition { .. }
            | RentalError::Unavailable { .. }
            | RentalError::NotFound { .. } => ErrorCategory::Domain,
            RentalError::Rejected { .. } => ErrorCategory::Backend,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者可直接修正輸入後重試
            ErrorCategory::Input | ErrorCategory::Domain => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RentalError::ApiError(_) => "Failed to connect to server".to_string(),
            RentalError::Rejected { reason } => reason.clone(),
            RentalError::Unavailable { car_id, start, end } => {
                format!("Car {} is already booked between {} and {}", car_id, start, end)
            }
            RentalError::InvalidDate { field, .. } => {
                format!("Please enter a valid {} (YYYY-MM-DD)", field)
            }
            RentalError::InvalidRange { .. } => {
                "The end date must not be before the start date".to_string()
            }
            RentalError::InvalidTransition { from, .. } => {
                format!("This booking is already {}", from)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the rental server is running and --api-base is correct",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::Input => "Correct the input and run the command again",
            ErrorCategory::Domain => "Refresh the booking list and pick another car or booking",
            ErrorCategory::Backend => "The server refused the request; try again with different details",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, RentalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_backend_medium() {
        let err = RentalError::Rejected {
            reason: "Car already booked".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Backend);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "Car already booked");
    }

    #[test]
    fn test_input_errors_are_high() {
        let err = RentalError::InvalidRange {
            start: "2024-06-05".to_string(),
            end: "2024-06-01".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: RentalError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
