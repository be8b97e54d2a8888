use thiserror::Error;

#[derive(Error, Debug)]
pub enum FareError {
    #[error("Invalid distance {value}: {reason}")]
    InvalidDistance { value: String, reason: String },

    #[error("Fare for a {distance} km ride is not a finite amount")]
    FareOverflow { distance: String },

    #[error("Unsupported tariff: {name}. Available: {available}")]
    UnknownTariff { name: String, available: String },

    #[error("{factor} rating must be between 1 and 5, got: {value}")]
    RatingOutOfRange { factor: String, value: i64 },

    #[error("{field} must be a number, got: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Invalid trip on line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: Box<FareError>,
    },

    #[error("Trips file is missing the '{column}' column")]
    MissingColumn { column: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FareError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FareError::InvalidDistance { .. }
            | FareError::FareOverflow { .. }
            | FareError::UnknownTariff { .. }
            | FareError::RatingOutOfRange { .. }
            | FareError::InvalidNumber { .. } => ErrorCategory::Input,
            FareError::InvalidConfigValueError { .. }
            | FareError::ConfigValidationError { .. }
            | FareError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FareError::InvalidRow { .. }
            | FareError::MissingColumn { .. }
            | FareError::CsvError(_)
            | FareError::SerializationError(_) => ErrorCategory::Data,
            FareError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FareError::InvalidDistance { .. } => {
                "Pass a trip distance in kilometres greater than zero".to_string()
            }
            FareError::FareOverflow { .. } => {
                "Check the distance unit; the trip is too long to price".to_string()
            }
            FareError::UnknownTariff { available, .. } => {
                format!("Use one of the supported tariffs: {}", available)
            }
            FareError::RatingOutOfRange { .. } => {
                "Ratings are whole numbers from 1 (none) to 5 (extreme)".to_string()
            }
            FareError::InvalidNumber { field, .. } => {
                format!("Check that {} contains a plain number", field)
            }
            FareError::InvalidRow { .. } => {
                "Fix the trip row or rerun without --strict to skip invalid rows".to_string()
            }
            FareError::MissingColumn { .. } => {
                "The header must name at least id, distance and tariff".to_string()
            }
            FareError::InvalidConfigValueError { field, .. }
            | FareError::ConfigValidationError { field, .. } => {
                format!("Review the '{}' setting in the configuration file", field)
            }
            FareError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration or pass it on the command line", field)
            }
            FareError::CsvError(_) => {
                "Make sure the trips file is CSV with an 'id,distance,tariff' header".to_string()
            }
            FareError::IoError(_) => "Check file paths and permissions".to_string(),
            FareError::SerializationError(_) => {
                "Report this as a bug; the summary could not be encoded".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Cannot price the ride: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Trip data problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    /// Exit code reported by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, FareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_high_severity() {
        let err = FareError::RatingOutOfRange {
            factor: "traffic".to_string(),
            value: 6,
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("traffic rating"));
    }

    #[test]
    fn test_row_error_wraps_source() {
        let err = FareError::InvalidRow {
            line: 3,
            source: Box::new(FareError::InvalidDistance {
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            }),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("Invalid trip on line 3"));
        assert!(err.user_friendly_message().contains("Trip data problem"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = FareError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
