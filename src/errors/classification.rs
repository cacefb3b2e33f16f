use super::types::VigilError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl VigilError {
    /// Classify this error to determine its type and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Retryable errors
            VigilError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            VigilError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            VigilError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },
            VigilError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                retryable: true,
            },

            // Non-retryable errors
            VigilError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            VigilError::Validation(_) => ErrorClassification {
                error_type: "ValidationError",
                retryable: false,
            },
            VigilError::Fetch(_) => ErrorClassification {
                error_type: "FetchError",
                retryable: false,
            },
            VigilError::Parse(_) => ErrorClassification {
                error_type: "ParseError",
                retryable: false,
            },
            VigilError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            VigilError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            VigilError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }
}
