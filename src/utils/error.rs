use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// `message` is the server's own text; `None` when the body carried none.
    #[error("Not logged in{}", detail(.message))]
    Unauthorized { message: Option<String> },

    #[error("Server returned {status}{}", detail(.message))]
    Api { status: u16, message: Option<String> },

    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Api,
    Validation,
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StorefrontError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        StorefrontError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StorefrontError::Http(_) => ErrorCategory::Network,
            StorefrontError::Unauthorized { .. } => ErrorCategory::Authentication,
            StorefrontError::Api { .. } | StorefrontError::Rejected { .. } => ErrorCategory::Api,
            StorefrontError::UnexpectedResponse { .. } | StorefrontError::Serialization(_) => {
                ErrorCategory::Data
            }
            StorefrontError::ValidationError { .. } => ErrorCategory::Validation,
            StorefrontError::Url(_)
            | StorefrontError::ConfigError { .. }
            | StorefrontError::ConfigValidationError { .. }
            | StorefrontError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            StorefrontError::Io(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Authentication => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// True for transport-level failures (no HTTP response was received).
    pub fn is_network(&self) -> bool {
        matches!(self, StorefrontError::Http(e) if e.status().is_none() && !e.is_decode())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StorefrontError::Unauthorized { .. })
    }

    /// Message text the server attached to a failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StorefrontError::Unauthorized { message } | StorefrontError::Api { message, .. } => {
                message.as_deref()
            }
            StorefrontError::Rejected { message } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            StorefrontError::Http(_) => {
                "Check that the storefront server is running and reachable at --base-url".to_string()
            }
            StorefrontError::Unauthorized { .. } => {
                "Log in first with `storefront login <username>`".to_string()
            }
            StorefrontError::Api { status, .. } if *status >= 500 => {
                "The server failed to handle the request; try again later".to_string()
            }
            StorefrontError::Api { .. } | StorefrontError::Rejected { .. } => {
                "Check the request values and try again".to_string()
            }
            StorefrontError::UnexpectedResponse { .. } | StorefrontError::Serialization(_) => {
                "The server response did not match the expected shape; check the server version"
                    .to_string()
            }
            StorefrontError::ValidationError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            StorefrontError::Url(_) => "Use an absolute http(s) URL for --base-url".to_string(),
            StorefrontError::ConfigError { .. }
            | StorefrontError::ConfigValidationError { .. }
            | StorefrontError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags".to_string()
            }
            StorefrontError::Io(_) => {
                "Check that the state directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StorefrontError::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            StorefrontError::Http(_) => "Network error".to_string(),
            StorefrontError::Unauthorized { .. } => "Please login first".to_string(),
            StorefrontError::Api {
                message: Some(message),
                ..
            }
            | StorefrontError::Rejected { message } => message.clone(),
            StorefrontError::Api { status, .. } => format!("Request failed ({})", status),
            StorefrontError::ValidationError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_severity() {
        let err = StorefrontError::Unauthorized {
            message: Some("Not logged in".to_string()),
        };
        assert_eq!(err.category(), ErrorCategory::Authentication);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_unauthorized());

        let err = StorefrontError::validation("username", "Please fill in all fields");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.user_friendly_message(), "Please fill in all fields");

        let err = StorefrontError::InvalidConfigValueError {
            field: "server.base_url".to_string(),
            value: "shop".to_string(),
            reason: "Invalid URL format".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_server_message() {
        let err = StorefrontError::Api {
            status: 500,
            message: Some("boom".to_string()),
        };
        assert_eq!(err.server_message(), Some("boom"));
        assert!(err.recovery_suggestion().contains("try again later"));

        let err = StorefrontError::Api {
            status: 502,
            message: None,
        };
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_friendly_message(), "Request failed (502)");
        assert_eq!(err.to_string(), "Server returned 502");

        let err = StorefrontError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(err.server_message(), None);
    }
}
