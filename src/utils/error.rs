use thiserror::Error;

#[derive(Error, Debug)]
pub enum KehilError {
    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP error! status: {status}{}", .message.as_deref().map(|m| format!(" ({m})")).unwrap_or_default())]
    HttpStatus {
        url: String,
        status: u16,
        message: Option<String>,
    },

    #[error("Network unavailable for {url}: {hint}")]
    NetworkUnavailable { url: String, hint: String },

    #[error("No reachable endpoint after probing {attempted} candidate(s)")]
    NoReachableEndpoint { attempted: usize },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Authentication,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KehilError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KehilError::Timeout { .. }
            | KehilError::HttpStatus { .. }
            | KehilError::NetworkUnavailable { .. }
            | KehilError::NoReachableEndpoint { .. }
            | KehilError::ApiError(_) => ErrorCategory::Network,
            KehilError::ConfigError { .. }
            | KehilError::ConfigValidationError { .. }
            | KehilError::InvalidConfigValueError { .. }
            | KehilError::MissingConfigError { .. } => ErrorCategory::Configuration,
            KehilError::SerializationError(_)
            | KehilError::ValidationError { .. }
            | KehilError::DuplicateEmail { .. } => ErrorCategory::Data,
            KehilError::InvalidCredentials => ErrorCategory::Authentication,
            KehilError::IoError(_) | KehilError::PasswordHash(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            KehilError::Timeout { .. }
            | KehilError::NetworkUnavailable { .. }
            | KehilError::NoReachableEndpoint { .. }
            | KehilError::ApiError(_) => ErrorSeverity::Medium,
            KehilError::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            KehilError::HttpStatus { .. } => ErrorSeverity::High,
            KehilError::DuplicateEmail { .. } | KehilError::InvalidCredentials => {
                ErrorSeverity::Low
            }
            KehilError::ValidationError { .. } | KehilError::SerializationError(_) => {
                ErrorSeverity::High
            }
            KehilError::ConfigError { .. }
            | KehilError::ConfigValidationError { .. }
            | KehilError::InvalidConfigValueError { .. }
            | KehilError::MissingConfigError { .. }
            | KehilError::IoError(_)
            | KehilError::PasswordHash(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否為逾時或連線層級的失敗（伺服器完全沒有回應）
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            KehilError::Timeout { .. } | KehilError::NetworkUnavailable { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KehilError::Timeout { .. } => {
                "Connection timeout - the server is not responding".to_string()
            }
            KehilError::HttpStatus {
                status,
                message: Some(message),
                ..
            } => format!("Server responded with {}: {}", status, message),
            KehilError::HttpStatus { status, .. } => {
                format!("Server responded with status {}", status)
            }
            KehilError::NetworkUnavailable { hint, .. } => format!("Network error - {}", hint),
            KehilError::NoReachableEndpoint { .. } => {
                "Could not connect to any server".to_string()
            }
            KehilError::DuplicateEmail { .. } => "Email already registered".to_string(),
            KehilError::InvalidCredentials => "Invalid email or password".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Make sure the server is running and reachable from this device (emulators use 10.0.2.2)"
            }
            ErrorCategory::Configuration => "Check the configuration file and command-line flags",
            ErrorCategory::Data => "Check the request payload and try again",
            ErrorCategory::Authentication => "Verify the email and password",
            ErrorCategory::System => "Check file permissions and system resources",
        }
    }
}

pub type Result<T> = std::result::Result<T, KehilError>;
