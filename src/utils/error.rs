use lettre::transport::smtp::response::Code;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required configuration: {}", .missing.join(", "))]
    ConfigurationMissing { missing: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Unexpected HTTP status: {status}")]
    HttpStatus { status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

const SMTP_AUTH_REJECTED: u16 = 535;

impl AppError {
    /// Whether this error came from talking to the product page.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Timeout { .. } | AppError::HttpStatus { .. }
        )
    }

    /// SMTP reply 535: the relay rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            AppError::Smtp(err) => err.status().is_some_and(is_auth_rejection),
            _ => false,
        }
    }
}

fn is_auth_rejection(code: Code) -> bool {
    u16::from(code) == SMTP_AUTH_REJECTED
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::Notification(format!("failed to build message: {}", err))
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(err: lettre::address::AddressError) -> Self {
        AppError::Notification(format!("invalid email address: {}", err))
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
