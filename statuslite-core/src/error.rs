//! Error types for the statuslite core library.
//!
//! Every failure the add-on can produce is a [`StatusError`]. Most of them never
//! reach a chat user: collection failures degrade to partial data, and render
//! failures make the `status` command fall back to its text report.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E2001-E2099 | Config | Config file, environment and validation errors |
//! | E6001-E6099 | Metrics | Metric collection and sampler lifecycle errors |
//! | E7001-E7099 | Render | Dashboard drawing, font and encoding errors |
//! | E9001-E9099 | General | Internal and IO errors |
//! | E10001-E10099 | Command | Command routing and host messaging errors |

use thiserror::Error;
use tracing::{error, warn};

/// The main error type for the statuslite core library.
#[derive(Debug, Error)]
pub enum StatusError {
    // ========================================================================
    // Config Errors (E2001-E2099)
    // ========================================================================
    /// Failed to parse a config file or environment source
    #[error("[E2001] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// A configuration value failed validation
    #[error("[E2002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // Metrics Errors (E6001-E6099)
    // ========================================================================
    #[error("[E6001] Metrics collection failed: {0}")]
    MetricsCollectionFailed(String),

    #[error("[E6002] Memory sampler is not running")]
    SamplerNotRunning,

    #[error("[E6003] Process not found: {0}")]
    ProcessNotFound(String),

    // ========================================================================
    // Render Errors (E7001-E7099)
    // ========================================================================
    #[error("[E7001] Dashboard rendering failed: {0}")]
    Render(String),

    #[error("[E7002] Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("[E7003] Failed to load font '{path}': {message}")]
    FontLoad { path: String, message: String },

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    #[error("[E9005] IO error: {0}")]
    IoError(String),

    // ========================================================================
    // Command Errors (E10001-E10099)
    // ========================================================================
    /// No command is registered under the given name or alias
    #[error("[E10001] Command not found: {0}")]
    CommandNotFound(String),

    /// The host failed to deliver a message
    #[error("[E10002] Failed to send message: {0}")]
    MessagingFailed(String),
}

pub type StatusResult<T> = Result<T, StatusError>;

impl From<std::io::Error> for StatusError {
    fn from(err: std::io::Error) -> Self {
        StatusError::IoError(err.to_string())
    }
}

impl From<image::ImageError> for StatusError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => StatusError::ImageEncode(e.to_string()),
            image::ImageError::IoError(e) => StatusError::ImageEncode(e.to_string()),
            other => StatusError::Render(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for StatusError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => StatusError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => StatusError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => StatusError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => StatusError::ConfigParseError(err.to_string()),
        }
    }
}

impl StatusError {
    /// Returns true for failures that make the `status` command fall back to text.
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            StatusError::Render(_) | StatusError::ImageEncode(_) | StatusError::FontLoad { .. }
        )
    }

    /// Errors that may succeed on the next sampling tick.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StatusError::MetricsCollectionFailed(_)
                | StatusError::ProcessNotFound(_)
                | StatusError::MessagingFailed(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StatusError::ConfigParseError(_) => "E2001",
            StatusError::InvalidConfigValue { .. } => "E2002",
            StatusError::MetricsCollectionFailed(_) => "E6001",
            StatusError::SamplerNotRunning => "E6002",
            StatusError::ProcessNotFound(_) => "E6003",
            StatusError::Render(_) => "E7001",
            StatusError::ImageEncode(_) => "E7002",
            StatusError::FontLoad { .. } => "E7003",
            StatusError::Internal(_) => "E9001",
            StatusError::IoError(_) => "E9005",
            StatusError::CommandNotFound(_) => "E10001",
            StatusError::MessagingFailed(_) => "E10002",
        }
    }

    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            StatusError::FontLoad { .. } => {
                Some("Set render.font_path to a TrueType or OpenType font file")
            }
            StatusError::CommandNotFound(_) => Some("Run 'statuslite commands' to list commands"),
            StatusError::InvalidConfigValue { .. } => {
                Some("Check statuslite.toml and STATUSLITE_* environment variables")
            }
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();

        if self.is_transient() {
            warn!(error_code = %code, "Transient error occurred: {}", self);
        } else {
            error!(error_code = %code, "Error occurred: {}", self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatusError::CommandNotFound("stats".to_string());
        assert!(err.to_string().contains("E10001"));
        assert!(err.to_string().contains("stats"));

        let err = StatusError::FontLoad {
            path: "/fonts/missing.ttf".to_string(),
            message: "No such file".to_string(),
        };
        assert!(err.to_string().contains("E7003"));
        assert!(err.to_string().contains("missing.ttf"));
    }

    #[test]
    fn test_error_categorization() {
        let render_err = StatusError::Render("canvas too large".to_string());
        assert!(render_err.is_render_error());

        let encode_err = StatusError::ImageEncode("broken pipe".to_string());
        assert!(encode_err.is_render_error());

        assert!(!StatusError::MessagingFailed("closed".to_string()).is_render_error());
        assert!(!StatusError::SamplerNotRunning.is_render_error());
    }

    #[test]
    fn test_is_transient() {
        assert!(StatusError::MetricsCollectionFailed("proc".to_string()).is_transient());
        assert!(StatusError::ProcessNotFound("42".to_string()).is_transient());
        assert!(!StatusError::Render("x".to_string()).is_transient());
        assert!(!StatusError::SamplerNotRunning.is_transient());
    }

    #[test]
    fn test_error_codes_match_display() {
        let errors = vec![
            StatusError::ConfigParseError("x".to_string()),
            StatusError::MetricsCollectionFailed("x".to_string()),
            StatusError::SamplerNotRunning,
            StatusError::Render("x".to_string()),
            StatusError::ImageEncode("x".to_string()),
            StatusError::Internal("x".to_string()),
            StatusError::IoError("x".to_string()),
            StatusError::CommandNotFound("x".to_string()),
        ];

        for err in errors {
            let code = err.error_code();
            assert!(
                err.to_string().starts_with(&format!("[{}]", code)),
                "{} should start with its code {}",
                err,
                code
            );
        }
    }

    #[test]
    fn test_user_suggestion() {
        let err = StatusError::CommandNotFound("stats".to_string());
        assert!(err.user_suggestion().unwrap().contains("statuslite commands"));
        assert!(StatusError::Render("x".to_string()).user_suggestion().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StatusError = io.into();
        assert_eq!(err.error_code(), "E9005");
    }
}
