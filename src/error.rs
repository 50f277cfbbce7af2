//! Error types for content generation, rendering and export

use thiserror::Error;

/// Result type alias for tabloid operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the generation service reports rate limiting or quota exhaustion.
pub const QUOTA_EXCEEDED_MESSAGE: &str = "AI服务当前请求过多，已超出使用额度。请稍后再试。";

/// Message shown for every other generation failure (network, configuration, bad payload).
pub const GENERATION_FAILED_MESSAGE: &str = "AI内容生成失败，可能是网络问题或API配置错误。";

/// Fallback shown when a failure carries no message at all.
pub const UNKNOWN_FAILURE_MESSAGE: &str = "生成内容时发生未知错误，请稍后重试。";

/// Alert text shown when capturing or saving the image fails.
pub const EXPORT_FAILED_MESSAGE: &str = "下载失败，请稍后重试。";

/// Markers (matched against lower-cased failure text) that identify quota exhaustion.
const QUOTA_MARKERS: [&str; 3] = ["429", "quota", "resource_exhausted"];

/// Errors that can occur while generating, rendering or exporting a tabloid
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize a backend
    #[error("Initialization failed: {0}")]
    InitializationError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The generation service refused the request because of rate limits or quota.
    /// `detail` keeps the raw failure text for diagnostics.
    #[error("{}", QUOTA_EXCEEDED_MESSAGE)]
    QuotaExceeded { detail: String },

    /// Any other generation failure, including malformed responses.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    GenerationFailed { detail: String },

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to capture or save an image
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for the two generation variants produced by [`classify_failure`].
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Error::QuotaExceeded { .. } | Error::GenerationFailed { .. })
    }

    /// Raw diagnostic text behind a generation failure, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::QuotaExceeded { detail } | Error::GenerationFailed { detail } => Some(detail),
            _ => None,
        }
    }
}

/// Map raw failure text from the generation pipeline to a user-facing error.
///
/// The text is lower-cased and searched for quota markers (`429`, `quota`,
/// `resource_exhausted`); anything else becomes a generic generation failure.
pub fn classify_failure(detail: impl Into<String>) -> Error {
    let detail = detail.into();
    let lowered = detail.to_lowercase();
    if QUOTA_MARKERS.iter().any(|m| lowered.contains(m)) {
        Error::QuotaExceeded { detail }
    } else {
        Error::GenerationFailed { detail }
    }
}

/// Text to show in the error view for `err`.
pub fn user_message(err: &Error) -> String {
    let msg = err.to_string();
    if msg.trim().is_empty() {
        UNKNOWN_FAILURE_MESSAGE.to_string()
    } else {
        msg
    }
}
