//! Tabloid generator
//!
//! Prompts a generative-AI text service for a themed school newsletter
//! ("手抄报"), renders the structured reply as a page, and exports the
//! rendered result as a PNG image.
//!
//! # Features
//!
//! - **Gemini backend** (default, feature `gemini`): blocking HTTP client for
//!   the `generateContent` endpoint with a strict JSON output schema
//! - **Explicit state machine**: `Idle | Loading | Success | Error` with
//!   request identifiers so stale responses are dropped
//! - **Pure-Rust export**: layout, paint and raster stages produce a PNG of
//!   the result without a browser
//!
//! # Example
//!
//! ```no_run
//! use tabloid::{App, ExportConfig, GeneratorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig {
//!     api_key: "my-key".to_string(),
//!     ..Default::default()
//! };
//!
//! let service = tabloid::new_service(config)?;
//! let mut app = App::new(tabloid::export::Exporter::to_directory(ExportConfig::default(), "."));
//! app.generate_with(&service);
//! println!("{}", app.render_page());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod document;
pub use document::GeneratedDocument;

pub mod schema;

#[cfg(feature = "gemini")]
pub mod gemini;

pub mod state;
pub use state::{AppState, RequestId, ViewState};

// HTML presentation of the page and the result layout
pub mod view;

// Layout, paint and raster stages used by export
pub mod rendering;

// Browser-like surfaces: downloads and alerts
pub mod platform;

pub mod export;

pub mod app;
pub use app::App;

// Async-friendly generation API (worker-thread backed)
pub mod async_api;
pub use async_api::Studio;

/// Default model used for generation requests
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default endpoint root of the generation service
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Configuration for the generation client
///
/// The credential is an explicit value; nothing in the library reads the
/// process environment. The binary fills `api_key` from `GEMINI_API_KEY`
/// (or `API_KEY`).
///
/// # Examples
///
/// ```
/// let cfg = tabloid::GeneratorConfig::default();
/// assert_eq!(cfg.model, "gemini-2.5-flash");
/// assert!(cfg.api_key.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Credential sent with every request
    pub api_key: String,
    /// Model name inserted into the endpoint path
    pub model: String,
    /// Service root; the request path is joined onto it
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 60000,
            user_agent: format!("tabloid/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Configuration for image export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Logical page size used for layout; height is a minimum, content grows it
    pub viewport: Viewport,
    /// Linear scale applied when rasterizing (2 doubles width and height)
    pub scale: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            scale: 2,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 720,
        }
    }
}

/// A textual snapshot of a rendered page
///
/// Returned by [`view::text_snapshot`]; used for terminal output and tests.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    /// Page title
    pub title: String,
    /// Extracted text content
    pub text: String,
}

/// A source of generated documents.
///
/// `generate` takes no input: the prompt and schema are fixed. Each call is
/// one independent request; implementations do not retry or cache.
pub trait ContentService: Send {
    fn generate(&self) -> Result<GeneratedDocument>;
}

impl<S: ContentService + Sync + ?Sized> ContentService for std::sync::Arc<S> {
    fn generate(&self) -> Result<GeneratedDocument> {
        (**self).generate()
    }
}

impl<S: ContentService + ?Sized> ContentService for Box<S> {
    fn generate(&self) -> Result<GeneratedDocument> {
        (**self).generate()
    }
}

/// Create the default generation backend.
#[cfg(feature = "gemini")]
pub fn new_service(config: GeneratorConfig) -> Result<impl ContentService> {
    gemini::GeminiClient::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 60000);
        assert!(config.user_agent.starts_with("tabloid/"));
    }

    #[test]
    fn test_export_defaults() {
        let export = ExportConfig::default();
        assert_eq!(export.scale, 2);
        assert_eq!(export.viewport.width, 1024);
    }
}
