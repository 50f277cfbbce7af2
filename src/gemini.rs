//! Gemini backend: one `generateContent` call per request.
//!
//! The client posts the fixed prompt together with the response schema and
//! asks for `application/json` output. The reply's text parts are joined,
//! trimmed and parsed as a [`GeneratedDocument`]. Every failure (transport,
//! HTTP status, envelope, document JSON) is turned into failure text and
//! classified by [`classify_failure`]; nothing is retried.

use crate::error::classify_failure;
use crate::schema::{response_schema, PROMPT};
use crate::{ContentService, Error, GeneratedDocument, GeneratorConfig, Result};
use log::{debug, error};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

pub struct GeminiClient {
    client: Client,
    config: GeneratorConfig,
    endpoint: Url,
}

impl GeminiClient {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::ConfigError("API key is empty".into()));
        }
        let endpoint = endpoint_for(&config.base_url, &config.model)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config, endpoint })
    }

    /// Fully resolved `generateContent` URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self) -> std::result::Result<GeneratedDocument, String> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", self.config.api_key.as_str())
            .header("User-Agent", self.config.user_agent.as_str())
            .json(&request_body())
            .send()
            .map_err(|e| format!("request to {} failed: {}", self.endpoint, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| format!("failed to read response body: {}", e))?;
        if !status.is_success() {
            return Err(format!("HTTP {}: {}", status, body));
        }

        let envelope: Value =
            serde_json::from_str(&body).map_err(|e| format!("invalid response envelope: {}", e))?;
        let text = response_text(&envelope).ok_or_else(|| {
            let reason = envelope
                .pointer("/candidates/0/finishReason")
                .and_then(Value::as_str)
                .unwrap_or("none");
            format!("response carries no text payload (finishReason: {})", reason)
        })?;

        GeneratedDocument::from_json(&text).map_err(|e| format!("invalid document JSON: {}", e))
    }
}

impl ContentService for GeminiClient {
    fn generate(&self) -> Result<GeneratedDocument> {
        debug!("requesting tabloid content from {} ({})", self.endpoint, self.config.model);
        match self.request() {
            Ok(doc) => {
                debug!("generated \"{}\"", doc.main_title);
                Ok(doc)
            }
            Err(detail) => {
                error!("Error during content generation pipeline: {}", detail);
                Err(classify_failure(detail))
            }
        }
    }
}

/// Join `v1beta/models/{model}:generateContent` onto the service root.
fn endpoint_for(base_url: &str, model: &str) -> Result<Url> {
    let mut root = base_url.trim().to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    let base = Url::parse(&root)
        .map_err(|e| Error::ConfigError(format!("invalid base URL {:?}: {}", base_url, e)))?;
    base.join(&format!("v1beta/models/{}:generateContent", model))
        .map_err(|e| Error::ConfigError(format!("invalid model name {:?}: {}", model, e)))
}

/// Body of a `generateContent` request.
pub fn request_body() -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": PROMPT }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

/// Concatenated text parts of the first candidate, if there are any.
fn response_text(envelope: &Value) -> Option<String> {
    let parts = envelope.pointer("/candidates/0/content/parts")?.as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_model_path() {
        let url = endpoint_for("http://127.0.0.1:9000", "gemini-2.5-flash").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash:generateContent");

        let nested = endpoint_for("https://proxy.example/gemini", "m").unwrap();
        assert_eq!(nested.path(), "/gemini/v1beta/models/m:generateContent");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        assert!(matches!(endpoint_for("not a url", "m"), Err(Error::ConfigError(_))));
    }

    #[test]
    fn empty_key_is_rejected() {
        let res = GeminiClient::new(GeneratorConfig::default());
        assert!(matches!(res, Err(Error::ConfigError(_))));
    }

    #[test]
    fn request_body_declares_json_output() {
        let body = request_body();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(body["contents"][0]["parts"][0]["text"], PROMPT);
    }

    #[test]
    fn response_text_joins_parts() {
        let envelope = json!({
            "candidates": [{ "content": { "parts": [{ "text": " {\"a\":" }, { "text": "1} " }] } }]
        });
        assert_eq!(response_text(&envelope).unwrap(), " {\"a\":1} ");
        assert!(response_text(&json!({ "candidates": [] })).is_none());
    }
}
