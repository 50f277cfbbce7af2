//! Rendering pipeline for exports: layout, paint, raster.

pub mod layout;
pub mod paint;
pub mod path;
pub mod raster;

use crate::view::ResultView;
use crate::{Error, ExportConfig, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A rasterized image of a result view
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    /// `data:image/png;base64,...` form handed to download sinks.
    pub fn to_data_url(&self) -> String {
        format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(&self.png_data))
    }

    /// Hex SHA-256 of the PNG bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

/// Decode a base64 `data:` URL into its payload bytes.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::ExportError("not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::ExportError("data URL has no payload".into()))?;
    if !meta.ends_with(";base64") {
        return Err(Error::ExportError(format!("unsupported data URL encoding {:?}", meta)));
    }
    STANDARD
        .decode(payload)
        .map_err(|e| Error::ExportError(format!("invalid base64 payload: {}", e)))
}

/// Lay out, paint and rasterize `view` with the export settings.
pub fn render_png(view: &ResultView, config: &ExportConfig) -> Result<Screenshot> {
    let tree = layout::layout_result(view, config.viewport);
    let commands = paint::paint(&tree);
    raster::rasterize(&commands, tree.width, tree.height, config.scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trips() {
        let shot = Screenshot { width: 1, height: 1, png_data: vec![1, 2, 3, 250] };
        let url = shot.to_data_url();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
        assert_eq!(decode_data_url(&url).unwrap(), vec![1, 2, 3, 250]);
    }

    #[test]
    fn rejects_non_base64_urls() {
        assert!(decode_data_url("http://example.com").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }

    #[test]
    fn digest_is_stable_hex() {
        let shot = Screenshot { width: 0, height: 0, png_data: Vec::new() };
        assert_eq!(shot.digest(), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }
}
