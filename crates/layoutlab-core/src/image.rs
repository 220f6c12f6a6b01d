//! Image payloads for `image` elements.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Raster format of an embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Svg,
}

impl ImageFormat {
    /// MIME type used in data URLs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Sniff the format from the leading bytes of the payload.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        let head = String::from_utf8_lossy(&data[..data.len().min(256)]);
        let head = head.trim_start();
        if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
            return Some(ImageFormat::Svg);
        }
        None
    }
}

/// Where an image element's pixels come from.
///
/// Elements store the resolved source string; bytes are folded into a
/// base64 data URL before they reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A URL or an existing data URL, used verbatim.
    Url(String),
    /// Raw file contents, e.g. from a file picker.
    Bytes {
        data: Vec<u8>,
        format: Option<ImageFormat>,
    },
}

impl ImageSource {
    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url(url.into())
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        ImageSource::Bytes {
            data: data.into(),
            format: None,
        }
    }

    /// Resolve to the string stored on the element.
    ///
    /// Byte payloads of unknown format are labelled
    /// `application/octet-stream`.
    pub fn into_source_string(self) -> String {
        match self {
            ImageSource::Url(url) => url.trim().to_string(),
            ImageSource::Bytes { data, format } => {
                let mime = format
                    .or_else(|| ImageFormat::from_magic_bytes(&data))
                    .map(|f| f.mime_type())
                    .unwrap_or("application/octet-stream");
                format!("data:{mime};base64,{}", STANDARD.encode(&data))
            }
        }
    }
}

impl From<String> for ImageSource {
    fn from(url: String) -> Self {
        ImageSource::Url(url)
    }
}

impl From<&str> for ImageSource {
    fn from(url: &str) -> Self {
        ImageSource::Url(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::from_magic_bytes(b"<svg xmlns='http://www.w3.org/2000/svg'/>"),
            Some(ImageFormat::Svg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"ab"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension(".JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn test_bytes_become_data_url() {
        let source = ImageSource::bytes(vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(source.into_source_string(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_url_passes_through() {
        let source = ImageSource::from("  https://example.com/a.png ");
        assert_eq!(source.into_source_string(), "https://example.com/a.png");
    }
}
