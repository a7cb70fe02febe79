//! Content type sniffing for local files
//!
//! Looks at the leading bytes of a file first and falls back to the file
//! extension for formats without a signature (plain text, CSV, JSON).

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::ContentTypeDetector,
};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// MIME type returned when nothing matches
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Number of leading bytes inspected for a signature
const SNIFF_LEN: u64 = 16;

/// Magic-byte and extension based detector
#[derive(Debug, Clone, Default)]
pub struct MagicByteDetector;

impl MagicByteDetector {
    pub fn new() -> Self {
        Self
    }

    /// Match well-known file signatures
    pub fn detect_from_bytes(data: &[u8]) -> Option<&'static str> {
        if data.len() < 4 {
            return None;
        }

        match &data[0..4] {
            // JPEG: FF D8 FF
            [0xFF, 0xD8, 0xFF, _] => Some("image/jpeg"),
            // PNG: 89 50 4E 47
            [0x89, 0x50, 0x4E, 0x47] => Some("image/png"),
            // GIF: 47 49 46 38
            [0x47, 0x49, 0x46, 0x38] => Some("image/gif"),
            // WEBP: RIFF .... WEBP
            [0x52, 0x49, 0x46, 0x46] if data.len() >= 12 && &data[8..12] == b"WEBP" => {
                Some("image/webp")
            }
            // WAV: RIFF .... WAVE
            [0x52, 0x49, 0x46, 0x46] if data.len() >= 12 && &data[8..12] == b"WAVE" => {
                Some("audio/wav")
            }
            [b'%', b'P', b'D', b'F'] => Some("application/pdf"),
            [b'P', b'K', 0x03, 0x04] => Some("application/zip"),
            [0x1F, 0x8B, _, _] => Some("application/gzip"),
            [b'I', b'D', b'3', _] => Some("audio/mpeg"),
            [b'f', b'L', b'a', b'C'] => Some("audio/flac"),
            [b'O', b'g', b'g', b'S'] => Some("audio/ogg"),
            // BMP: 42 4D, file size, two zeroed reserved words
            [0x42, 0x4D, _, _] if data.len() >= 14 && data[6..10] == [0, 0, 0, 0] => {
                Some("image/bmp")
            }
            _ if data.len() >= 8 && &data[4..8] == b"ftyp" => Some("video/mp4"),
            _ => None,
        }
    }

    /// Map a file extension to a MIME type
    pub fn detect_from_extension(path: &Path) -> Option<&'static str> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        let mime = match extension.as_str() {
            "txt" | "log" => "text/plain",
            "csv" => "text/csv",
            "json" => "application/json",
            "xml" => "application/xml",
            "html" | "htm" => "text/html",
            "md" => "text/markdown",
            "svg" => "image/svg+xml",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            _ => return None,
        };

        Some(mime)
    }
}

#[async_trait]
impl ContentTypeDetector for MagicByteDetector {
    async fn detect(&self, path: &Path) -> Result<String> {
        let file = File::open(path).await.map_err(BridgeError::Io)?;

        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        file.take(SNIFF_LEN)
            .read_to_end(&mut head)
            .await
            .map_err(BridgeError::Io)?;

        // Office documents are zip containers; the extension is more specific.
        let detected = match Self::detect_from_bytes(&head) {
            Some("application/zip") => {
                Self::detect_from_extension(path).or(Some("application/zip"))
            }
            Some(mime) => Some(mime),
            None => Self::detect_from_extension(path),
        };

        let mime = detected.unwrap_or(DEFAULT_CONTENT_TYPE);
        debug!(content_type = mime, "Detected content type");

        Ok(mime.to_string())
    }
}
