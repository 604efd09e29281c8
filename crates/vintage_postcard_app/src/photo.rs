// SPDX-License-Identifier: MIT OR Apache-2.0
//! Photo intake for the first builder step.
//!
//! A photo is either an external `http`/`https` URL or an image embedded as a
//! `data:` URI.

use crate::error::{AppError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Whether a photo value is an embedded data URI
pub fn is_data_uri(photo: &str) -> bool {
    photo.starts_with("data:image/")
}

/// Embed image bytes as a data URI
pub fn from_bytes(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes)
        .map_err(|e| AppError::Photo(format!("not a supported image: {e}")))?;
    let mime = format.to_mime_type();
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Read an image file and embed it as a data URI
pub fn from_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let photo = from_bytes(&bytes)?;
    tracing::debug!("Loaded photo {:?} ({} bytes)", path, bytes.len());
    Ok(photo)
}

/// Accept an external photo URL
pub fn from_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let url = url::Url::parse(trimmed).map_err(|e| AppError::Photo(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(AppError::Photo(format!("unsupported URL scheme: {other}"))),
    }
}

/// Interpret user input as a data URI, a URL, or a file path
pub fn resolve(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if is_data_uri(trimmed) {
        Ok(trimmed.to_string())
    } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        from_url(trimmed)
    } else {
        from_file(Path::new(trimmed))
    }
}
