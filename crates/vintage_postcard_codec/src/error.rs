// SPDX-License-Identifier: MIT OR Apache-2.0
//! Codec error types.

use std::string::FromUtf8Error;
use thiserror::Error;

/// Error when a token cannot be turned back into a record
///
/// Callers treat every variant the same way: no record is available.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token was empty
    #[error("Token is empty")]
    Empty,

    /// The percent-escaping layer did not decode to UTF-8
    #[error("Token escape sequence is invalid: {0}")]
    Escape(#[source] FromUtf8Error),

    /// The binary layer is not valid base64
    #[error("Token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not UTF-8 text
    #[error("Token payload is not UTF-8: {0}")]
    Utf8(#[source] FromUtf8Error),

    /// The text does not describe a postcard
    #[error("Token payload is not a postcard: {0}")]
    Json(#[from] serde_json::Error),

    /// The postcard carries a stamp that is not in the catalog
    #[error("Token carries an unknown stamp: {0}")]
    UnknownStamp(u32),
}

/// Error when a value cannot be serialized into a token
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Serialization failed
    #[error("Postcard could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}
