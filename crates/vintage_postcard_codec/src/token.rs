// SPDX-License-Identifier: MIT OR Apache-2.0
//! Share token encoding and decoding.

use crate::error::{DecodeError, EncodeError};
use crate::record::PostcardRecord;
use crate::stamp::StampCatalog;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Query parameter that carries the token in a share link
pub const QUERY_PARAM: &str = "postcard";

/// A URL-safe share token
///
/// Tokens are a pure function of the encoded value: equal records always
/// produce equal tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Get the token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the token text
    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode this token into a record
    pub fn decode(&self) -> Result<PostcardRecord, DecodeError> {
        decode(&self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a record into a share token
pub fn encode(record: &PostcardRecord) -> Result<Token, EncodeError> {
    encode_value(record)
}

/// Encode any serializable value into a token
pub fn encode_value<T: Serialize + ?Sized>(value: &T) -> Result<Token, EncodeError> {
    let json = serde_json::to_string(value)?;
    Ok(Token(wrap(json.as_bytes())))
}

/// Encode a value, falling back to its `Debug` text when serialization fails.
///
/// The fallback token carries no record, so a viewer decoding it falls back
/// to the builder.
pub fn encode_or_fallback<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Token {
    match encode_value(value) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!("Token encoding failed, using debug text instead: {err}");
            Token(wrap(format!("{value:?}").as_bytes()))
        }
    }
}

/// Decode a share token into a record.
///
/// Every text field must be present and a stamp, if any, must match the
/// classic catalog exactly.
pub fn decode(token: &str) -> Result<PostcardRecord, DecodeError> {
    let record: PostcardRecord = decode_value(token)?;
    if let Some(stamp) = &record.stamp {
        if !StampCatalog::classic().contains(stamp) {
            return Err(DecodeError::UnknownStamp(stamp.id));
        }
    }
    Ok(record)
}

/// Decode a token into any deserializable value
pub fn decode_value<T: DeserializeOwned>(token: &str) -> Result<T, DecodeError> {
    let unescaped = urlencoding::decode(token).map_err(DecodeError::Escape)?;
    let binary = normalize_alphabet(&unescaped);
    if binary.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = URL_SAFE_NO_PAD.decode(binary.as_bytes())?;
    let text = String::from_utf8(bytes).map_err(DecodeError::Utf8)?;
    Ok(serde_json::from_str(&text)?)
}

fn wrap(bytes: &[u8]) -> String {
    let binary = URL_SAFE_NO_PAD.encode(bytes);
    urlencoding::encode(&binary).into_owned()
}

/// Accept tokens written with the standard base64 alphabet and padding
fn normalize_alphabet(binary: &str) -> String {
    binary
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}
