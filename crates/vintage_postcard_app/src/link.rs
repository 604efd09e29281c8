// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shareable postcard links.
//!
//! A link has the shape `<origin><path>?postcard=<token>`, with the token
//! percent-encoded once more for embedding. Opening a link reverses that:
//! standard query parsing, one extra percent-decode, then the codec.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use url::Url;
use vintage_postcard_codec::{PostcardRecord, Token, QUERY_PARAM};

/// Where share links point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Scheme, host and port, e.g. `https://postcards.example`
    pub origin: String,
    /// Path of the viewer page
    pub path: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5173".to_string(),
            path: "/".to_string(),
        }
    }
}

impl LinkConfig {
    /// Base URL without a query string
    pub fn base_url(&self) -> String {
        let origin = self.origin.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{origin}{}", self.path)
        } else {
            format!("{origin}/{}", self.path)
        }
    }
}

/// Builds and opens share links
pub struct ShareLink;

impl ShareLink {
    /// Encode a record into a complete share link
    pub fn build(config: &LinkConfig, record: &PostcardRecord) -> Result<String> {
        let token = vintage_postcard_codec::encode(record)?;
        let link = Self::for_token(config, &token);
        tracing::info!("Share link created ({} bytes)", link.len());
        Ok(link)
    }

    /// Share link that never fails; an unencodable record yields a token
    /// the viewer will reject
    pub fn build_lossy(config: &LinkConfig, record: &PostcardRecord) -> String {
        let token = vintage_postcard_codec::encode_or_fallback(record);
        Self::for_token(config, &token)
    }

    /// Share link for an already encoded token
    pub fn for_token(config: &LinkConfig, token: &Token) -> String {
        format!(
            "{}?{}={}",
            config.base_url(),
            QUERY_PARAM,
            urlencoding::encode(token.as_str())
        )
    }

    /// Extract the token from a link, if it carries one
    pub fn parse(link: &str) -> Result<Option<String>> {
        let url = Url::parse(link).map_err(|e| AppError::InvalidLink(e.to_string()))?;
        let Some(raw) = url
            .query_pairs()
            .find(|(key, _)| key == QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
        else {
            return Ok(None);
        };

        let token = urlencoding::decode(&raw)
            .map_err(|e| AppError::InvalidLink(e.to_string()))?
            .into_owned();
        Ok(Some(token))
    }

    /// Decode the postcard carried by a link.
    ///
    /// Returns `Ok(None)` when the link has no postcard parameter.
    pub fn open(link: &str) -> Result<Option<PostcardRecord>> {
        match Self::parse(link)? {
            Some(token) => Ok(Some(vintage_postcard_codec::decode(&token)?)),
            None => Ok(None),
        }
    }
}
