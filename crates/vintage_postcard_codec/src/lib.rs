// SPDX-License-Identifier: MIT OR Apache-2.0
//! Postcard record model and share token codec for Vintage Postcard.
//!
//! This crate owns everything that travels inside a share link:
//! - The postcard record (photo, message, names, stamp)
//! - The classic stamp catalog
//! - Token encoding and decoding
//!
//! ## Token format
//!
//! A token is built in three layers, and decoded in reverse:
//! - Canonical JSON of the record
//! - URL-safe base64 (no padding) over the UTF-8 bytes
//! - A percent-escaping pass for query-value embedding
//!
//! The URL-safe alphabet never produces `&`, `=`, `%`, `+` or `/`, so the
//! escaping pass leaves conforming tokens untouched and an extra
//! percent-decode by a receiving URL parser is harmless.

pub mod error;
pub mod record;
pub mod stamp;
pub mod token;

pub use error::{DecodeError, EncodeError};
pub use record::{PostcardRecord, MESSAGE_PREVIEW_CHARS, MESSAGE_SOFT_LIMIT};
pub use stamp::{Stamp, StampCatalog};
pub use token::{decode, decode_value, encode, encode_or_fallback, encode_value, Token, QUERY_PARAM};
