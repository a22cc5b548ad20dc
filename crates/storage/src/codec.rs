//! Image payload transcoder
//!
//! The synthesis service embeds its result image as base64, optionally with
//! a data-URI prefix; profile-image uploads arrive the same way. Decoding is
//! pure and side-effect-free so both call sites share it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::Result;

/// Decode a base64 image payload.
///
/// An optional `"<scheme>,<data>"` prefix is tolerated: everything up to and
/// including the first comma is stripped when present, otherwise the whole
/// string is treated as the encoded payload.
pub fn decode_image(payload: &str) -> Result<Vec<u8>> {
    let encoded = match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    };
    let bytes = BASE64.decode(encoded)?;
    Ok(bytes)
}
