//! Document text to share token and back.

use std::io::{Read, Write};

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use brotli::{CompressorWriter, Decompressor};

/// Brotli quality level. Documents are small and encoding is rare, so the
/// slowest, densest setting wins.
const QUALITY: u32 = 11;
/// Brotli window size exponent.
const LG_WINDOW: u32 = 22;
const BUFFER_SIZE: usize = 4096;

/// Compress document text into a URL-fragment-safe token.
///
/// The token alphabet is `[A-Za-z0-9_-]`, so it can be embedded in a URL
/// fragment without further escaping.
#[must_use]
pub fn encode(text: &str) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(compress(text.as_bytes()))
}

/// Recover document text from a share token.
///
/// Returns `None` for anything that does not decode to a non-empty
/// document: corrupt or truncated tokens, invalid UTF-8, and the empty
/// document all collapse to an absent result. Never panics.
#[must_use]
pub fn decode(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let compressed = BASE64_URL_SAFE_NO_PAD.decode(token).ok()?;
    let bytes = decompress(&compressed)?;
    let text = String::from_utf8(bytes).ok()?;
    if text.is_empty() {
        return None;
    }
    Some(text)
}

fn compress(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut writer = CompressorWriter::new(&mut out, BUFFER_SIZE, QUALITY, LG_WINDOW);
        // Writing into a Vec cannot fail; the stream is finished on drop.
        writer.write_all(bytes).unwrap();
    }
    out
}

fn decompress(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    match Decompressor::new(bytes, BUFFER_SIZE).read_to_end(&mut out) {
        Ok(_) => Some(out),
        Err(error) => {
            tracing::debug!(%error, "share token failed to decompress");
            None
        }
    }
}
