//! Newline-delimited JSON framing.
//!
//! A frame is a run of complete lines, each holding one JSON object. Frames
//! can be concatenated in any number and still decode to the same items,
//! which is what lets the server write chunks independently.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

/// Media type of every response body produced by the server.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Encodes `items` as one NDJSON frame, with a trailing newline.
pub fn encode_frame<T: Serialize>(items: &[T]) -> Result<Bytes, serde_json::Error> {
    let mut buf = Vec::with_capacity(items.len() * 160);
    for item in items {
        serde_json::to_writer(&mut buf, item)?;
        buf.push(b'\n');
    }
    Ok(Bytes::from(buf))
}

/// Decodes every non-blank line of `body`.
pub fn decode_lines<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, serde_json::Error> {
    body.split(|b| *b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .map(serde_json::from_slice)
        .collect()
}
