// src/anon.rs
//! Short stable ids for personal data in logs. Profile URLs are never logged raw.

use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// First 6 bytes of SHA-256, hex encoded.
pub fn anon_id(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
