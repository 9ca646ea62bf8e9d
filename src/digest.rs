//! SHA-256 digest computation and verification.
//!
//! The digest engine streams bytes through SHA-256 and yields the lowercase hex
//! encoding of the result. Verification is an exact string comparison: an
//! expected digest written in uppercase never matches.
//!
//! # Examples
//!
//! ```rust
//! use fetchurl::digest::{sha256_hex, verify};
//! use std::io::Cursor;
//!
//! let digest = sha256_hex(&mut Cursor::new(b"hello"))?;
//! assert_eq!(
//!     digest,
//!     "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//! );
//! assert!(verify(&digest, &digest));
//! assert!(!verify("deadbeef", &digest));
//! # Ok::<(), std::io::Error>(())
//! ```

use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Number of hex characters in a SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Hashes everything from the reader's current position to end-of-stream.
///
/// The reader is consumed; seekable sources must be rewound before they are
/// read again.
pub fn sha256_hex<R: Read + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Hashes an in-memory payload.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Returns `true` when `expected` is exactly the computed digest.
pub fn verify(expected: &str, actual: &str) -> bool {
    expected == actual
}

/// Returns `true` when `value` looks like a lowercase SHA-256 hex digest.
///
/// This is only a hint for callers; the pipeline compares whatever it is given.
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == SHA256_HEX_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
