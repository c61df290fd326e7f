//! # SHA-256 Hashing
//!
//! Digests are rendered as 64 lowercase hex characters, the same text the
//! browser's `crypto.subtle.digest` path produced, so records written by
//! either side compare equal.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::compare::constant_time_eq;
use crate::errors::CryptoError;

/// Length of a rendered digest.
pub const HEX_DIGEST_LEN: usize = 64;

/// A SHA-256 digest in lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    /// Borrow the hex text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare with another digest without early exit.
    #[must_use]
    pub fn ct_matches(&self, other: &HexDigest) -> bool {
        constant_time_eq(self.0.as_bytes(), other.0.as_bytes())
    }

    /// Unwrap into the hex text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Enough to tell digests apart in logs.
        write!(f, "HexDigest({}..)", &self.0[..self.0.len().min(8)])
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexDigest {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == HEX_DIGEST_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(CryptoError::InvalidDigest(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

/// Stateful SHA-256 hasher.
#[derive(Default)]
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Create new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return the hex digest.
    #[must_use]
    pub fn finalize(self) -> HexDigest {
        HexDigest(hex::encode(self.inner.finalize()))
    }
}

/// Hash UTF-8 text with SHA-256 (one-shot).
#[must_use]
pub fn sha256_hex(text: &str) -> HexDigest {
    let mut hasher = Sha256Hasher::new();
    hasher.update(text.as_bytes());
    hasher.finalize()
}
