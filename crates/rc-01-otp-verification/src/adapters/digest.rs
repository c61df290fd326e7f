use shared_crypto::{sha256_hex, HexDigest};

use crate::ports::outbound::CodeDigest;

/// SHA-256 over the UTF-8 code, lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CodeDigest;

impl CodeDigest for Sha256CodeDigest {
    fn digest(&self, code: &str) -> HexDigest {
        sha256_hex(code)
    }
}
