//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 (hex) | One-way digest of verification codes |
//! | `compare` | `subtle` constant-time equality | Digest and access key comparison |
//!
//! The digest is never used for password storage.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compare;
pub mod errors;
pub mod hashing;

// Re-exports
pub use compare::constant_time_eq;
pub use errors::CryptoError;
pub use hashing::{sha256_hex, HexDigest, Sha256Hasher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
