//! # OTP Verification Subsystem (RC-01)
//!
//! Issues six-digit one-time passcodes per email, stores only their digest,
//! and validates candidates under expiry, resend-cooldown and attempt
//! limits.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Records, state rules, configuration
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Adapters Layer** (`adapters/`): Key-value record store, SHA-256 digest, mailboxes, clocks
//! - **Service Layer** (`service.rs`): Wires domain rules to ports
//!
//! ## Security Notes
//!
//! - The plaintext code exists only in the [`MailMessage`] handed to the mailbox
//! - Candidate digests are compared in constant time
//! - Records are shared by every context over the same store and are not
//!   locked between read and write; two contexts verifying the same email at
//!   once can lose an attempt increment

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    ChannelMailbox, KvOtpRecordStore, ManualTimeSource, RandomCodeGenerator, Sha256CodeDigest,
    SystemTimeSource, TracingMailbox,
};
pub use domain::config::OtpConfig;
pub use domain::entities::{
    IssueReceipt, MailMessage, OtpRecord, VerificationState, CODE_MAX, CODE_MIN,
};
pub use domain::errors::{ConfigError, OtpError};
pub use ports::inbound::OtpVerificationApi;
pub use ports::outbound::{
    CodeDigest, CodeGenerator, CodeMailbox, MailboxError, OtpRecordStore, TimeSource,
};
pub use service::OtpVerificationService;
