//! # Red Connect Test Suite
//!
//! Cross-crate integration flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs            # Shared builders (OTP harness, users)
//! └── integration/
//!     ├── otp_flows.rs         # Cooldown, single use, lockout, expiry, mailbox
//!     ├── relay_flows.rs       # Fan-out, unsubscribe, GLOBAL_SOS
//!     ├── onboarding_flows.rs  # Sign-in and registration through the runtime
//!     ├── sos_flows.rs         # SOS broadcast, notifications, matching
//!     └── known_limitations.rs # Documented, unhardened behaviour
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rc-tests
//! cargo test -p rc-tests integration::otp_flows
//! ```

#![allow(dead_code)]

pub mod fixtures;
