//! # Ports Layer
//!
//! - **Inbound (Driving)**: [`inbound::OtpVerificationApi`]
//! - **Outbound (Driven)**: records, digest, mailbox, code source, clock

pub mod inbound;
pub mod outbound;
