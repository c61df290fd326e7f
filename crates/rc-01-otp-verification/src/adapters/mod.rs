//! # Adapters
//!
//! Infrastructure implementations of the outbound ports.

pub mod digest;
pub mod generator;
pub mod mailbox;
pub mod record_store;
pub mod time;

pub use digest::Sha256CodeDigest;
pub use generator::RandomCodeGenerator;
pub use mailbox::{ChannelMailbox, TracingMailbox};
pub use record_store::KvOtpRecordStore;
pub use time::{ManualTimeSource, SystemTimeSource};
