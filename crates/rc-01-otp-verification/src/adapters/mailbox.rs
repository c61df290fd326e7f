//! Mailbox adapters.
//!
//! Neither sends real mail. [`TracingMailbox`] writes the message to the log
//! for local runs; [`ChannelMailbox`] hands it to whoever holds the receiver.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::domain::entities::MailMessage;
use crate::ports::outbound::{CodeMailbox, MailboxError};

/// Logs each message, code included. Local development only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailbox;

#[async_trait]
impl CodeMailbox for TracingMailbox {
    async fn deliver(&self, message: MailMessage) -> Result<(), MailboxError> {
        info!(
            email = %message.email,
            code = %message.code,
            issued_at = %message.issued_at.to_rfc3339(),
            "Simulated mail delivered"
        );
        Ok(())
    }
}

/// Forwards messages over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelMailbox {
    sender: mpsc::UnboundedSender<MailMessage>,
}

impl ChannelMailbox {
    /// Mailbox plus the receiving end of its inbox.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MailMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl CodeMailbox for ChannelMailbox {
    async fn deliver(&self, message: MailMessage) -> Result<(), MailboxError> {
        self.sender
            .send(message)
            .map_err(|_| MailboxError::Unavailable("inbox receiver dropped".to_string()))
    }
}
