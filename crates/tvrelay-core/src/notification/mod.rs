//! Notification delivery
//!
//! Verdicts are relayed to a single human over a messaging channel. Delivery
//! is fire-and-report: success or an error, no status tracking.

mod twilio;

pub use twilio::TwilioNotifier;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// A message ready to be delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Sender identity, e.g. `whatsapp:+14155238886`
    pub from: String,
    /// Recipient identity
    pub to: String,
    /// Message text
    pub body: String,
}

/// Sends messages through a messaging service
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &OutboundMessage) -> Result<()>;
}
