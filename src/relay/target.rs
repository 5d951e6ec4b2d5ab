//! Destinations for relayed messages.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{trace, warn};

use crate::core::RelayedMessage;
use crate::error::{RelayError, Result};

/// A side of the bridge that accepts relayed messages.
///
/// Implementations wrap a chat client; sends may suspend on the network.
#[async_trait]
pub trait RelayTarget: Send + Sync {
    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    async fn send(&self, message: &RelayedMessage) -> Result<()>;
}

/// Sends `messages` in order, stopping at the first failure.
///
/// Returns the number of messages sent.
///
/// # Errors
///
/// Returns [`RelayError::SendFailed`] carrying the index of the message
/// that failed. Messages after it are not attempted.
pub async fn dispatch<T>(target: &T, messages: &[RelayedMessage]) -> Result<usize>
where
    T: RelayTarget + ?Sized,
{
    for (index, message) in messages.iter().enumerate() {
        if let Err(e) = target.send(message).await {
            warn!(index, error = %e, "relay send failed");
            return Err(RelayError::SendFailed {
                index,
                reason: e.to_string(),
            }
            .into());
        }
        trace!(index, bytes = message.content.len(), "segment sent");
    }
    Ok(messages.len())
}

/// Target that records every message it receives.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    sent: Mutex<Vec<RelayedMessage>>,
}

impl MemoryTarget {
    /// Creates an empty target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages received so far, in order.
    pub async fn sent(&self) -> Vec<RelayedMessage> {
        self.sent.lock().await.clone()
    }

    /// Consumes the target, returning the messages it received.
    #[must_use]
    pub fn into_sent(self) -> Vec<RelayedMessage> {
        self.sent.into_inner()
    }
}

#[async_trait]
impl RelayTarget for MemoryTarget {
    async fn send(&self, message: &RelayedMessage) -> Result<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
