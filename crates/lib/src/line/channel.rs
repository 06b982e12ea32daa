//! Outbound reply seam: anything that can answer a reply token with messages.

use crate::line::message::Message;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("line request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("line api error: {0}")]
    Api(String),
}

/// Sends reply messages correlated to an inbound event's reply token.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    /// Reply with one or more messages (the platform allows up to five per call).
    async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> Result<(), LineError>;
}
