use async_trait::async_trait;
use thiserror::Error;

/// What the messaging provider said about a delivery attempt. A rejection is
/// an answer, not an error: the caller downgrades it to a fallback response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderReceipt {
    Accepted { message_id: i64 },
    Rejected { description: String },
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider credentials are not configured")]
    NotConfigured,
    #[error("Transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

#[async_trait]
pub trait NotificationProvider: Send + Sync + std::fmt::Debug {
    /// Whether the provider has the credentials it needs to dispatch.
    fn is_configured(&self) -> bool;

    /// Delivers one text notification. At most one attempt; no retries.
    ///
    /// # Errors
    /// Returns `ProviderError::NotConfigured` when credentials are missing and
    /// `ProviderError::Transport` for network faults or unreadable replies.
    async fn send_text(&self, text: &str) -> Result<ProviderReceipt, ProviderError>;
}
