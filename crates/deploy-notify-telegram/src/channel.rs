//! Notification channel abstraction.
//!
//! A channel delivers an [`OutgoingMessage`] somewhere. Its [`ChannelKind`]
//! decides whether it receives the rich Markdown message or the plain
//! one-line summary.

use std::sync::Mutex;

use async_trait::async_trait;
use deploy_notify_core::ChannelKind;

use crate::error::Result;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Subject line, used by channels that have one (email).
    pub subject: String,
    /// Message text, rich or plain depending on the channel.
    pub body: String,
}

/// Something that can deliver deployment notifications.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Rendering expected by this channel.
    fn kind(&self) -> ChannelKind;

    /// Delivers one message.
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;
}

/// Channel that keeps every message in memory.
///
/// Handy for previews and for hosts that forward messages themselves.
pub struct MemoryChannel {
    name: String,
    kind: ChannelKind,
    sent: Mutex<Vec<OutgoingMessage>>,
}

impl MemoryChannel {
    /// Creates an empty channel of the given kind.
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages delivered so far, oldest first.
    pub fn messages(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Number of messages delivered so far.
    pub fn len(&self) -> usize {
        self.sent.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// True if nothing was delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}

/// Channel that prints messages to stdout, used when no bot is configured.
pub struct StdoutChannel {
    kind: ChannelKind,
}

impl StdoutChannel {
    /// Prints messages rendered for `kind`.
    pub fn new(kind: ChannelKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl NotificationChannel for StdoutChannel {
    fn name(&self) -> &str {
        "stdout"
    }

    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        println!("{}\n", message.body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> OutgoingMessage {
        OutgoingMessage {
            subject: "Deployment Completed - example.com".to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_channel_records_in_order() {
        let channel = MemoryChannel::new("test", ChannelKind::Slack);
        assert!(channel.is_empty());

        channel.send(&message("first")).await.unwrap();
        channel.send(&message("second")).await.unwrap();

        let bodies: Vec<_> = channel.messages().into_iter().map(|m| m.body).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(channel.kind(), ChannelKind::Slack);
        assert_eq!(channel.name(), "test");
    }

    #[tokio::test]
    async fn test_stdout_channel_accepts_messages() {
        let channel = StdoutChannel::new(ChannelKind::Telegram);
        assert!(channel.send(&message("hello")).await.is_ok());
        assert!(channel.kind().is_rich());
    }
}
