//! Telegram delivery through the Bot API.

use async_trait::async_trait;
use deploy_notify_core::ChannelKind;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info};
use url::Url;

use crate::channel::{NotificationChannel, OutgoingMessage};
use crate::error::{NotifyError, Result};

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the target chat id.
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Optional environment variable pointing at a self-hosted Bot API server.
pub const API_URL_ENV: &str = "TELEGRAM_API_URL";

/// Sends rich deployment messages to one Telegram chat.
pub struct TelegramChannel {
    /// The teloxide bot instance.
    bot: Bot,
    /// Chat that receives notifications.
    chat_id: ChatId,
}

impl TelegramChannel {
    /// Creates a channel for an explicit token and chat.
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }

    /// Creates a channel from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`,
    /// honoring `TELEGRAM_API_URL` when set.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV).map_err(|_| NotifyError::NoToken)?;
        let raw_chat = std::env::var(CHAT_ID_ENV).map_err(|_| NotifyError::NoChatId)?;
        let chat_id = parse_chat_id(&raw_chat)?;

        let channel = Self::new(token, chat_id);
        match std::env::var(API_URL_ENV) {
            Ok(raw) => Ok(channel.with_api_url(parse_api_url(&raw)?)),
            Err(_) => Ok(channel),
        }
    }

    /// Sends through a different Bot API server.
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// Get the bot's username. Fails if the token is rejected or the API
    /// is unreachable.
    pub async fn get_me(&self) -> Result<String> {
        let me = self.bot.get_me().await.map_err(|e| NotifyError::SendFailed {
            channel: "telegram".to_string(),
            reason: e.to_string(),
        })?;
        Ok(me.username().to_string())
    }

    /// Chat notifications are sent to.
    pub fn chat_id(&self) -> i64 {
        self.chat_id.0
    }
}

fn parse_chat_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| NotifyError::InvalidChatId(raw.to_string()))
}

fn parse_api_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| NotifyError::InvalidApiUrl(format!("{}: {}", raw, e)))
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Telegram
    }

    // Messages use `*bold*`/`_italic_` markers, which only the legacy
    // Markdown mode understands without escaping.
    #[allow(deprecated)]
    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        debug!(chat_id = self.chat_id.0, len = message.body.len(), "Sending Telegram message");

        self.bot
            .send_message(self.chat_id, &message.body)
            .parse_mode(ParseMode::Markdown)
            .await
            .map_err(|e| NotifyError::SendFailed {
                channel: "telegram".to_string(),
                reason: e.to_string(),
            })?;

        info!(chat_id = self.chat_id.0, "Telegram notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_id() {
        assert_eq!(parse_chat_id("12345").unwrap(), 12345);
        assert_eq!(parse_chat_id(" -100987 ").unwrap(), -100987);
        assert!(matches!(
            parse_chat_id("@channel"),
            Err(NotifyError::InvalidChatId(_))
        ));
    }

    #[test]
    fn test_parse_api_url() {
        let url = parse_api_url(" http://localhost:8081 ").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert!(matches!(
            parse_api_url("not a url"),
            Err(NotifyError::InvalidApiUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_get_me_reports_unreachable_api() {
        let channel = TelegramChannel::new("123:abc", 42)
            .with_api_url(Url::parse("http://127.0.0.1:9").unwrap());

        let err = channel.get_me().await.unwrap_err();
        assert!(matches!(err, NotifyError::SendFailed { ref channel, .. } if channel == "telegram"));
    }

    #[test]
    fn test_channel_metadata() {
        let channel = TelegramChannel::new("123:abc", 42);
        assert_eq!(channel.chat_id(), 42);
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.kind(), ChannelKind::Telegram);
    }
}
