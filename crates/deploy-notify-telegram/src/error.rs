//! Error types for the notification plugin.

use thiserror::Error;

/// Errors that can occur while configuring or delivering notifications.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Target chat not provided.
    #[error("Telegram chat not set. Set TELEGRAM_CHAT_ID environment variable.")]
    NoChatId,

    /// Target chat is not a numeric id.
    #[error("Invalid TELEGRAM_CHAT_ID: {0}")]
    InvalidChatId(String),

    /// `TELEGRAM_API_URL` is not a URL.
    #[error("Invalid TELEGRAM_API_URL: {0}")]
    InvalidApiUrl(String),

    /// A channel rejected a message.
    #[error("Failed to send via {channel}: {reason}")]
    SendFailed { channel: String, reason: String },

    /// Listener registration failed.
    #[error("Listener error: {0}")]
    Listener(String),

    /// Invalid settings.
    #[error(transparent)]
    Settings(#[from] deploy_notify_core::CoreError),

    /// Site or deployment storage error.
    #[error(transparent)]
    Persistence(#[from] deploy_notify_persistence::PersistenceError),

    /// Event bus error.
    #[error(transparent)]
    Event(#[from] deploy_notify_events::EventError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
