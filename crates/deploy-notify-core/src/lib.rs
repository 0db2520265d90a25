//! Deploy Notify Core - message composition and settings actions.
//!
//! - **composer**: turn a finished deployment into a rich (Telegram) or plain
//!   (email/Slack/Discord) message
//! - **actions**: enable/disable enhanced notifications on a site
//! - **config**: state directory and environment file locations

pub mod actions;
pub mod composer;
pub mod config;
pub mod error;

pub use actions::{disable, enable, ActionOutcome, EnableRequest};
pub use composer::{
    compose, compose_at, compose_plain, email_subject, format_duration, local_zone, render,
    truncate,
    ChannelKind, COMMIT_MESSAGE_LIMIT, LOG_SNIPPET_LINES,
};
pub use config::{ensure_state_dir, env_file, load_env, state_dir};
pub use error::{CoreError, Result};
