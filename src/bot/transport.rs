//! Messaging transport used by the relay.
//!
//! The relay only needs four operations on a chat, so they sit behind
//! [`ChatTransport`]. [`TelegramTransport`] binds them to one Telegram chat.

use crate::bot::views::main_keyboard;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, MessageId, ParseMode};
use tracing::debug;

/// Outbound operations on a single chat
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send an HTML message, optionally with the navigation keyboard.
    async fn send_text(&self, text: &str, with_menu: bool) -> Result<MessageId>;

    /// Replace the text of a message sent earlier.
    ///
    /// An unchanged or already deleted message is not an error.
    async fn edit_text(&self, msg_id: MessageId, text: &str) -> Result<()>;

    /// Upload a local file as a streamable video named `file_name`.
    async fn send_video(&self, path: &Path, file_name: &str) -> Result<()>;

    /// Delete a message sent earlier.
    async fn delete_message(&self, msg_id: MessageId) -> Result<()>;
}

/// Telegram transport bound to one chat.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramTransport {
    /// Create a transport for `chat_id`.
    #[must_use]
    pub const fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

const ERROR_NOT_MODIFIED: &str = "message is not modified";
const ERROR_NOT_FOUND: &str = "message to edit not found";

/// Edit errors that only mean there was nothing to do
fn is_benign_edit_error(err_msg: &str) -> bool {
    err_msg.contains(ERROR_NOT_MODIFIED) || err_msg.contains(ERROR_NOT_FOUND)
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, text: &str, with_menu: bool) -> Result<MessageId> {
        let mut req = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html);
        if with_menu {
            req = req.reply_markup(main_keyboard());
        }
        let msg = req.await?;
        Ok(msg.id)
    }

    async fn edit_text(&self, msg_id: MessageId, text: &str) -> Result<()> {
        match self
            .bot
            .edit_message_text(self.chat_id, msg_id, text)
            .parse_mode(ParseMode::Html)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                let err_msg = e.to_string();
                if is_benign_edit_error(&err_msg) {
                    debug!("Message update skipped: {err_msg}");
                    Ok(())
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn send_video(&self, path: &Path, file_name: &str) -> Result<()> {
        let file = InputFile::file(path.to_path_buf()).file_name(file_name.to_string());
        self.bot
            .send_video(self.chat_id, file)
            .supports_streaming(true)
            .await?;
        Ok(())
    }

    async fn delete_message(&self, msg_id: MessageId) -> Result<()> {
        self.bot.delete_message(self.chat_id, msg_id).await?;
        Ok(())
    }
}
