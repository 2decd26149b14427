//! Command and text handlers
//!
//! Commands and menu buttons get a static reply; any other text is treated
//! as a link and handed to the relay.

use crate::bot::relay::{relay_video, RelayOutcome};
use crate::bot::transport::{ChatTransport, TelegramTransport};
use crate::bot::views::{menu_item_for_label, MenuItem};
use crate::config::Settings;
use crate::download::VideoDownloader;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

// Doc comments double as the command descriptions shown in the Telegram menu
/// Поддерживаемые команды:
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Начать работу.
    Start,
    /// Как пользоваться ботом.
    Help,
    /// Поддерживаемые платформы.
    Platforms,
}

impl Command {
    /// Menu item answering this command
    #[must_use]
    pub const fn menu_item(&self) -> MenuItem {
        match self {
            Self::Start => MenuItem::Welcome,
            Self::Help => MenuItem::Help,
            Self::Platforms => MenuItem::Platforms,
        }
    }
}

/// What to do with an inbound text
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// Static reply, the relay never starts
    Menu(MenuItem),
    /// Treat as a link
    Relay(&'a str),
}

/// Route a text message: exact button labels first, everything else is a link.
#[must_use]
pub fn route_text(text: &str) -> Route<'_> {
    menu_item_for_label(text).map_or(Route::Relay(text), Route::Menu)
}

/// Send the static reply for `item` with the navigation keyboard.
///
/// # Errors
///
/// Returns an error if the message cannot be sent.
pub async fn send_menu<T>(transport: &T, item: MenuItem, settings: &Settings) -> Result<()>
where
    T: ChatTransport + ?Sized,
{
    transport
        .send_text(&item.text(settings.max_file_size_mb), true)
        .await?;
    Ok(())
}

/// Handle a recognized command.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    settings: Arc<Settings>,
) -> Result<()> {
    debug!(chat_id = msg.chat.id.0, command = ?cmd, "Command received");
    let transport = TelegramTransport::new(bot, msg.chat.id);
    send_menu(&transport, cmd.menu_item(), &settings).await
}

/// Handle a plain text message.
///
/// Menu buttons are answered inline. Links are relayed on a separate task so
/// the dispatcher keeps serving the chat while the download runs.
///
/// # Errors
///
/// Returns an error if a menu reply cannot be sent.
pub async fn handle_text(
    bot: Bot,
    msg: Message,
    settings: Arc<Settings>,
    downloader: Arc<dyn VideoDownloader>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let transport = TelegramTransport::new(bot, msg.chat.id);

    match route_text(text) {
        Route::Menu(item) => send_menu(&transport, item, &settings).await,
        Route::Relay(link) => {
            let link = link.to_string();
            let chat_id = msg.chat.id.0;
            tokio::spawn(async move {
                let outcome = relay_video(&transport, downloader, &settings, &link).await;
                match outcome {
                    RelayOutcome::Delivered => info!(chat_id = chat_id, "Relay delivered"),
                    RelayOutcome::Rejected(e) | RelayOutcome::Failed(e) if e.is_rejection() => {
                        debug!(chat_id = chat_id, error = %e, "Relay rejected");
                    }
                    RelayOutcome::Rejected(e) | RelayOutcome::Failed(e) => {
                        warn!(chat_id = chat_id, error = %e, "Relay failed");
                    }
                }
            });
            Ok(())
        }
    }
}
