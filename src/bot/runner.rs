use crate::bot::handlers::{self, Command};
use crate::config::Settings;
use crate::download::{VideoDownloader, YtDlpDownloader};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

/// Run the Telegram polling loop until Ctrl-C.
pub async fn run_bot(settings: Arc<Settings>) {
    let bot = Bot::new(settings.telegram_api_key.clone());
    let downloader = init_downloader(&settings);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![settings, downloader])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_downloader(settings: &Settings) -> Arc<dyn VideoDownloader> {
    info!(
        "Initializing yt-dlp downloader (bin: {}, max size: {} MB, title: {} chars)",
        settings.ytdlp_bin, settings.max_file_size_mb, settings.title_max_chars
    );
    Arc::new(YtDlpDownloader::new(
        settings.ytdlp_bin.clone(),
        settings.title_max_chars,
    ))
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text))
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    settings: Arc<Settings>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_command(bot, msg, cmd, settings).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    settings: Arc<Settings>,
    downloader: Arc<dyn VideoDownloader>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_text(bot, msg, settings, downloader).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}
