//! Relay UI components
//!
//! Contains the reply keyboard, the static menu texts and the progress
//! messages shown while a link is being relayed.

use crate::error::RelayError;
use crate::utils::escape_html;
use teloxide::types::{KeyboardButton, KeyboardMarkup};

// ─────────────────────────────────────────────────────────────────────────────
// Keyboard
// ─────────────────────────────────────────────────────────────────────────────

/// Help button label
pub const BTN_HELP: &str = "ℹ️ Помощь";
/// Platform list button label
pub const BTN_PLATFORMS: &str = "📱 Платформы";
/// "Send a link" prompt button label
pub const BTN_SEND_LINK: &str = "🔗 Отправить ссылку";

const INPUT_PLACEHOLDER: &str = "Вставь ссылку на видео или выбери действие 👇";

/// Navigation keyboard attached to every static reply
#[must_use]
pub fn main_keyboard() -> KeyboardMarkup {
    let keyboard = vec![
        vec![KeyboardButton::new(BTN_HELP), KeyboardButton::new(BTN_PLATFORMS)],
        vec![KeyboardButton::new(BTN_SEND_LINK)],
    ];
    KeyboardMarkup::new(keyboard)
        .resize_keyboard()
        .input_field_placeholder(INPUT_PLACEHOLDER)
}

// ─────────────────────────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────────────────────────

/// Static informational replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Greeting for `/start`
    Welcome,
    /// Usage instructions and limits
    Help,
    /// Supported platforms
    Platforms,
    /// Prompt with example links
    SendLink,
}

/// Exact button label → menu item
const MENU_BUTTONS: &[(&str, MenuItem)] = &[
    (BTN_HELP, MenuItem::Help),
    (BTN_PLATFORMS, MenuItem::Platforms),
    (BTN_SEND_LINK, MenuItem::SendLink),
];

/// Look up the menu item for a button label. Only exact matches count.
#[must_use]
pub fn menu_item_for_label(text: &str) -> Option<MenuItem> {
    MENU_BUTTONS
        .iter()
        .find(|(label, _)| *label == text)
        .map(|(_, item)| *item)
}

impl MenuItem {
    /// HTML text of the reply; `limit_mb` is the current upload limit
    #[must_use]
    pub fn text(self, limit_mb: f64) -> String {
        match self {
            Self::Welcome => "👋 Привет! Я скачиваю видео из соцсетей.\n\n\
                 📌 Просто отправь мне ссылку на видео с YouTube, X/Twitter и других платформ.\n\
                 Или используй кнопки ниже для навигации."
                .to_string(),
            Self::Help => format!(
                "ℹ️ <b>Как пользоваться:</b>\n\
                 1. Отправь ссылку на видео (например, с YouTube или X)\n\
                 2. Подожди 10–60 секунд\n\
                 3. Получи видео в чат!\n\n\
                 ⚠️ Ограничения:\n\
                 • Макс. размер: {limit_mb} МБ (лимит Telegram)\n\
                 • Только публичные видео"
            ),
            Self::Platforms => "📱 <b>Поддерживаемые платформы:</b>\n\
                 • 📺 YouTube\n\
                 • 🐦 X / Twitter\n\
                 • 📸 Instagram\n\
                 • 🎵 TikTok\n\
                 • 🆙 VK\n\
                 • ▶️ Rutube\n\
                 • 📰 Дзен"
                .to_string(),
            Self::SendLink => "📎 Вставь ссылку на видео ниже 👇\n\
                 Примеры:\n\
                 <code>https://youtube.com/watch?v=abc123</code>\n\
                 <code>https://twitter.com/user/status/1234567890</code>"
                .to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Relay progress
// ─────────────────────────────────────────────────────────────────────────────

/// Acknowledgement sent before the download starts
pub const DOWNLOADING: &str = "📥 Скачиваю видео... ⏳";
/// Progress text while uploading
pub const SENDING: &str = "📤 Отправляю...";

const SUPPORTED_PLATFORMS_LINE: &str =
    "Поддерживаются: YouTube, X/Twitter, Instagram, TikTok, VK, Rutube, Дзен.";

/// Reply to a link that failed validation
#[must_use]
pub fn rejection_message(err: &RelayError) -> String {
    format!(
        "❌ {}\n\n{SUPPORTED_PLATFORMS_LINE}",
        escape_html(&err.to_string())
    )
}

/// Notice for a file over the upload limit
#[must_use]
pub fn too_large_message(size_mb: f64, limit_mb: f64) -> String {
    format!("⚠️ Видео слишком большое ({size_mb:.1} МБ).\nЛимит Telegram: {limit_mb} МБ.")
}

/// Notice for a failed download or upload
#[must_use]
pub fn error_message(err: &RelayError) -> String {
    format!("❌ Ошибка: {}", escape_html(&err.to_string()))
}

/// Attachment name for an uploaded video
#[must_use]
pub fn video_file_name(title: &str) -> String {
    format!("{title}.mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_layout() {
        let kb = main_keyboard();
        let labels: Vec<Vec<&str>> = kb
            .keyboard
            .iter()
            .map(|row| row.iter().map(|b| b.text.as_str()).collect())
            .collect();
        assert_eq!(labels, vec![vec![BTN_HELP, BTN_PLATFORMS], vec![BTN_SEND_LINK]]);
    }

    #[test]
    fn test_menu_lookup_is_exact() {
        assert_eq!(menu_item_for_label("ℹ️ Помощь"), Some(MenuItem::Help));
        assert_eq!(menu_item_for_label(BTN_PLATFORMS), Some(MenuItem::Platforms));
        assert_eq!(menu_item_for_label(BTN_SEND_LINK), Some(MenuItem::SendLink));
        assert_eq!(menu_item_for_label("Помощь"), None);
        assert_eq!(menu_item_for_label(" ℹ️ Помощь"), None);
        assert_eq!(menu_item_for_label("https://youtu.be/abc123"), None);
    }

    #[test]
    fn test_help_mentions_limit() {
        assert!(MenuItem::Help.text(50.0).contains("50 МБ"));
        assert!(MenuItem::Help.text(20.0).contains("20 МБ"));
    }

    #[test]
    fn test_rejection_names_domain_and_platforms() {
        let text = rejection_message(&RelayError::UnsupportedDomain("example.com".to_string()));
        assert!(text.contains("example.com"));
        assert!(text.contains("Поддерживаются"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let text = error_message(&RelayError::DownloadFailed("<b>boom</b>".to_string()));
        assert!(text.contains("&lt;b&gt;boom&lt;/b&gt;"));
    }

    #[test]
    fn test_too_large_message() {
        assert_eq!(
            too_large_message(61.04, 50.0),
            "⚠️ Видео слишком большое (61.0 МБ).\nЛимит Telegram: 50 МБ."
        );
    }

    #[test]
    fn test_video_file_name() {
        assert_eq!(video_file_name("Cat"), "Cat.mp4");
    }
}
