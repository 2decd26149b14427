/// Command and text handlers
pub mod handlers;
/// Link relay pipeline
pub mod relay;
/// Dispatcher setup and polling entrypoint
pub mod runner;
/// Chat transport abstraction and its Telegram implementation
pub mod transport;
/// Keyboard, menu texts and progress messages
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use relay::{relay_video, RelayOutcome};
pub use transport::{ChatTransport, TelegramTransport};
