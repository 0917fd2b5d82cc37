//! Telegram delivery adapter: message composition and the Bot API
//! notifier.

pub mod message;
pub mod notifier;

pub use notifier::TelegramNotifier;
