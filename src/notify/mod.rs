// src/notify/mod.rs
pub mod gate;
pub mod telegram;

use anyhow::Result;

pub use gate::NotificationGate;
pub use telegram::TelegramNotifier;

/// A channel that delivers plain-text messages to a recipient.
/// Errors are returned to the caller, which decides how to log them.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}
