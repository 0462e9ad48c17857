//! Sends one test message with the configured bot token and chat id, then exits.

use anyhow::{Context, Result};
use homework_status_bot::{init_tracing, Notifier, Settings, TelegramNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env().context("startup configuration")?;
    let notifier = TelegramNotifier::new(settings.credentials.telegram_token.clone())
        .with_api_base(settings.telegram_api_base.clone())
        .with_timeout(settings.http_timeout);

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Бот проверки домашних работ на связи.".to_string());
    notifier
        .send(&settings.credentials.chat_id, &text)
        .await
        .context("send probe message")?;

    println!("notify-probe done");
    Ok(())
}
