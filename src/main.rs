//! Homework status bot — binary entrypoint.
//! Checks configuration once, then polls the review API until the process is killed.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use homework_status_bot::{
    init_tracing, PollCursor, PollLoop, PracticumClient, Settings, TelegramNotifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env when present; real environment variables win.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "required configuration is missing, shutting down");
            return Err(e).context("startup configuration");
        }
    };

    let creds = &settings.credentials;
    let source = PracticumClient::new(creds.endpoint.clone(), creds.practicum_token.clone())
        .with_timeout(settings.http_timeout);
    let notifier = TelegramNotifier::new(creds.telegram_token.clone())
        .with_api_base(settings.telegram_api_base.clone())
        .with_timeout(settings.http_timeout);

    let cursor = PollCursor::new(settings.initial_from_date(Utc::now().timestamp()));
    info!(endpoint = %creds.endpoint, chat_id = %creds.chat_id, "configuration loaded");

    PollLoop::new(source, notifier, creds.chat_id.clone(), cursor)
        .with_interval(settings.retry_period)
        .run()
        .await;

    Ok(())
}
