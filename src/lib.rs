// src/lib.rs
// Library surface shared by the binaries and the integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod poller;
pub mod status;

// ---- Re-exports for the common entry points ----
pub use crate::api::{HomeworkSource, PracticumClient};
pub use crate::config::Settings;
pub use crate::error::BotError;
pub use crate::notify::{NotificationGate, Notifier, TelegramNotifier};
pub use crate::poller::{CycleOutcome, LoopState, PollCursor, PollLoop};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
/// `RUST_LOG` overrides the default `info` filter; `LOG_FORMAT=json` switches
/// to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}
