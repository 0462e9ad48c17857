// src/error.rs
use thiserror::Error;

/// Everything that can go wrong between startup and the end of a poll cycle.
///
/// Only `ConfigMissing` is fatal; all other variants are per-cycle and the
/// loop recovers from them on the next tick.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("missing required environment variable {0}")]
    ConfigMissing(&'static str),

    #[error("endpoint {endpoint} is unreachable: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("endpoint {endpoint} is unavailable, API response code: {status}")]
    InvalidResponseCode { endpoint: String, status: u16 },

    #[error("unexpected API response: {0}")]
    Schema(String),

    #[error("API response has no `homeworks` key")]
    EmptyResponse,

    #[error("homework record has no `{0}` key")]
    MissingField(&'static str),

    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),
}

pub type Result<T, E = BotError> = std::result::Result<T, E>;

impl BotError {
    /// Stable label for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::ConfigMissing(_) => "config_missing",
            BotError::Transport { .. } => "transport",
            BotError::InvalidResponseCode { .. } => "invalid_response_code",
            BotError::Schema(_) => "schema",
            BotError::EmptyResponse => "empty_response",
            BotError::MissingField(_) => "missing_field",
            BotError::UnknownStatus(_) => "unknown_status",
        }
    }

    /// Quiet errors are logged but never turned into a user notification.
    pub fn is_quiet(&self) -> bool {
        matches!(self, BotError::EmptyResponse)
    }

    /// Text delivered to the chat when a cycle fails.
    pub fn failure_message(&self) -> String {
        format!("Сбой в работе программы: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_empty_response_is_quiet() {
        assert!(BotError::EmptyResponse.is_quiet());
        assert!(!BotError::Schema("x".into()).is_quiet());
        assert!(!BotError::MissingField("status").is_quiet());
        assert!(!BotError::UnknownStatus("done".into()).is_quiet());
    }

    #[test]
    fn failure_message_embeds_error_text() {
        let err = BotError::InvalidResponseCode {
            endpoint: "http://api.local/".into(),
            status: 503,
        };
        let msg = err.failure_message();
        assert!(msg.starts_with("Сбой в работе программы: "));
        assert!(msg.contains("503"), "{msg}");
        assert!(msg.contains("http://api.local/"), "{msg}");
    }

    #[test]
    fn identical_errors_render_identically() {
        let a = BotError::UnknownStatus("done".into()).failure_message();
        let b = BotError::UnknownStatus("done".into()).failure_message();
        assert_eq!(a, b);
    }
}
