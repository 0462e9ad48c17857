// src/config.rs
//! Startup settings read from the environment (`.env` is loaded by `main`).

use std::fmt;
use std::time::Duration;

use crate::api::DEFAULT_ENDPOINT;
use crate::error::{BotError, Result};
use crate::notify::telegram::DEFAULT_API_BASE;
use crate::poller::DEFAULT_INTERVAL;

pub const ENV_PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Secrets and addresses; fixed for the lifetime of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
    pub endpoint: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FromDate {
    At(i64),
    /// Resolved against the wall clock at startup.
    Now,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub retry_period: Duration,
    pub http_timeout: Duration,
    pub from_date: FromDate,
    pub telegram_api_base: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Required keys are checked in a
    /// fixed order and the first missing one is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(BotError::ConfigMissing(key))
        };

        let credentials = Credentials {
            practicum_token: required(ENV_PRACTICUM_TOKEN)?,
            telegram_token: required(ENV_TELEGRAM_TOKEN)?,
            chat_id: required(ENV_TELEGRAM_CHAT_ID)?,
            endpoint: lookup("PRACTICUM_ENDPOINT")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };

        let secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Ok(Self {
            credentials,
            retry_period: Duration::from_secs(
                secs("RETRY_PERIOD_SECS", DEFAULT_INTERVAL.as_secs()).max(1),
            ),
            http_timeout: Duration::from_secs(
                secs("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS).max(1),
            ),
            from_date: lookup("FROM_DATE")
                .as_deref()
                .map(parse_from_date)
                .unwrap_or(FromDate::At(0)),
            telegram_api_base: lookup("TELEGRAM_API_BASE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    /// Initial cursor; `now_unix` is only consulted for `FROM_DATE=now`.
    pub fn initial_from_date(&self, now_unix: i64) -> i64 {
        match self.from_date {
            FromDate::At(ts) => ts,
            FromDate::Now => now_unix,
        }
    }
}

fn parse_from_date(raw: &str) -> FromDate {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("now") {
        return FromDate::Now;
    }
    raw.parse::<i64>().map(FromDate::At).unwrap_or(FromDate::At(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("PRACTICUM_TOKEN", "p-token"),
        ("TELEGRAM_TOKEN", "t-token"),
        ("TELEGRAM_CHAT_ID", "42"),
    ];

    #[test]
    fn defaults_apply_when_only_required_set() {
        let s = Settings::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(s.credentials.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(s.credentials.chat_id, "42");
        assert_eq!(s.retry_period, Duration::from_secs(600));
        assert_eq!(s.http_timeout, Duration::from_secs(10));
        assert_eq!(s.from_date, FromDate::At(0));
        assert_eq!(s.telegram_api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn each_required_key_is_reported_when_missing() {
        for (missing, _) in REQUIRED {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();
            let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(
                matches!(err, BotError::ConfigMissing(k) if k == missing),
                "{missing}: {err:?}"
            );
        }
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("TELEGRAM_TOKEN", "   ");
        let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, BotError::ConfigMissing("TELEGRAM_TOKEN")));
    }

    #[test]
    fn optional_values_parse_or_fall_back() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("RETRY_PERIOD_SECS", "0"),
            ("HTTP_TIMEOUT_SECS", "abc"),
            ("FROM_DATE", "1549962000"),
            ("PRACTICUM_ENDPOINT", "http://127.0.0.1:8080/hw"),
        ]);
        let s = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(s.retry_period, Duration::from_secs(1));
        assert_eq!(s.http_timeout, Duration::from_secs(10));
        assert_eq!(s.initial_from_date(9), 1_549_962_000);
        assert_eq!(s.credentials.endpoint, "http://127.0.0.1:8080/hw");
    }

    #[test]
    fn from_date_now_uses_clock() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("FROM_DATE", "NOW"));
        let s = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(s.from_date, FromDate::Now);
        assert_eq!(s.initial_from_date(1234), 1234);
    }

    #[test]
    fn debug_hides_tokens() {
        let s = Settings::from_lookup(lookup(&REQUIRED)).unwrap();
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("p-token") && !dbg.contains("t-token"), "{dbg}");
    }
}
