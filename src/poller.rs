// src/poller.rs
//! Fixed-interval reconciliation loop: fetch → validate → interpret → gate → notify → sleep.
//!
//! Only the first record of `homeworks` is ever reported. When several works
//! change within one window the others are not announced; the gate keeps a
//! single slot for the same reason.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tracing::{debug, error, info, trace, warn};

use crate::api::{validate, HomeworkSource};
use crate::error::Result;
use crate::notify::{NotificationGate, Notifier};
use crate::status::{interpret, NO_NEW_STATUSES};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(600);
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("homework_poll_cycles_total", "Poll cycles started.");
        describe_counter!(
            "homework_poll_errors_total",
            "Poll cycles that failed, by error kind."
        );
        describe_counter!(
            "homework_notifications_sent_total",
            "Messages confirmed by the notifier."
        );
        describe_counter!(
            "homework_notifications_failed_total",
            "Messages the notifier failed to deliver."
        );
        describe_gauge!("homework_poll_cursor", "Current from_date cursor (unix ts).");
    });
}

/// Lower bound of the next fetch window (unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn new(from_date: i64) -> Self {
        Self(from_date)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Move to the echoed server time; keep the old value when there is none.
    pub fn advance(&mut self, echoed: Option<i64>) {
        if let Some(ts) = echoed {
            self.0 = ts;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Polling,
    Notifying,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Message confirmed by the notifier and committed to the gate.
    Delivered(String),
    /// Candidate matched the last delivered text; nothing sent.
    Unchanged,
    /// Notifier failed; gate and cursor untouched so the message is retried.
    DeliveryFailed(String),
    /// Response had no `homeworks` key; logged only.
    EmptyResponse,
}

pub struct PollLoop<S, N> {
    source: S,
    notifier: N,
    recipient: String,
    cursor: PollCursor,
    gate: NotificationGate,
    interval: Duration,
    state: LoopState,
}

impl<S: HomeworkSource, N: Notifier> PollLoop<S, N> {
    pub fn new(source: S, notifier: N, recipient: impl Into<String>, cursor: PollCursor) -> Self {
        Self {
            source,
            notifier,
            recipient: recipient.into(),
            cursor,
            gate: NotificationGate::new(),
            interval: DEFAULT_INTERVAL,
            state: LoopState::Idle,
        }
    }

    /// Values below [`MIN_INTERVAL`] are raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn transition(&mut self, to: LoopState) {
        trace!(from = ?self.state, to = ?to, "poll loop state");
        self.state = to;
    }

    /// Fetch and render the candidate message plus the echoed cursor.
    async fn poll(&self) -> Result<(String, Option<i64>)> {
        let raw = self.source.fetch(self.cursor.get()).await?;
        let snapshot = validate(&raw)?;

        let candidate = match snapshot.homeworks.first() {
            None => NO_NEW_STATUSES.to_string(),
            Some(first) => {
                if snapshot.homeworks.len() > 1 {
                    debug!(
                        total = snapshot.homeworks.len(),
                        "several homework updates, reporting the first one"
                    );
                }
                interpret(first)?
            }
        };
        Ok((candidate, snapshot.current_date))
    }

    /// One full cycle without the trailing sleep.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        ensure_metrics_described();
        counter!("homework_poll_cycles_total").increment(1);

        self.transition(LoopState::Polling);
        let (candidate, next_cursor) = match self.poll().await {
            Ok(polled) => polled,
            Err(e) if e.is_quiet() => {
                error!(error = %e, kind = e.kind(), "empty response from API");
                counter!("homework_poll_errors_total", "kind" => e.kind()).increment(1);
                self.transition(LoopState::Idle);
                return CycleOutcome::EmptyResponse;
            }
            Err(e) => {
                error!(
                    error = %e,
                    kind = e.kind(),
                    cursor = self.cursor.get(),
                    "poll cycle failed"
                );
                counter!("homework_poll_errors_total", "kind" => e.kind()).increment(1);
                (e.failure_message(), None)
            }
        };

        if !self.gate.should_notify(&candidate) {
            debug!("no change since last notification");
            self.transition(LoopState::Idle);
            return CycleOutcome::Unchanged;
        }

        self.transition(LoopState::Notifying);
        let outcome = match self.notifier.send(&self.recipient, &candidate).await {
            Ok(()) => {
                debug!(notifier = self.notifier.name(), message = %candidate, "message sent");
                counter!("homework_notifications_sent_total").increment(1);
                self.cursor.advance(next_cursor);
                gauge!("homework_poll_cursor").set(self.cursor.get() as f64);
                self.gate.commit(candidate.clone());
                CycleOutcome::Delivered(candidate)
            }
            Err(e) => {
                error!(
                    notifier = self.notifier.name(),
                    error = %format!("{e:#}"),
                    message = %candidate,
                    "failed to send message"
                );
                counter!("homework_notifications_failed_total").increment(1);
                CycleOutcome::DeliveryFailed(candidate)
            }
        };
        self.transition(LoopState::Idle);
        outcome
    }

    /// Poll forever. The sleep runs after every cycle, whatever its outcome.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            from_date = self.cursor.get(),
            notifier = self.notifier.name(),
            "homework poll loop started"
        );
        loop {
            let outcome = self.run_cycle().await;
            if let CycleOutcome::DeliveryFailed(_) = outcome {
                warn!("delivery will be retried next cycle");
            }
            trace!(?outcome, "cycle finished");
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_keeps_value_without_echo() {
        let mut c = PollCursor::new(1000);
        c.advance(None);
        assert_eq!(c.get(), 1000);
        c.advance(Some(2000));
        assert_eq!(c.get(), 2000);
    }

    #[test]
    fn default_cursor_is_epoch() {
        assert_eq!(PollCursor::default().get(), 0);
    }
}
