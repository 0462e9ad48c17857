// src/notify/gate.rs

/// True when `candidate` differs from what was last delivered.
/// Comparison is on the full rendered text.
pub fn should_notify(previous: Option<&str>, candidate: &str) -> bool {
    previous != Some(candidate)
}

/// Single-slot dedup gate in front of the notifier.
/// - Nothing delivered yet: any candidate passes.
/// - Same text as the last delivery: suppressed.
/// - State changes only via `commit`, after a confirmed send.
#[derive(Debug, Clone, Default)]
pub struct NotificationGate {
    last_delivered: Option<String>,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Does NOT mutate state.
    pub fn should_notify(&self, candidate: &str) -> bool {
        should_notify(self.last_delivered.as_deref(), candidate)
    }

    pub fn commit(&mut self, delivered: impl Into<String>) {
        self.last_delivered = Some(delivered.into());
    }

    pub fn last_delivered(&self) -> Option<&str> {
        self.last_delivered.as_deref()
    }
}
