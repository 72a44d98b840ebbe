// Explanation Builder

use super::rules::Messages;
use crate::models::TriggeredSignal;

#[derive(Debug, Default)]
pub struct ExplanationBuilder {
    reasons: Vec<String>,
}

impl ExplanationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_signals(signals: &[TriggeredSignal]) -> Self {
        Self {
            reasons: signals.iter().map(|s| s.reason.clone()).collect(),
        }
    }

    pub fn push(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    /// Space-joined reasons, or the no-signals fallback when nothing was recorded
    pub fn build(self, messages: &Messages) -> String {
        if self.reasons.is_empty() {
            messages.no_signals.clone()
        } else {
            self.reasons.join(" ")
        }
    }
}
