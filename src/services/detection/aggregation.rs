// Aggregation Logic
// Turns triggered signals into fake/trust scores and a label with a bounded confidence

use super::rules::DecisionThresholds;
use crate::models::{DecisionBranch, HeadlineLabel, TriggeredSignal};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScoreTotals {
    pub fake_score: f64,
    pub trust_score: f64,
}

impl ScoreTotals {
    pub fn total(&self) -> f64 {
        self.fake_score - self.trust_score
    }
}

/// Positive weights accumulate into the fake score, negative ones into the trust score
pub fn sum_scores(signals: &[TriggeredSignal]) -> ScoreTotals {
    signals.iter().fold(ScoreTotals::default(), |mut acc, s| {
        if s.weight >= 0.0 {
            acc.fake_score += s.weight;
        } else {
            acc.trust_score += -s.weight;
        }
        acc
    })
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Decision {
    pub label: HeadlineLabel,
    pub confidence: u8,
    pub branch: DecisionBranch,
}

/// Round half-up, then clamp into [0, 100]
pub fn round_confidence(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    (raw + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// Apply the thresholds in priority order: confident fake, trustworthy, borderline.
/// The borderline band always leans fake.
pub fn decide(totals: &ScoreTotals, thresholds: &DecisionThresholds) -> Decision {
    let total = totals.total();

    if total >= thresholds.fake_min_total {
        let raw = thresholds.fake_base + totals.fake_score * thresholds.fake_per_point;
        Decision {
            label: HeadlineLabel::Fake,
            confidence: round_confidence(raw.min(thresholds.fake_cap)),
            branch: DecisionBranch::Fake,
        }
    } else if total <= thresholds.trust_max_total {
        let raw = thresholds.trust_base + totals.trust_score * thresholds.trust_per_point;
        Decision {
            label: HeadlineLabel::Trustworthy,
            confidence: round_confidence(raw.min(thresholds.trust_cap)),
            branch: DecisionBranch::Trustworthy,
        }
    } else {
        let raw = thresholds.borderline_base + total * thresholds.borderline_per_point;
        Decision {
            label: HeadlineLabel::Fake,
            confidence: round_confidence(raw.min(thresholds.fake_cap)),
            branch: DecisionBranch::Borderline,
        }
    }
}
