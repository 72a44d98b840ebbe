// Detection Module
// Headline scoring organized into specialized submodules:
// - rules: immutable rule table (keywords, weights, thresholds, messages)
// - special_case: pinned short-circuit rules checked before scoring
// - signals: compiled detector battery
// - aggregation: fake/trust sums and the labelling decision
// - explanation: reason accumulation
// - classifier: entry point tying the stages together

pub mod rules;
pub mod special_case;
pub mod signals;
pub mod aggregation;
pub mod explanation;
pub mod classifier;

// Re-export commonly used items
pub use rules::{
    DecisionThresholds,
    Detector,
    Messages,
    PinnedRule,
    RuleError,
    RuleTable,
    SignalOutcome,
    SignalRule,
};
pub use special_case::find_pinned;
pub use signals::{compile_signals, extract_signals, CompiledSignal};
pub use aggregation::{decide, round_confidence, sum_scores, Decision, ScoreTotals};
pub use explanation::ExplanationBuilder;
pub use classifier::{analyze, classify, HeadlineClassifier};
