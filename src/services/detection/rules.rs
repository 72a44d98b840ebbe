// Rule Table
// Keyword sets, weights, thresholds and messages used by the scorer.
// Everything here is plain data; `HeadlineClassifier::new` validates and compiles it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SignalCategory;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("rule #{index} ({category}) has no keywords")]
    EmptyKeywords { index: usize, category: &'static str },
    #[error("rule #{index} ({category}) has an empty keyword")]
    BlankKeyword { index: usize, category: &'static str },
    #[error("rule #{index} ({category}) has an empty reason")]
    EmptyReason { index: usize, category: &'static str },
    #[error("rule #{index} ({category}) has a non-finite weight")]
    InvalidWeight { index: usize, category: &'static str },
    #[error("rule #{index} ({category}) has inconsistent bounds: {message}")]
    InvalidBounds {
        index: usize,
        category: &'static str,
        message: String,
    },
    #[error("whole-word pattern for rule #{index} failed to build: {message}")]
    Pattern { index: usize, message: String },
    #[error("pinned rule #{index} is invalid: {message}")]
    InvalidPinned { index: usize, message: String },
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),
}

/// Weight and reason emitted when a detector (or one grade of it) fires.
/// Positive weights add to the fake score; negative weights add their
/// magnitude to the trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalOutcome {
    pub weight: f64,
    pub reason: String,
}

impl SignalOutcome {
    pub fn new(weight: f64, reason: &str) -> Self {
        Self {
            weight,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Detector {
    /// Plain substring containment of any phrase in the lower-cased text
    Phrases {
        phrases: Vec<String>,
        outcome: SignalOutcome,
    },
    /// Whole-word match of any word in the lower-cased text
    WholeWords {
        words: Vec<String>,
        outcome: SignalOutcome,
    },
    /// Graded `!` count on the original text
    Exclamations {
        single: SignalOutcome,
        multiple: SignalOutcome,
        multiple_min: usize,
    },
    /// Shouted (all upper-case) tokens longer than `min_token_len`
    AllCaps {
        min_token_len: usize,
        min_count: usize,
        outcome: SignalOutcome,
    },
    /// Token count below `short_below` or above `long_above`; mutually exclusive
    Length {
        short_below: usize,
        short: SignalOutcome,
        long_above: usize,
        long: SignalOutcome,
    },
}

impl Detector {
    fn outcomes(&self) -> Vec<&SignalOutcome> {
        match self {
            Self::Phrases { outcome, .. }
            | Self::WholeWords { outcome, .. }
            | Self::AllCaps { outcome, .. } => vec![outcome],
            Self::Exclamations { single, multiple, .. } => vec![single, multiple],
            Self::Length { short, long, .. } => vec![short, long],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRule {
    pub category: SignalCategory,
    pub detector: Detector,
}

/// Short-circuit rule: fires when the text contains every `all_of` phrase and
/// at least one `any_of` phrase. Its result bypasses the weighted battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRule {
    pub all_of: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
    pub confidence: u8,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionThresholds {
    /// totalScore at or above this labels fake
    pub fake_min_total: f64,
    /// totalScore at or below this labels trustworthy
    pub trust_max_total: f64,
    pub fake_base: f64,
    pub fake_per_point: f64,
    pub fake_cap: f64,
    pub trust_base: f64,
    pub trust_per_point: f64,
    pub trust_cap: f64,
    pub borderline_base: f64,
    pub borderline_per_point: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            fake_min_total: 3.5,
            trust_max_total: 0.0,
            fake_base: 70.0,
            fake_per_point: 5.0,
            fake_cap: 95.0,
            trust_base: 65.0,
            trust_per_point: 6.0,
            trust_cap: 92.0,
            borderline_base: 65.0,
            borderline_per_point: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub empty_input: String,
    pub borderline: String,
    pub no_signals: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            empty_input: "No headline text was provided.".to_string(),
            borderline: "Some signals suggest sensationalism, but the evidence is mixed, so the classification is less certain.".to_string(),
            no_signals: "The headline does not strongly match typical patterns of either clickbait or neutral reporting, so the system estimated its credibility based on general tone and structure.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTable {
    #[serde(default)]
    pub pinned: Vec<PinnedRule>,
    pub signals: Vec<SignalRule>,
    #[serde(default)]
    pub thresholds: DecisionThresholds,
    #[serde(default)]
    pub messages: Messages,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleTable {
    fn default() -> Self {
        let pinned = vec![PinnedRule {
            all_of: phrases(&["coffee"]),
            any_of: phrases(&["immortal", "live forever"]),
            confidence: 94,
            explanation: "The headline combines a common everyday product with an impossible outcome (immortality). Such claims strongly match patterns of misleading or sensational content.".to_string(),
        }];

        let signals = vec![
            SignalRule {
                category: SignalCategory::ImpossibleClaim,
                detector: Detector::Phrases {
                    phrases: phrases(&[
                        "immortal",
                        "immortality",
                        "live forever",
                        "cure cancer",
                        "cures all diseases",
                        "100% guarantee",
                        "time travel",
                        "teleportation",
                        "resurrect the dead",
                    ]),
                    outcome: SignalOutcome::new(
                        3.0,
                        "The headline mentions outcomes that are biologically or physically impossible (e.g., immortality or total cures).",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::Clickbait,
                detector: Detector::Phrases {
                    phrases: phrases(&[
                        "you won't believe",
                        "shocking",
                        "this will change your life",
                        "what happens next",
                        "goes viral",
                        "mind-blowing",
                        "unbelievable",
                        "blows your mind",
                        "top secret",
                        "hidden truth",
                    ]),
                    outcome: SignalOutcome::new(
                        3.0,
                        "It uses strong clickbait phrases often associated with misleading headlines.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::Sensational,
                detector: Detector::Phrases {
                    phrases: phrases(&[
                        "miracle",
                        "outrageous",
                        "explosive",
                        "insane",
                        "crazy",
                        "jaw-dropping",
                        "scandal",
                        "exposed",
                    ]),
                    outcome: SignalOutcome::new(
                        2.0,
                        "The language is highly emotional or sensational, which is typical of misleading content.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::AbsoluteLanguage,
                detector: Detector::Phrases {
                    phrases: phrases(&["never", "always", "everyone", "no one", "proves once and for all"]),
                    outcome: SignalOutcome::new(
                        1.5,
                        "Absolute language is used, which can signal overconfident or exaggerated claims.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::Listicle,
                detector: Detector::Phrases {
                    phrases: phrases(&["reasons why", "things you need to know", "tips to"]),
                    outcome: SignalOutcome::new(
                        1.0,
                        "The headline resembles a listicle pattern, which is often used in clickbait formats.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::Punctuation,
                detector: Detector::Exclamations {
                    single: SignalOutcome::new(
                        1.0,
                        "The exclamation mark increases the emotional tone of the headline.",
                    ),
                    multiple: SignalOutcome::new(
                        2.0,
                        "Multiple exclamation marks suggest strong sensationalism and possible clickbait.",
                    ),
                    multiple_min: 2,
                },
            },
            SignalRule {
                category: SignalCategory::Capitalization,
                detector: Detector::AllCaps {
                    min_token_len: 3,
                    min_count: 2,
                    outcome: SignalOutcome::new(
                        2.0,
                        "Using several ALL-CAPS words is a common pattern in misleading or spammy headlines.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::Length,
                detector: Detector::Length {
                    short_below: 5,
                    short: SignalOutcome::new(
                        1.0,
                        "The headline is very short, which can reduce context and clarity.",
                    ),
                    long_above: 18,
                    long: SignalOutcome::new(
                        -0.5,
                        "The headline is relatively detailed, which can sometimes indicate more informative reporting.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::TrustworthyCue,
                detector: Detector::Phrases {
                    phrases: phrases(&[
                        "according to",
                        "researchers at",
                        "study published in",
                        "report from",
                        "official data",
                        "peer-reviewed",
                        "university of",
                        "in a journal",
                    ]),
                    outcome: SignalOutcome::new(
                        -2.0,
                        "The headline references sources or research, which is more typical of balanced reporting.",
                    ),
                },
            },
            SignalRule {
                category: SignalCategory::ResearchMention,
                detector: Detector::WholeWords {
                    words: phrases(&["study", "research", "scientists"]),
                    outcome: SignalOutcome::new(
                        -1.0,
                        "The headline mentions research or scientists, which may indicate an attempt to present evidence.",
                    ),
                },
            },
        ];

        Self {
            pinned,
            signals,
            thresholds: DecisionThresholds::default(),
            messages: Messages::default(),
        }
    }
}

fn check_keywords(index: usize, category: &'static str, keywords: &[String]) -> Result<(), RuleError> {
    if keywords.is_empty() {
        return Err(RuleError::EmptyKeywords { index, category });
    }
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(RuleError::BlankKeyword { index, category });
    }
    Ok(())
}

impl RuleTable {
    /// Check the table for values the scorer cannot work with
    pub fn validate(&self) -> Result<(), RuleError> {
        for (index, pin) in self.pinned.iter().enumerate() {
            if pin.all_of.is_empty() && pin.any_of.is_empty() {
                return Err(RuleError::InvalidPinned {
                    index,
                    message: "needs at least one phrase".to_string(),
                });
            }
            if pin.all_of.iter().chain(pin.any_of.iter()).any(|p| p.trim().is_empty()) {
                return Err(RuleError::InvalidPinned {
                    index,
                    message: "contains an empty phrase".to_string(),
                });
            }
            if pin.confidence > 100 {
                return Err(RuleError::InvalidPinned {
                    index,
                    message: format!("confidence {} exceeds 100", pin.confidence),
                });
            }
            if pin.explanation.trim().is_empty() {
                return Err(RuleError::InvalidPinned {
                    index,
                    message: "empty explanation".to_string(),
                });
            }
        }

        for (index, rule) in self.signals.iter().enumerate() {
            let category = rule.category.as_str();
            match &rule.detector {
                Detector::Phrases { phrases, .. } => check_keywords(index, category, phrases)?,
                Detector::WholeWords { words, .. } => check_keywords(index, category, words)?,
                Detector::Exclamations { multiple_min, .. } => {
                    if *multiple_min < 2 {
                        return Err(RuleError::InvalidBounds {
                            index,
                            category,
                            message: format!("multipleMin must be at least 2, got {}", multiple_min),
                        });
                    }
                }
                Detector::AllCaps { min_count, .. } => {
                    if *min_count == 0 {
                        return Err(RuleError::InvalidBounds {
                            index,
                            category,
                            message: "minCount must be positive".to_string(),
                        });
                    }
                }
                Detector::Length { short_below, long_above, .. } => {
                    if short_below > long_above {
                        return Err(RuleError::InvalidBounds {
                            index,
                            category,
                            message: format!("shortBelow {} exceeds longAbove {}", short_below, long_above),
                        });
                    }
                }
            }
            for outcome in rule.detector.outcomes() {
                if !outcome.weight.is_finite() {
                    return Err(RuleError::InvalidWeight { index, category });
                }
                if outcome.reason.trim().is_empty() {
                    return Err(RuleError::EmptyReason { index, category });
                }
            }
        }

        let t = &self.thresholds;
        let all = [
            t.fake_min_total,
            t.trust_max_total,
            t.fake_base,
            t.fake_per_point,
            t.fake_cap,
            t.trust_base,
            t.trust_per_point,
            t.trust_cap,
            t.borderline_base,
            t.borderline_per_point,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(RuleError::InvalidThresholds("non-finite value".to_string()));
        }
        if t.trust_max_total >= t.fake_min_total {
            return Err(RuleError::InvalidThresholds(format!(
                "trustMaxTotal {} must be below fakeMinTotal {}",
                t.trust_max_total, t.fake_min_total
            )));
        }
        if self.messages.empty_input.trim().is_empty()
            || self.messages.borderline.trim().is_empty()
            || self.messages.no_signals.trim().is_empty()
        {
            return Err(RuleError::InvalidThresholds("messages must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = RuleTable::default();
        assert!(table.validate().is_ok());
        assert_eq!(table.signals.len(), 10);
        assert_eq!(table.pinned.len(), 1);
    }

    #[test]
    fn test_default_order_matches_battery() {
        let order: Vec<SignalCategory> = RuleTable::default().signals.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                SignalCategory::ImpossibleClaim,
                SignalCategory::Clickbait,
                SignalCategory::Sensational,
                SignalCategory::AbsoluteLanguage,
                SignalCategory::Listicle,
                SignalCategory::Punctuation,
                SignalCategory::Capitalization,
                SignalCategory::Length,
                SignalCategory::TrustworthyCue,
                SignalCategory::ResearchMention,
            ]
        );
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut table = RuleTable::default();
        table.thresholds.trust_max_total = 4.0;
        assert!(matches!(table.validate(), Err(RuleError::InvalidThresholds(_))));
    }

    #[test]
    fn test_rejects_empty_phrase_list() {
        let mut table = RuleTable::default();
        if let Detector::Phrases { phrases, .. } = &mut table.signals[1].detector {
            phrases.clear();
        }
        assert_eq!(
            table.validate(),
            Err(RuleError::EmptyKeywords { index: 1, category: "clickbait" })
        );
    }

    #[test]
    fn test_rejects_nan_weight() {
        let mut table = RuleTable::default();
        if let Detector::AllCaps { outcome, .. } = &mut table.signals[6].detector {
            outcome.weight = f64::NAN;
        }
        assert!(matches!(table.validate(), Err(RuleError::InvalidWeight { index: 6, .. })));
    }

    #[test]
    fn test_table_json_roundtrip_keeps_detector_kind() {
        let table = RuleTable::default();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains(r#""kind":"whole_words""#));
        assert!(json.contains(r#""multipleMin":2"#));
        let parsed: RuleTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }
}
