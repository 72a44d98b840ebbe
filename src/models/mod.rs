// TruthSense Data Models
// Result and signal types shared by the scorer, the command layer and the binaries

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Classification Result ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlineLabel {
    Fake,
    Trustworthy,
}

impl HeadlineLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fake => "fake",
            Self::Trustworthy => "trustworthy",
        }
    }
}

impl fmt::Display for HeadlineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub label: HeadlineLabel,
    /// Integer percentage in [0, 100]
    pub confidence: u8,
    pub explanation: String,
}

// ============ Signal Types ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalCategory {
    ImpossibleClaim,
    Clickbait,
    Sensational,
    AbsoluteLanguage,
    Listicle,
    TrustworthyCue,
    ResearchMention,
    Punctuation,
    Capitalization,
    Length,
}

impl SignalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImpossibleClaim => "impossible_claim",
            Self::Clickbait => "clickbait",
            Self::Sensational => "sensational",
            Self::AbsoluteLanguage => "absolute_language",
            Self::Listicle => "listicle",
            Self::TrustworthyCue => "trustworthy_cue",
            Self::ResearchMention => "research_mention",
            Self::Punctuation => "punctuation",
            Self::Capitalization => "capitalization",
            Self::Length => "length",
        }
    }
}

/// One detector that fired during a classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredSignal {
    pub category: SignalCategory,
    /// Signed: positive counts toward the fake score, negative toward the trust score
    pub weight: f64,
    pub reason: String,
}

// ============ Analysis ============

/// Which terminal branch produced the result
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBranch {
    EmptyInput,
    Pinned,
    Fake,
    Trustworthy,
    Borderline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineAnalysis {
    pub result: ClassificationResult,
    pub branch: DecisionBranch,
    pub fake_score: f64,
    pub trust_score: f64,
    pub total_score: f64,
    pub token_count: usize,
    #[serde(default)]
    pub signals: Vec<TriggeredSignal>,
}

/// A headline paired with its analysis, as reported by batch runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineReport {
    pub headline: String,
    pub analysis: HeadlineAnalysis,
}
