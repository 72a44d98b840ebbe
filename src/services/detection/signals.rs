// Signal Extractor
// Compiles the rule table's detectors once and runs them in table order

use regex::Regex;

use super::rules::{Detector, RuleError, SignalOutcome, SignalRule};
use crate::models::{SignalCategory, TriggeredSignal};
use crate::services::text_processor::{count_exclamations, count_shouted_tokens, NormalizedHeadline};

#[derive(Debug, Clone)]
enum Check {
    Phrases(Vec<String>, SignalOutcome),
    WholeWords(Regex, SignalOutcome),
    Exclamations {
        single: SignalOutcome,
        multiple: SignalOutcome,
        multiple_min: usize,
    },
    AllCaps {
        min_token_len: usize,
        min_count: usize,
        outcome: SignalOutcome,
    },
    Length {
        short_below: usize,
        short: SignalOutcome,
        long_above: usize,
        long: SignalOutcome,
    },
}

/// A detector ready to run against normalized headlines
#[derive(Debug, Clone)]
pub struct CompiledSignal {
    category: SignalCategory,
    check: Check,
}

fn whole_word_pattern(words: &[String]) -> String {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(&w.to_lowercase())).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

impl CompiledSignal {
    pub fn compile(index: usize, rule: &SignalRule) -> Result<Self, RuleError> {
        let check = match &rule.detector {
            Detector::Phrases { phrases, outcome } => Check::Phrases(
                phrases.iter().map(|p| p.to_lowercase()).collect(),
                outcome.clone(),
            ),
            Detector::WholeWords { words, outcome } => {
                let re = Regex::new(&whole_word_pattern(words)).map_err(|e| RuleError::Pattern {
                    index,
                    message: e.to_string(),
                })?;
                Check::WholeWords(re, outcome.clone())
            }
            Detector::Exclamations { single, multiple, multiple_min } => Check::Exclamations {
                single: single.clone(),
                multiple: multiple.clone(),
                multiple_min: *multiple_min,
            },
            Detector::AllCaps { min_token_len, min_count, outcome } => Check::AllCaps {
                min_token_len: *min_token_len,
                min_count: *min_count,
                outcome: outcome.clone(),
            },
            Detector::Length { short_below, short, long_above, long } => Check::Length {
                short_below: *short_below,
                short: short.clone(),
                long_above: *long_above,
                long: long.clone(),
            },
        };
        Ok(Self {
            category: rule.category,
            check,
        })
    }

    /// The outcome this detector produces for the headline, if it fires
    fn fire(&self, headline: &NormalizedHeadline, token_count: usize) -> Option<&SignalOutcome> {
        match &self.check {
            Check::Phrases(phrases, outcome) => headline.contains_any(phrases).then_some(outcome),
            Check::WholeWords(re, outcome) => re.is_match(&headline.text).then_some(outcome),
            Check::Exclamations { single, multiple, multiple_min } => {
                match count_exclamations(&headline.original) {
                    0 => None,
                    n if n >= *multiple_min => Some(multiple),
                    _ => Some(single),
                }
            }
            Check::AllCaps { min_token_len, min_count, outcome } => {
                (count_shouted_tokens(&headline.original, *min_token_len) >= *min_count).then_some(outcome)
            }
            Check::Length { short_below, short, long_above, long } => {
                if token_count < *short_below {
                    Some(short)
                } else if token_count > *long_above {
                    Some(long)
                } else {
                    None
                }
            }
        }
    }

    pub fn evaluate(&self, headline: &NormalizedHeadline, token_count: usize) -> Option<TriggeredSignal> {
        self.fire(headline, token_count).map(|outcome| TriggeredSignal {
            category: self.category,
            weight: outcome.weight,
            reason: outcome.reason.clone(),
        })
    }
}

pub fn compile_signals(rules: &[SignalRule]) -> Result<Vec<CompiledSignal>, RuleError> {
    rules
        .iter()
        .enumerate()
        .map(|(i, rule)| CompiledSignal::compile(i, rule))
        .collect()
}

/// Run every detector in order; each contributes at most one signal
pub fn extract_signals(signals: &[CompiledSignal], headline: &NormalizedHeadline) -> Vec<TriggeredSignal> {
    let token_count = headline.token_count();
    signals
        .iter()
        .filter_map(|s| s.evaluate(headline, token_count))
        .collect()
}
