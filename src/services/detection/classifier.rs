// Headline Classifier
// Entry point of the scorer: empty input, pinned rules, then the weighted battery

use std::sync::OnceLock;
use tracing::debug;

use super::aggregation::{decide, sum_scores};
use super::explanation::ExplanationBuilder;
use super::rules::{PinnedRule, RuleError, RuleTable};
use super::signals::{compile_signals, extract_signals, CompiledSignal};
use super::special_case::find_pinned;
use crate::models::{ClassificationResult, DecisionBranch, HeadlineAnalysis, HeadlineLabel};
use crate::services::text_processor::NormalizedHeadline;

/// Scorer bound to one immutable rule table. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct HeadlineClassifier {
    table: RuleTable,
    signals: Vec<CompiledSignal>,
}

static DEFAULT_CLASSIFIER: OnceLock<HeadlineClassifier> = OnceLock::new();

impl HeadlineClassifier {
    pub fn new(mut table: RuleTable) -> Result<Self, RuleError> {
        table.validate()?;
        let signals = compile_signals(&table.signals)?;
        // matched against the lower-cased headline, like phrase detectors
        table.pinned = table.pinned.iter().map(PinnedRule::lowercased).collect();
        Ok(Self { table, signals })
    }

    /// Process-wide classifier over the built-in table
    pub fn builtin() -> &'static HeadlineClassifier {
        DEFAULT_CLASSIFIER.get_or_init(|| {
            Self::new(RuleTable::default()).expect("built-in rule table is valid")
        })
    }

    pub fn classify(&self, headline: &str) -> ClassificationResult {
        self.analyze(headline).result
    }

    pub fn analyze(&self, headline: &str) -> HeadlineAnalysis {
        let Some(normalized) = NormalizedHeadline::from_raw(headline) else {
            debug!(branch = "empty_input", "headline.classified");
            return HeadlineAnalysis {
                result: ClassificationResult {
                    label: HeadlineLabel::Fake,
                    confidence: 0,
                    explanation: self.table.messages.empty_input.clone(),
                },
                branch: DecisionBranch::EmptyInput,
                fake_score: 0.0,
                trust_score: 0.0,
                total_score: 0.0,
                token_count: 0,
                signals: Vec::new(),
            };
        };
        let token_count = normalized.token_count();

        if let Some(pin) = find_pinned(&self.table.pinned, &normalized) {
            debug!(branch = "pinned", confidence = pin.confidence, "headline.classified");
            return HeadlineAnalysis {
                result: ClassificationResult {
                    label: HeadlineLabel::Fake,
                    confidence: pin.confidence.min(100),
                    explanation: pin.explanation.clone(),
                },
                branch: DecisionBranch::Pinned,
                fake_score: 0.0,
                trust_score: 0.0,
                total_score: 0.0,
                token_count,
                signals: Vec::new(),
            };
        }

        let signals = extract_signals(&self.signals, &normalized);
        let totals = sum_scores(&signals);
        let decision = decide(&totals, &self.table.thresholds);

        let mut explanation = ExplanationBuilder::from_signals(&signals);
        if decision.branch == DecisionBranch::Borderline {
            explanation.push(self.table.messages.borderline.clone());
        }

        debug!(
            branch = ?decision.branch,
            fake_score = totals.fake_score,
            trust_score = totals.trust_score,
            signals = signals.len(),
            confidence = decision.confidence,
            "headline.classified"
        );

        HeadlineAnalysis {
            result: ClassificationResult {
                label: decision.label,
                confidence: decision.confidence,
                explanation: explanation.build(&self.table.messages),
            },
            branch: decision.branch,
            fake_score: totals.fake_score,
            trust_score: totals.trust_score,
            total_score: totals.total(),
            token_count,
            signals,
        }
    }
}

impl Default for HeadlineClassifier {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Classify with the built-in rule table
pub fn classify(headline: &str) -> ClassificationResult {
    HeadlineClassifier::builtin().classify(headline)
}

/// Full analysis with the built-in rule table
pub fn analyze(headline: &str) -> HeadlineAnalysis {
    HeadlineClassifier::builtin().analyze(headline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalCategory;
    use crate::services::detection::rules::{Detector, SignalOutcome, SignalRule};

    const NO_SIGNALS: &str = "The headline does not strongly match typical patterns of either clickbait or neutral reporting, so the system estimated its credibility based on general tone and structure.";
    const BORDERLINE: &str = "Some signals suggest sensationalism, but the evidence is mixed, so the classification is less certain.";

    #[test]
    fn test_empty_and_blank_input() {
        for input in ["", "   ", "\n\t ", "\u{FEFF}", "\u{FEFF} \n"] {
            let r = classify(input);
            assert_eq!(r.label, HeadlineLabel::Fake);
            assert_eq!(r.confidence, 0);
            assert_eq!(r.explanation, "No headline text was provided.");
        }
    }

    #[test]
    fn test_coffee_override() {
        for input in [
            "Coffee proven to let people live forever in shocking new report",
            "Scientists confirm drinking coffee makes you immortal, study claims",
            "IMMORTAL COFFEE?",
            "According to researchers at the University of Oxford, coffee drinkers are immortal",
        ] {
            let analysis = analyze(input);
            assert_eq!(analysis.branch, DecisionBranch::Pinned, "{}", input);
            assert_eq!(analysis.result.label, HeadlineLabel::Fake);
            assert_eq!(analysis.result.confidence, 94);
            assert!(analysis.result.explanation.starts_with("The headline combines a common everyday product"));
        }
    }

    #[test]
    fn test_teleportation_is_borderline_fake() {
        let a = analyze("Scientists confirm teleportation technology is ready for public use");
        assert_eq!(a.result.label, HeadlineLabel::Fake);
        assert_eq!(a.branch, DecisionBranch::Borderline);
        assert_eq!(a.fake_score, 3.0);
        assert_eq!(a.trust_score, 1.0);
        assert_eq!(a.result.confidence, 75);
        assert!(a.signals.iter().any(|s| s.category == SignalCategory::ImpossibleClaim));
        assert!(a.result.explanation.ends_with(BORDERLINE));
    }

    #[test]
    fn test_oxford_is_trustworthy() {
        let a = analyze("Researchers at the University of Oxford publish new findings on sleep patterns");
        assert_eq!(a.result.label, HeadlineLabel::Trustworthy);
        assert_eq!(a.fake_score, 0.0);
        assert_eq!(a.trust_score, 2.0);
        assert_eq!(a.result.confidence, 77);
        assert_eq!(a.signals.len(), 1);
        assert_eq!(a.signals[0].category, SignalCategory::TrustworthyCue);
    }

    #[test]
    fn test_breaking_miracle_drink() {
        let a = analyze("BREAKING: New miracle drink discovered!!!");
        assert_eq!(a.result.label, HeadlineLabel::Fake);
        assert_eq!(a.branch, DecisionBranch::Fake);
        assert_eq!(a.fake_score, 4.0);
        assert_eq!(a.result.confidence, 90);
        assert_eq!(
            a.result.explanation,
            "The language is highly emotional or sensational, which is typical of misleading content. Multiple exclamation marks suggest strong sensationalism and possible clickbait."
        );
    }

    #[test]
    fn test_no_signals_uses_default_explanation() {
        let r = classify("Government report outlines improvements in national cybersecurity readiness");
        assert_eq!(r.label, HeadlineLabel::Trustworthy);
        assert_eq!(r.confidence, 65);
        assert_eq!(r.explanation, NO_SIGNALS);
    }

    #[test]
    fn test_peer_reviewed_study() {
        let r = classify("Study published in a peer-reviewed journal shows moderate exercise improves memory");
        assert_eq!(r.label, HeadlineLabel::Trustworthy);
        assert_eq!(r.confidence, 83);
    }

    #[test]
    fn test_single_exclamation_borderline() {
        let r = classify("This viral method instantly doubles your income!");
        assert_eq!(r.label, HeadlineLabel::Fake);
        assert_eq!(r.confidence, 70);
        assert_eq!(
            r.explanation,
            format!("The exclamation mark increases the emotional tone of the headline. {}", BORDERLINE)
        );
    }

    #[test]
    fn test_everything_at_once_hits_cap() {
        let a = analyze("SHOCKING MIRACLE: you won't believe how immortal people never age!!");
        assert_eq!(a.branch, DecisionBranch::Fake);
        assert_eq!(a.fake_score, 13.5);
        assert_eq!(a.result.confidence, 95);
        assert_eq!(a.signals.len(), 6);
    }

    #[test]
    fn test_surrounding_whitespace_is_insignificant() {
        for h in [
            "BREAKING: New miracle drink discovered!!!",
            "Secret island discovered where dinosaurs still live",
            "Aliens exist",
        ] {
            assert_eq!(classify(h), classify(&format!("  {}  ", h)));
        }
    }

    #[test]
    fn test_deterministic() {
        let h = "Everyone is talking about the new city budget plan";
        let first = analyze(h);
        for _ in 0..5 {
            assert_eq!(analyze(h), first);
        }
        assert_eq!(first.result.confidence, 73);
    }

    #[test]
    fn test_adding_fake_keyword_never_lowers_fake_score() {
        let base = "Officials describe the new downtown stadium plan to residents";
        let variants = [
            "Officials describe the shocking new downtown stadium plan to residents",
            "Officials describe the outrageous new downtown stadium plan to residents",
            "Officials always describe the new downtown stadium plan to residents",
            "Officials describe the new downtown stadium plan to residents!",
        ];
        let base_analysis = analyze(base);
        for v in variants {
            let a = analyze(v);
            assert!(a.fake_score > base_analysis.fake_score, "{}", v);
            assert_eq!(a.result.label, HeadlineLabel::Fake, "{}", v);
        }
        // once fake, more fake evidence keeps it fake
        let stacked = analyze("Officials always describe the shocking new downtown stadium plan to residents!");
        assert_eq!(stacked.result.label, HeadlineLabel::Fake);
    }

    #[test]
    fn test_confidence_always_in_range() {
        let inputs = [
            "",
            "!!!!!!!!!!",
            "A",
            "ÉNORME SCANDALE À PARIS",
            "数据显示 经济 增长",
            "study study study research scientists according to peer-reviewed",
        ];
        for h in inputs {
            assert!(classify(h).confidence <= 100);
        }
        let long = "word ".repeat(5000);
        assert!(classify(&long).confidence <= 100);
    }

    #[test]
    fn test_custom_table_is_used() {
        let mut table = RuleTable::default();
        table.pinned.clear();
        table.signals.push(SignalRule {
            category: SignalCategory::TrustworthyCue,
            detector: Detector::Phrases {
                phrases: vec!["reuters".to_string()],
                outcome: SignalOutcome::new(-10.0, "Wire service attribution."),
            },
        });
        let classifier = HeadlineClassifier::new(table).unwrap();

        // without the pinned rule the coffee headline is scored normally
        let a = classifier.analyze("Coffee makes you immortal");
        assert_ne!(a.branch, DecisionBranch::Pinned);

        let r = classifier.classify("Reuters: parliament passes the annual budget bill");
        assert_eq!(r.label, HeadlineLabel::Trustworthy);
        assert_eq!(r.confidence, 92);
        assert_eq!(r.explanation, "Wire service attribution.");
    }

    #[test]
    fn test_custom_pinned_rule_is_case_insensitive() {
        let mut table = RuleTable::default();
        table.pinned = vec![PinnedRule {
            all_of: vec!["Coffee".to_string()],
            any_of: vec!["Immortal".to_string(), "Live Forever".to_string()],
            confidence: 94,
            explanation: "Pinned coffee claim.".to_string(),
        }];
        let classifier = HeadlineClassifier::new(table).unwrap();

        for input in ["Coffee makes you Immortal", "coffee lets you live forever"] {
            let a = classifier.analyze(input);
            assert_eq!(a.branch, DecisionBranch::Pinned, "{}", input);
            assert_eq!(a.result.confidence, 94);
            assert_eq!(a.result.explanation, "Pinned coffee claim.");
        }
    }

    #[test]
    fn test_builtin_matches_validated_default() {
        let fresh = HeadlineClassifier::new(RuleTable::default()).unwrap();
        let h = "BREAKING: New miracle drink discovered!!!";
        assert_eq!(HeadlineClassifier::builtin().analyze(h), fresh.analyze(h));
    }

    #[test]
    fn test_invalid_table_rejected() {
        let mut table = RuleTable::default();
        table.thresholds.fake_min_total = -1.0;
        assert!(HeadlineClassifier::new(table).is_err());
    }

    #[test]
    fn test_classifier_shared_across_threads() {
        let classifier = std::sync::Arc::new(HeadlineClassifier::default());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = classifier.clone();
                std::thread::spawn(move || c.classify("BREAKING: New miracle drink discovered!!!"))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().confidence, 90);
        }
    }
}
