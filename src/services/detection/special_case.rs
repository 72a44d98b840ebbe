// Pinned Headlines
// Short-circuit rules checked before the weighted battery

use super::rules::PinnedRule;
use crate::services::text_processor::NormalizedHeadline;

impl PinnedRule {
    /// Copy with every phrase lower-cased
    pub fn lowercased(&self) -> Self {
        let lower = |list: &[String]| -> Vec<String> { list.iter().map(|p| p.to_lowercase()).collect() };
        Self {
            all_of: lower(&self.all_of),
            any_of: lower(&self.any_of),
            confidence: self.confidence,
            explanation: self.explanation.clone(),
        }
    }

    pub fn matches(&self, headline: &NormalizedHeadline) -> bool {
        let all = self.all_of.iter().all(|p| headline.contains(p));
        let any = self.any_of.is_empty() || headline.contains_any(&self.any_of);
        all && any
    }
}

/// First pinned rule that matches, if any
pub fn find_pinned<'a>(rules: &'a [PinnedRule], headline: &NormalizedHeadline) -> Option<&'a PinnedRule> {
    rules.iter().find(|rule| rule.matches(headline))
}
