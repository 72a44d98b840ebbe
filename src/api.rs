// Command layer
// Async handlers a presentation front-end calls; errors cross the boundary as strings

use std::time::Duration;
use tracing::{info, warn};

use crate::models::{ClassificationResult, HeadlineReport};
use crate::services::{AppConfig, ConfigStore, HeadlineClassifier};

fn load_config() -> AppConfig {
    match ConfigStore::open_default().and_then(|store| store.load()) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "config.load_failed_using_defaults");
            AppConfig::default()
        }
    }
}

/// Wait `delay_ms`, then classify. The wait only paces the UI; it never changes the result.
pub async fn detect_headline_with(
    classifier: &HeadlineClassifier,
    headline: &str,
    delay_ms: u64,
) -> ClassificationResult {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    classifier.classify(headline)
}

pub async fn detect_headline(headline: String) -> Result<ClassificationResult, String> {
    let config = load_config();
    let classifier = config.classifier().map_err(|e| e.to_string())?;
    let result =
        detect_headline_with(&classifier, &headline, config.detection.presentation_delay_ms).await;
    info!(
        label = %result.label,
        confidence = result.confidence,
        chars = headline.chars().count(),
        "detect_headline.completed"
    );
    Ok(result)
}

/// Classify headlines in order, without any presentation delay
pub fn detect_headlines_with(classifier: &HeadlineClassifier, headlines: &[String]) -> Vec<HeadlineReport> {
    headlines
        .iter()
        .map(|h| HeadlineReport {
            headline: h.clone(),
            analysis: classifier.analyze(h),
        })
        .collect()
}

pub async fn detect_headlines(headlines: Vec<String>) -> Result<Vec<HeadlineReport>, String> {
    let classifier = load_config().classifier().map_err(|e| e.to_string())?;
    let reports = detect_headlines_with(&classifier, &headlines);
    info!(count = reports.len(), "detect_headlines.completed");
    Ok(reports)
}

pub async fn get_config() -> Result<AppConfig, String> {
    let store = ConfigStore::open_default().map_err(|e| e.to_string())?;
    store.load().map_err(|e| e.to_string())
}

pub async fn save_config(config: AppConfig) -> Result<(), String> {
    let store = ConfigStore::open_default().map_err(|e| e.to_string())?;
    store.save(&config).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecisionBranch, HeadlineLabel};
    use crate::services::{RuleTable, CONFIG_DIR_ENV};
    use std::time::Instant;

    #[tokio::test]
    async fn test_delay_does_not_change_result() {
        let classifier = HeadlineClassifier::default();
        let h = "BREAKING: New miracle drink discovered!!!";
        let started = Instant::now();
        let delayed = detect_headline_with(&classifier, h, 20).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
        let immediate = detect_headline_with(&classifier, h, 0).await;
        assert_eq!(delayed, immediate);
        assert_eq!(delayed.label, HeadlineLabel::Fake);
    }

    #[tokio::test]
    async fn test_blank_headline_is_not_an_error() {
        let classifier = HeadlineClassifier::default();
        let r = detect_headline_with(&classifier, "   ", 0).await;
        assert_eq!(r.confidence, 0);
        assert_eq!(r.explanation, "No headline text was provided.");
    }

    #[test]
    fn test_batch_preserves_order() {
        let classifier = HeadlineClassifier::default();
        let headlines = vec![
            "Coffee proven to let people live forever in shocking new report".to_string(),
            "".to_string(),
            "Researchers at the University of Oxford publish new findings on sleep patterns".to_string(),
        ];
        let reports = detect_headlines_with(&classifier, &headlines);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].analysis.branch, DecisionBranch::Pinned);
        assert_eq!(reports[1].analysis.branch, DecisionBranch::EmptyInput);
        assert_eq!(reports[2].analysis.result.label, HeadlineLabel::Trustworthy);
        assert_eq!(reports[2].headline, headlines[2]);
    }

    // One test owns the config-dir variable so nothing else races on it
    #[tokio::test]
    async fn test_commands_use_stored_config() {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let dir = std::env::temp_dir().join(format!("truthsense_api_{}_{}", std::process::id(), nanos));
        std::env::set_var(CONFIG_DIR_ENV, &dir);

        let mut rules = RuleTable::default();
        rules.messages.no_signals = "Nothing stood out.".to_string();
        let mut config = AppConfig::default();
        config.detection.presentation_delay_ms = 5;
        config.rules = Some(rules);
        save_config(config).await.unwrap();

        let loaded = get_config().await.unwrap();
        assert_eq!(loaded.detection.presentation_delay_ms, 5);
        assert!(loaded.rules.is_some());

        let headline = "Government report outlines improvements in national cybersecurity readiness";
        let started = Instant::now();
        let single = detect_headline(headline.to_string()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(5));
        assert_eq!(single.label, HeadlineLabel::Trustworthy);
        assert_eq!(single.explanation, "Nothing stood out.");

        let batch = detect_headlines(vec![headline.to_string(), " ".to_string()]).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].analysis.result, single);
        assert_eq!(batch[1].analysis.branch, DecisionBranch::EmptyInput);

        let mut invalid = AppConfig::default();
        let mut broken = RuleTable::default();
        broken.thresholds.trust_max_total = 4.0;
        invalid.rules = Some(broken);
        assert!(save_config(invalid).await.is_err());

        // a corrupt file is reported by get_config but never blocks classification
        std::fs::write(dir.join("config.json"), "{ not json").unwrap();
        assert!(get_config().await.is_err());
        let fallback = detect_headline(headline.to_string()).await.unwrap();
        assert_ne!(fallback.explanation, "Nothing stood out.");
        assert_eq!(fallback.confidence, 65);

        std::env::remove_var(CONFIG_DIR_ENV);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
