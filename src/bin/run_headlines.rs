use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use truthsense_lib::api::detect_headlines_with;
use truthsense_lib::models::{HeadlineLabel, HeadlineReport};
use truthsense_lib::services::{AppConfig, ConfigStore};
use truthsense_lib::{format_report, has_flag, init_logging, parse_arg_value, HeadlineClassifier};

const TEST_HEADLINES: &[&str] = &[
    "Scientists discover a new mineral that grants immortality to humans",
    "Coffee proven to let people live forever in shocking new report",
    "New study claims humans can now breathe underwater without equipment",
    "Scientists confirm teleportation technology is ready for public use",
    "New evidence proves birds are actually government drones",
    "Secret island discovered where dinosaurs still live",
    "This viral method instantly doubles your income!",
    "BREAKING: New miracle drink discovered!!!",
    "Doctors guarantee this breathing technique cures anxiety instantly",
    // Trustworthy examples
    "Researchers at the University of Oxford publish new findings on sleep patterns",
    "Study published in a peer-reviewed journal shows moderate exercise improves memory",
    "Government report outlines improvements in national cybersecurity readiness",
];

fn read_headlines(path: &str) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read headlines file {}", path))?;
    Ok(content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_string())
        .collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") {
        eprintln!(
            "Usage:\n  cargo run --bin run_headlines -- [--file <headlines.txt>] [--config-dir <dir>] [--paced] [--verbose] [--out <json_path>]\n\nNotes:\n  - Without --file the built-in sample headlines are classified.\n  - `--paced` waits the configured presentation delay before each result."
        );
        return Ok(());
    }

    init_logging();

    let headlines: Vec<String> = match parse_arg_value(&args, "--file") {
        Some(path) => read_headlines(&path)?,
        None => TEST_HEADLINES.iter().map(|s| s.to_string()).collect(),
    };
    let config = match parse_arg_value(&args, "--config-dir") {
        Some(dir) => ConfigStore::new(PathBuf::from(dir)).load()?,
        None => AppConfig::default(),
    };
    let classifier: HeadlineClassifier = config.classifier()?;
    let verbose = has_flag(&args, "--verbose");
    let out_path = parse_arg_value(&args, "--out");

    println!("=== TruthSense AI Testing Output ===\n");

    let reports: Vec<HeadlineReport> = if has_flag(&args, "--paced") {
        let delay = config.detection.presentation_delay_ms;
        let mut reports = Vec::with_capacity(headlines.len());
        for headline in &headlines {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let report = HeadlineReport {
                headline: headline.clone(),
                analysis: classifier.analyze(headline),
            };
            println!("{}", format_report(&report, verbose));
            reports.push(report);
        }
        reports
    } else {
        let reports = detect_headlines_with(&classifier, &headlines);
        for report in &reports {
            println!("{}", format_report(report, verbose));
        }
        reports
    };

    let fake = reports
        .iter()
        .filter(|r| r.analysis.result.label == HeadlineLabel::Fake)
        .count();
    println!("Summary: {} headlines, {} fake, {} trustworthy", reports.len(), fake, reports.len() - fake);

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output<'a> {
            version: &'a str,
            total: usize,
            fake_count: usize,
            reports: &'a [HeadlineReport],
        }

        let out = Output {
            version: env!("CARGO_PKG_VERSION"),
            total: reports.len(),
            fake_count: fake,
            reports: &reports,
        };

        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json).with_context(|| format!("write {}", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}
