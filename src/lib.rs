pub mod models;
pub mod services;
pub mod api;

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use models::HeadlineReport;
use services::{AppConfig, ConfigStore, OutputFormat};

pub use services::detection::{analyze, classify, HeadlineClassifier};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

/// Initialize logging: a per-session log file plus stderr output in debug builds.
/// Stdout is left alone so results can be piped.
pub fn init_logging() {
    let disable_file_log = env_flag("TRUTHSENSE_DISABLE_FILE_LOG");
    let disable_cleanup = env_flag("TRUTHSENSE_DISABLE_LOG_CLEANUP");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if disable_file_log {
        init_console_only_logging(env_filter);
        return;
    }

    let logs_dir = match std::env::var("TRUTHSENSE_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("truthsense_{}.log", timestamp);

    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer)
            .try_init();
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .try_init();
    }

    info!(log_file = %logs_dir.join(&log_filename).display(), version = env!("CARGO_PKG_VERSION"), "logging.initialized");

    if !disable_cleanup {
        std::thread::spawn(move || {
            cleanup_old_logs(&logs_dir, 30);
        });
    }
}

fn get_logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("truthsense").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with("truthsense_") && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

// ============ Output ============

/// Human-readable block for one headline
pub fn format_report(report: &HeadlineReport, verbose: bool) -> String {
    let result = &report.analysis.result;
    let mut out = format!(
        "Headline: {}\n → Label: {}\n → Confidence: {}%\n → Explanation: {}\n",
        report.headline, result.label, result.confidence, result.explanation
    );
    if verbose {
        let a = &report.analysis;
        out.push_str(&format!(
            " → Scores: fake={} trust={} total={} ({:?}, {} tokens)\n",
            a.fake_score, a.trust_score, a.total_score, a.branch, a.token_count
        ));
        for s in &a.signals {
            out.push_str(&format!("    - {} ({:+})\n", s.category.as_str(), s.weight));
        }
    }
    out
}

pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[HeadlineReport],
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = if verbose {
                serde_json::to_string_pretty(reports)?
            } else {
                let results: Vec<_> = reports
                    .iter()
                    .map(|r| serde_json::json!({ "headline": r.headline, "result": r.analysis.result }))
                    .collect();
                serde_json::to_string_pretty(&results)?
            };
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Text => {
            for report in reports {
                writeln!(out, "{}", format_report(report, verbose))?;
            }
        }
    }
    Ok(())
}

// ============ CLI ============

pub fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

pub fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

const VALUE_FLAGS: &[&str] = &["--config-dir", "--format"];

/// Positional arguments: everything that is neither a flag nor a flag's value
fn positional_args(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.clone());
    }
    out
}

fn load_cli_config(args: &[String]) -> Result<AppConfig> {
    let store = match parse_arg_value(args, "--config-dir") {
        Some(dir) => ConfigStore::new(PathBuf::from(dir)),
        None => match ConfigStore::open_default() {
            Ok(store) => store,
            Err(_) => return Ok(AppConfig::default()),
        },
    };
    store
        .load()
        .with_context(|| format!("loading {}", store.config_file().display()))
}

/// `--json` wins over `--format`, which wins over the configured default
fn resolve_format(args: &[String], config: &AppConfig) -> Result<OutputFormat> {
    if has_flag(args, "--json") {
        return Ok(OutputFormat::Json);
    }
    match parse_arg_value(args, "--format") {
        Some(value) => Ok(value.parse::<OutputFormat>()?),
        None => Ok(config.detection.output_format),
    }
}

const USAGE: &str = "Usage:\n  truthsense [--json | --format <text|json>] [--verbose] [--config-dir <dir>] [headline ...]\n\nNotes:\n  - Without headline arguments, headlines are read from stdin, one per line (blank lines skipped).\n  - A rule table under \"rules\" in config.json replaces the built-in one.\n  - Logs go to TRUTHSENSE_LOG_DIR (or the platform data dir); TRUTHSENSE_DISABLE_FILE_LOG=1 keeps them on stderr.";

/// Entry point of the `truthsense` binary
pub fn run() -> Result<()> {
    let start = Instant::now();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    init_logging();

    let config = load_cli_config(&args)?;
    let classifier = config.classifier().context("building classifier from config")?;

    let format = resolve_format(&args, &config)?;
    let verbose = has_flag(&args, "--verbose");

    let mut headlines = positional_args(&args);
    if headlines.is_empty() {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("reading headlines from stdin")?;
            if !line.trim().is_empty() {
                headlines.push(line);
            }
        }
    }

    let reports = api::detect_headlines_with(&classifier, &headlines);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_reports(&mut out, &reports, format, verbose)?;

    info!(
        headlines = reports.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "cli.completed"
    );
    Ok(())
}
