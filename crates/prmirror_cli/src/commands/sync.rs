//! The sync command: wire config and flags into the scan engine.

use chrono::{DateTime, NaiveDateTime};
use console::style;

use prmirror::github::GitHubSource;
use prmirror::sync::{scan_owner, scan_repository, ProgressCallback, ScanOptions, ScanOutcome};

use crate::config::Config;
use crate::progress::LoggingReporter;

use super::{ensure_sqlite_dir, CliError};

/// Flags of the `sync` subcommand.
pub struct SyncArgs {
    pub owner: String,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub since: Option<String>,
    pub newest: bool,
    pub batch_size: Option<usize>,
    pub database_url: Option<String>,
}

pub async fn handle_sync(args: SyncArgs, config: &Config) -> Result<(), CliError> {
    let database_url = args
        .database_url
        .or_else(|| config.database_url())
        .ok_or_else(|| CliError::Config("could not determine a database URL".to_string()))?;
    ensure_sqlite_dir(&database_url)?;

    let since = args.since.as_deref().map(parse_since).transpose()?;

    let db = prmirror::connect_and_migrate(&database_url).await?;

    let token = args.token.or_else(|| config.github_token());
    if token.is_none() {
        tracing::warn!("No GitHub token configured; running against the unauthenticated API");
    }
    let source = GitHubSource::new(token.as_deref())?;

    let options = ScanOptions {
        since,
        newest_first: args.newest,
        batch_size: args.batch_size.unwrap_or(config.sync.batch_size),
    };

    let reporter = LoggingReporter::new();
    let callback: ProgressCallback = Box::new(move |event| reporter.handle(event));

    match args.repo {
        Some(name) => {
            let outcome =
                scan_repository(&db, &source, &args.owner, &name, &options, Some(&callback))
                    .await?;
            print_outcome(&args.owner, &name, &outcome);
        }
        None => {
            let scans =
                scan_owner(&db, &source, &args.owner, &options, Some(&callback)).await?;
            let mut failed = 0usize;
            for scan in &scans {
                match &scan.result {
                    Ok(outcome) => print_outcome(&scan.owner, &scan.name, outcome),
                    Err(err) => {
                        failed += 1;
                        eprintln!(
                            "{} {}/{}: {}",
                            style("failed").red().bold(),
                            scan.owner,
                            scan.name,
                            err
                        );
                    }
                }
            }
            if failed > 0 {
                eprintln!(
                    "{} {failed} of {} repositories did not complete",
                    style("warning:").yellow().bold(),
                    scans.len()
                );
            }
        }
    }

    Ok(())
}

/// Parse a `--since` flag as an RFC 3339 instant, normalized to naive UTC.
fn parse_since(value: &str) -> Result<NaiveDateTime, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .map_err(|e| CliError::Config(format!("invalid --since value '{value}': {e}")))
}

fn print_outcome(owner: &str, name: &str, outcome: &ScanOutcome) {
    println!(
        "{} {owner}/{name}: {} pull requests ({} new, {} updated, {} unchanged) in {} batches",
        style("synced").green().bold(),
        outcome.processed,
        outcome.created,
        outcome.updated,
        outcome.unchanged,
        outcome.batches,
    );
    if !outcome.skipped.is_empty() {
        let numbers: Vec<String> = outcome
            .skipped
            .iter()
            .map(|s| format!("#{}", s.number))
            .collect();
        eprintln!(
            "  {} skipped after transient failures: {}",
            style("!").yellow().bold(),
            numbers.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_accepts_rfc3339() {
        let parsed = parse_since("2025-03-01T12:30:00Z").expect("valid instant");
        assert_eq!(parsed.to_string(), "2025-03-01 12:30:00");

        // Offsets normalize to the same naive UTC instant.
        let offset = parse_since("2025-03-01T14:30:00+02:00").expect("valid instant");
        assert_eq!(offset, parsed);
    }

    #[test]
    fn parse_since_rejects_garbage() {
        let err = parse_since("yesterday").expect_err("invalid instant");
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("yesterday"));
    }
}
