use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mav_gtfs::config::FeedConfig;
use mav_gtfs::domain::start_of_day;
use mav_gtfs::gtfs::write_feed;
use mav_gtfs::pipeline::{FeedRequest, build_feed};
use mav_gtfs::source::{HttpSource, SnapshotSource, SourceConfig, TransitSource};

#[derive(Parser)]
#[command(name = "mav-gtfs")]
#[command(version, disable_version_flag = true, arg = version_flag())]
#[command(about = "Build a GTFS feed of MÁV trains for a window of days", long_about = None)]
struct Cli {
    /// First day of the feed (DD.MM.YYYY)
    #[arg(value_name = "START", value_parser = parse_day)]
    start: NaiveDate,

    /// Last day of the feed (DD.MM.YYYY)
    #[arg(value_name = "END", value_parser = parse_day)]
    end: NaiveDate,

    /// Directory to write the feed tables to
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Read upstream data from a JSON snapshot instead of the API
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Base URL of the upstream API
    #[arg(long, env = "MAV_API_URL")]
    api_url: Option<String>,

    /// API key sent as x-apikey
    #[arg(long, env = "MAV_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum upstream requests in flight
    #[arg(long, default_value_t = mav_gtfs::config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Deadline for a single request attempt, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Attempts per request before it is dropped
    #[arg(long, default_value_t = mav_gtfs::config::DEFAULT_MAX_ATTEMPTS)]
    attempts: u32,
}

/// `-v` and `--version`; clap's own flag only answers to `-V`.
fn version_flag() -> clap::Arg {
    clap::Arg::new("version")
        .short('v')
        .long("version")
        .action(clap::ArgAction::Version)
        .help("Print version")
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%d.%m.%Y").map_err(|e| format!("expected DD.MM.YYYY: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = FeedConfig::default()
        .with_concurrency(cli.concurrency)
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_max_attempts(cli.attempts);

    let tz = config.timezone;
    let request = FeedRequest::new(
        start_of_day(cli.start, tz).with_timezone(&Utc),
        start_of_day(cli.end, tz).with_timezone(&Utc),
    );

    if let Some(path) = &cli.snapshot {
        let source = SnapshotSource::load(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        return run(&source, &request, &config, &cli.directory).await;
    }

    let Some(base_url) = cli.api_url else {
        bail!("no upstream configured: pass --snapshot or set MAV_API_URL");
    };
    let mut source_config = SourceConfig::new(base_url);
    if let Some(key) = cli.api_key {
        source_config = source_config.with_api_key(key);
    }
    let source = HttpSource::new(source_config).context("creating API client")?;

    run(&source, &request, &config, &cli.directory).await
}

async fn run<S: TransitSource>(
    source: &S,
    request: &FeedRequest,
    config: &FeedConfig,
    directory: &Path,
) -> Result<()> {
    let output = build_feed(source, request, config, Utc::now())
        .await
        .context("building feed")?;

    for (table, rows) in output.tables.row_counts() {
        info!(table, rows, "table");
    }

    let files = write_feed(&output.tables, directory)
        .with_context(|| format!("writing feed to {}", directory.display()))?;

    info!(files, stats = ?output.stats, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn version_flags() {
        for flag in ["--version", "-v"] {
            let err = Cli::try_parse_from(["mav-gtfs", flag]).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        }
    }

    #[test]
    fn parses_dotted_dates() {
        let cli = Cli::try_parse_from(["mav-gtfs", "20.10.2026", "21.10.2026", "out"]).unwrap();
        assert_eq!(cli.start, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(cli.end, NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());
        assert!(Cli::try_parse_from(["mav-gtfs", "2026-10-20", "21.10.2026", "out"]).is_err());
    }
}
