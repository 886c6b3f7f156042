//! ico-harvest main entry point
//!
//! This is the command-line interface for the ico-harvest ICO event crawler.
//!
//! Exit codes are part of the contract with whatever scheduler re-invokes
//! this tool: 0 = complete, 1 = list-phase fatal, 2 = traffic-phase fatal,
//! 3 = report-write fatal, 4 = crawl incomplete (re-invoke later),
//! 10 = configuration/setup failure.

use clap::Parser;
use ico_harvest::config::load_config_with_hash;
use ico_harvest::crawler::{run_harvest, RunOutcome};
use ico_harvest::page::HttpPageReader;
use ico_harvest::traffic::HttpTrafficSource;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_INCOMPLETE: u8 = 4;
const EXIT_SETUP: u8 = 10;

/// ico-harvest: a resumable ICO event crawler
///
/// Crawls ICO event listings, enriches them with website traffic metrics,
/// and emits a CSV report. Crawl state is persisted after each phase, so an
/// interrupted run picks up where it left off on the next invocation.
#[derive(Parser, Debug)]
#[command(name = "ico-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A resumable ICO event crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::from(EXIT_SETUP);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return ExitCode::SUCCESS;
    }

    // Build the collaborators
    let reader = match HttpPageReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            tracing::error!("Failed to build page reader: {}", e);
            return ExitCode::from(EXIT_SETUP);
        }
    };
    let traffic_source = match HttpTrafficSource::new(config.traffic.endpoint.clone()) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to build traffic source: {}", e);
            return ExitCode::from(EXIT_SETUP);
        }
    };

    match run_harvest(&reader, &traffic_source, &config).await {
        Ok(RunOutcome::Complete { report_path }) => {
            tracing::info!("All jobs finished; report at {}", report_path.display());
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Incomplete) => {
            tracing::warn!("Crawl incomplete; re-invoke to finish the remaining work");
            ExitCode::from(EXIT_INCOMPLETE)
        }
        Err(failure) => {
            tracing::error!("{}", failure);
            ExitCode::from(failure.exit_code())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ico_harvest=info,warn"),
            1 => EnvFilter::new("ico_harvest=debug,info"),
            2 => EnvFilter::new("ico_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &ico_harvest::config::Config, config_hash: &str) {
    println!("=== ico-harvest Dry Run ===\n");

    println!("Crawl:");
    println!("  Source: {}", config.crawl.source);
    println!("  Deadline: {}", config.crawl.deadline);
    println!("  Traffic lookup interval: {}ms", config.crawl.interval_ms);
    println!("  Run name: {}", config.crawl.name);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);
    println!(
        "  State file: {}/icoEvent({}).json",
        config.output.data_dir, config.crawl.name
    );

    println!("\nTraffic service:");
    println!("  Endpoint: {}", config.traffic.endpoint);

    println!("\nConfig hash: {}", config_hash);
    println!("\n✓ Configuration is valid");
}
