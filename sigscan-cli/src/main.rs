use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::HumanCount;
use sigscan::{
    report::{EVENT_LOG_FILE, FOUND_LIST_FILE, NOT_FOUND_LIST_FILE},
    scan, CliOverrides, RunCounters, ScanConfig,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Lists the files of a directory tree that do and do not contain a byte signature",
    after_help = "Example: sigscan-cli /mnt/evidence /tmp/jobs \"Data Recovery Labs\""
)]
struct Cli {
    /// Source directory to scan recursively
    source_path: PathBuf,

    /// Existing directory for log.txt and the two file lists
    destination_path: PathBuf,

    /// ASCII string to search for in files
    search_pattern: Option<String>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) [default: warn]; RUST_LOG
    /// takes precedence
    #[arg(long)]
    log_level: Option<String>,

    /// Do not draw the running totals
    #[arg(long)]
    no_progress: bool,

    /// Print the final counters as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cli_config = CliOverrides {
        source_path: cli.source_path,
        destination_path: cli.destination_path,
        pattern: cli.search_pattern,
        log_level: cli.log_level,
        show_progress: cli.no_progress.then_some(false),
    };
    let config = ScanConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli_config);

    init_tracing(&config.log_level);
    info!(
        source = ?config.source_path,
        destination = ?config.destination_path,
        "starting scan"
    );

    let counters = scan(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&counters)?);
    } else {
        print_summary(&counters, &config);
    }
    Ok(())
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn print_summary(counters: &RunCounters, config: &ScanConfig) {
    println!(
        "Processed {} bytes in {} files, found {} files with pattern, unable to process {} files",
        HumanCount(counters.bytes_processed),
        HumanCount(counters.files_processed),
        HumanCount(counters.files_matched),
        HumanCount(counters.files_failed)
    );

    let dest = &config.destination_path;
    println!(
        "{} {}",
        "Pattern found:".green(),
        dest.join(FOUND_LIST_FILE).display()
    );
    println!(
        "{} {}",
        "Pattern not found:".blue(),
        dest.join(NOT_FOUND_LIST_FILE).display()
    );

    if counters.files_failed > 0 || counters.directories_failed > 0 {
        eprintln!(
            "{} {} files and {} directories could not be read, see {}",
            "warning:".yellow().bold(),
            HumanCount(counters.files_failed),
            HumanCount(counters.directories_failed),
            dest.join(EVENT_LOG_FILE).display()
        );
    }
}
