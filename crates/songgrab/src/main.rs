mod display;
mod logging;
mod prompt;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use songgrab_config::{
    CONFIG_KEYS, SonggrabConfigData, get_config_value, load_config, open_in_editor,
    resolve_base_url, resolve_logfile, resolve_max_fuzzy_matches, resolve_savedir,
    resolve_search_size, resolve_sources, set_config_value,
};
use songgrab_core::{MatchOutcome, MatchTarget, SonggrabError, SonggrabResult};
use songgrab_match::{
    BatchReport, BatchRunner, DownloadCoordinator, MatchPolicy, Matcher, ReportPaths, SongFetcher,
    read_targets,
};
use songgrab_provider::BridgeClient;
use tracing::info;

use crate::display::TerminalObserver;
use crate::logging::init_logging;
use crate::prompt::TerminalPicker;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search, match and download one song
    Down {
        singer: String,
        title: String,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Search, match and download every (singer, title) row of a CSV file
    Csvdown {
        csvpath: PathBuf,
        /// Report of downloaded songs
        #[arg(long = "ok-csv", default_value = "ok.csv")]
        ok_csv: PathBuf,
        /// Report of songs skipped because they already exist
        #[arg(long = "skip-csv", default_value = "skip.csv")]
        skip_csv: PathBuf,
        /// Report of songs that could not be matched or downloaded
        #[arg(long = "failed-csv", default_value = "failed.csv")]
        failed_csv: PathBuf,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug)]
struct RunOptions {
    /// Directory downloads are saved to
    #[arg(short = 's', long)]
    savedir: Option<String>,
    /// Log file path
    #[arg(short = 'l', long)]
    logfilepath: Option<String>,
    /// Search and match without downloading
    #[arg(long)]
    dry_run: bool,
    /// Ask for a pick when exact and fuzzy matching both fail
    #[arg(long)]
    manual: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Parser)]
#[command(name = "songgrab")]
#[command(version, about = "Find, match and download songs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { action } => handle_config_command(action),
        Commands::Down {
            singer,
            title,
            options,
        } => run_single(MatchTarget::new(singer, title), &options).await,
        Commands::Csvdown {
            csvpath,
            ok_csv,
            skip_csv,
            failed_csv,
            options,
        } => {
            let paths = ReportPaths {
                ok: ok_csv,
                skip: skip_csv,
                failed: failed_csv,
            };
            run_batch(&csvpath, paths, &options).await
        }
    };

    if let Err(err) = result {
        eprintln!("{} {err}", style("Error:").red());
        std::process::exit(1);
    }
}

fn build_fetcher(options: &RunOptions) -> SonggrabResult<SongFetcher<BridgeClient>> {
    let config = load_config()?;

    let savedir = resolve_savedir(&config, options.savedir.as_deref());
    fs::create_dir_all(&savedir)
        .map_err(|err| SonggrabError::Io(format!("failed to create {savedir}: {err}")))?;
    let logfile = resolve_logfile(&config, options.logfilepath.as_deref());
    init_logging(Path::new(&logfile))?;

    let client = BridgeClient::new(&resolve_base_url(&config), resolve_search_size(&config))?;
    let sources = resolve_sources(&config);
    let policy = MatchPolicy {
        max_fuzzy_matches: resolve_max_fuzzy_matches(&config),
        allow_manual: options.manual,
    };
    info!(
        savedir = %savedir,
        sources = %sources.join(","),
        dry_run = options.dry_run,
        manual = options.manual,
        "starting"
    );

    Ok(SongFetcher::new(
        client,
        sources,
        Matcher::new(policy),
        DownloadCoordinator::new(savedir, options.dry_run),
    ))
}

async fn run_single(target: MatchTarget, options: &RunOptions) -> SonggrabResult<()> {
    let fetcher = build_fetcher(options)?;
    let outcome = fetcher
        .fetch(&target, &mut TerminalPicker, &mut TerminalObserver)
        .await?;
    print_outcome(&target, &outcome, options.dry_run);
    Ok(())
}

async fn run_batch(csvpath: &Path, paths: ReportPaths, options: &RunOptions) -> SonggrabResult<()> {
    let fetcher = build_fetcher(options)?;
    let targets = read_targets(csvpath)?;
    info!(path = %csvpath.display(), targets = targets.len(), "loaded batch");

    let report = BatchRunner::new(&fetcher)
        .run(&targets, &mut TerminalPicker, &mut TerminalObserver)
        .await?;

    if !options.dry_run {
        for path in report.write(&paths)? {
            println!("{} {}", style("Wrote").green(), path.display());
        }
    }
    print_summary(&report);
    Ok(())
}

fn print_outcome(target: &MatchTarget, outcome: &MatchOutcome, dry_run: bool) {
    if dry_run {
        println!(
            "{} {} matched for {}",
            style("Dry run:").cyan(),
            outcome.matched_list.len(),
            target.file_stem()
        );
        return;
    }
    if outcome.success_list.is_empty() {
        println!("{} {}", style("Failed").red(), target.file_stem());
        return;
    }
    for song in &outcome.success_list {
        println!(
            "{} {} [{}]",
            style("✓").green(),
            song.display_name(),
            song.source
        );
    }
}

fn print_summary(report: &BatchReport) {
    let total = report.ok.len() + report.skip.len() + report.failed.len();
    println!(
        "{} Total: {} | Ok: {} | Skipped: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        report.ok.len(),
        report.skip.len(),
        report.failed.len()
    );
}

fn handle_config_command(action: ConfigAction) -> SonggrabResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_config_value(&config, &key) {
                Some(v) => println!("{} = {}", key, v),
                None => println!("{} = <null>", key),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            print_config(&config);
            Ok(())
        }
        ConfigAction::Edit => open_in_editor(),
    }
}

fn print_config(config: &SonggrabConfigData) {
    println!("Current configuration:");
    let mut section = "";
    for key in CONFIG_KEYS {
        let (name, field) = key.split_once('.').unwrap_or(("", key));
        if name != section {
            println!("\n[{name}]");
            section = name;
        }
        let value = get_config_value(config, key).unwrap_or_else(|| "<null>".to_string());
        println!("{field} = {value}");
    }
}
