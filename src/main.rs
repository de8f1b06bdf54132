//! Command-line front end.
//!
//! Runs one intent against the cache and provider, then prints the resulting
//! feed as text or as the JSON view model.
//!
//! ```text
//! news-brief                        # today's brief, cache-first
//! news-brief --date 2024-05-01      # another day
//! news-brief --refresh              # bypass the cache for the selected day
//! news-brief --search "agents"      # free-text search, no date load
//! news-brief --open 2024-05-01-3    # show one item in full
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use news_brief::observability::init_tracing;
use news_brief::{dispatch, initialize, parse_date, Config, Intent};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "news-brief")]
#[command(about = "Daily AI news briefs with a local cache", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults to <config_dir>/news-brief/config.toml
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Date to show, YYYY-MM-DD. Defaults to today
    #[arg(long, short, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Fetch the date again even if it is cached
    #[arg(long, short)]
    refresh: bool,

    /// Search for this text instead of showing a date
    #[arg(long, short, conflicts_with = "date")]
    search: Option<String>,

    /// Open the displayed item with this id
    #[arg(long)]
    open: Option<String>,

    /// Print the view model as JSON
    #[arg(long)]
    json: bool,

    /// Render width in columns
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Also log to stderr
    #[arg(long, short)]
    verbose: bool,
}

/// First operation of a run.
#[derive(Debug, PartialEq, Eq)]
enum Startup {
    Search(String),
    Date { date: NaiveDate, force_refresh: bool },
}

/// Picks the single fetch a run starts with. A search skips the date load,
/// and `--refresh` on a date bypasses the cache directly.
fn startup(cli: &Cli, today: NaiveDate) -> Startup {
    match cli.search.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => Startup::Search(query.to_string()),
        _ => Startup::Date {
            date: cli.date.unwrap_or(today),
            force_refresh: cli.refresh,
        },
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("news-brief").join("config.toml"))
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => Config::load(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    config.log_to_stderr |= cli.verbose;
    init_tracing(&config);

    let orchestrator = initialize(&config).context("failed to initialize")?;

    let today = orchestrator.snapshot().selected_date();
    match startup(&cli, today) {
        Startup::Search(query) => {
            dispatch(&orchestrator, Intent::SearchSubmitted(query)).await;
        }
        Startup::Date {
            date,
            force_refresh: true,
        } => orchestrator.load_brief(date, true).await,
        Startup::Date { date, .. } => {
            dispatch(&orchestrator, Intent::DatePicked(date)).await;
        }
    }
    if let Some(id) = cli.open {
        if !dispatch(&orchestrator, Intent::ItemOpened(id.clone())).await {
            eprintln!("no displayed item with id {id}");
        }
    }

    let vm = orchestrator.view_model();
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&vm).context("failed to serialize view model")?
        );
    } else {
        print!("{}", news_brief::ui::render(&vm, cli.width));
    }

    orchestrator.shutdown();
    Ok(())
}
