//! Crossword Fetch main entry point
//!
//! This is the command-line interface for downloading printable crosswords.

use anyhow::Context;
use clap::Parser;
use crossword_fetch::config::{load_config_or_default, Config};
use crossword_fetch::crawler::crawl;
use crossword_fetch::prompt::{Prompter, TerminalPrompter};
use crossword_fetch::query::{parse_date, puzzle_type_name, SearchQuery, PUZZLE_TYPES};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crossword Fetch: download printable crosswords from the puzzle club
///
/// Searches the club listing for a puzzle type and publication date range and
/// saves every printable crossword it finds. Anything not given on the command
/// line is asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "crossword-fetch")]
#[command(version = "1.0.0")]
#[command(about = "Download printable crosswords", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Puzzle type code (see --list-types)
    #[arg(short = 't', long = "type", value_name = "CODE")]
    puzzle_type: Option<String>,

    /// First publication date, dd/mm/yyyy
    #[arg(long, value_name = "DATE", value_parser = date_arg)]
    from: Option<String>,

    /// Last publication date, dd/mm/yyyy
    #[arg(long, value_name = "DATE", value_parser = date_arg)]
    to: Option<String>,

    /// Directory to save crosswords into (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Send each saved crossword to the print command
    #[arg(long)]
    print: bool,

    /// List the known puzzle types and exit
    #[arg(long)]
    list_types: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if cli.list_types {
        print_puzzle_types();
        return Ok(());
    }

    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid built-in configuration".to_string(),
        }
    })?;

    if let Some(dir) = &cli.output_dir {
        config.download.output_dir = dir.display().to_string();
    }

    let mut prompter = TerminalPrompter;
    let query = resolve_query(&cli, &mut prompter)?;

    handle_crawl(&config, &query, cli.print, &mut prompter).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crossword_fetch=info,warn"),
            1 => EnvFilter::new("crossword_fetch=debug,info"),
            2 => EnvFilter::new("crossword_fetch=trace,debug"),
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

fn date_arg(value: &str) -> Result<String, String> {
    parse_date(value)
        .map(|_| value.trim().to_string())
        .map_err(|e| format!("expected dd/mm/yyyy: {}", e))
}

fn print_puzzle_types() {
    println!("Crossword types:");
    for (code, name) in PUZZLE_TYPES {
        println!("{}: {}", code, name);
    }
}

/// Builds the search query, asking for anything missing from the command line
fn resolve_query(cli: &Cli, prompter: &mut dyn Prompter) -> anyhow::Result<SearchQuery> {
    let puzzle_type = match &cli.puzzle_type {
        Some(code) => {
            if puzzle_type_name(code).is_none() {
                tracing::warn!("Puzzle type '{}' is not a known type, using it as given", code);
            }
            code.clone()
        }
        None => ask_puzzle_type(prompter)?,
    };

    let from = match &cli.from {
        Some(date) => date.clone(),
        None => ask_date(prompter, "Start Date (dd/mm/yyyy)")?,
    };

    let to = match &cli.to {
        Some(date) => date.clone(),
        None => ask_date(prompter, "End Date (dd/mm/yyyy)")?,
    };

    Ok(SearchQuery::new(puzzle_type, from, to))
}

fn ask_puzzle_type(prompter: &mut dyn Prompter) -> anyhow::Result<String> {
    loop {
        print_puzzle_types();
        let answer = prompter
            .ask("Which Crossword Type?")
            .context("Failed to read crossword type")?;
        if puzzle_type_name(&answer).is_some() {
            return Ok(answer);
        }
    }
}

fn ask_date(prompter: &mut dyn Prompter, label: &str) -> anyhow::Result<String> {
    loop {
        let answer = prompter
            .ask(label)
            .with_context(|| format!("Failed to read {}", label))?;
        match parse_date(&answer) {
            Ok(_) => return Ok(answer),
            Err(e) => println!("Not a dd/mm/yyyy date ({}), try again", e),
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    query: &SearchQuery,
    print: bool,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    match puzzle_type_name(&query.puzzle_type) {
        Some(name) => tracing::info!(
            "Fetching {} crosswords published {} to {}",
            name,
            query.from,
            query.to
        ),
        None => tracing::info!(
            "Fetching type {} crosswords published {} to {}",
            query.puzzle_type,
            query.from,
            query.to
        ),
    }

    match crawl(config, query, print, prompter).await {
        Ok(report) => {
            tracing::info!(
                "Saved {} of {} crosswords to {}",
                report.saved.len(),
                report.found,
                config.download.output_dir
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
