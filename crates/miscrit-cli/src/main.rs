//! # Miscalc
//!
//! Command-line front end for the Miscrits damage calculator.
//!
//! This binary ties together:
//! - Configuration (`miscalc.toml`)
//! - The entity database file
//! - The custom-profile store
//! - One evaluation per invocation, printed as text or JSON

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod args;
mod commands;
mod config;
mod db_loader;
mod profile_store;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use miscrit_calc::{ProfileBook, Roster};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{CalcArgs, Cli, Command, ProfileCommand};
use crate::config::CalcConfig;
use crate::profile_store::JsonFileRepository;

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(CalcConfig::config_path);
    let mut config = CalcConfig::load_from(&config_path);
    if let Some(database) = &cli.database {
        config.database_path.clone_from(database);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!("Version: {}", env!("CARGO_PKG_VERSION"));
    match cli.into_command() {
        Command::Init { force } => {
            commands::init_config(&config, &config_path, force)?;
            println!("Wrote {}", config_path.display());
            Ok(())
        },
        command => run(command, &config),
    }
}

fn run(command: Command, config: &CalcConfig) -> Result<()> {
    let mut roster = db_loader::load_database(&config.database_path).with_context(|| {
        format!("Could not load database {}", config.database_path.display())
    })?;

    let repository = JsonFileRepository::in_dir(&config.store_dir);
    debug!("Profile store: {}", repository.path().display());
    let mut book = ProfileBook::open(repository);
    roster.apply_profiles(book.profiles());

    match command {
        Command::List { custom_only } => {
            for miscrit in roster.iter().filter(|m| !custom_only || m.is_custom()) {
                println!("{}", report::render_miscrit(miscrit));
            }
        },
        Command::Profile(command) => run_profile(command, &mut book, &roster)?,
        Command::Calc(args) => run_calc(&args, config, &roster)?,
        Command::Init { .. } => {},
    }
    Ok(())
}

fn run_profile(
    command: ProfileCommand,
    book: &mut ProfileBook<JsonFileRepository>,
    roster: &Roster,
) -> Result<()> {
    match command {
        ProfileCommand::List => {
            for profile in book.profiles() {
                println!(
                    "{} (from {}) {}",
                    profile.name,
                    profile.base_name,
                    report::format_stats(&profile.stats)
                );
            }
        },
        ProfileCommand::Add { base, name, stats } => {
            let saved = commands::create_profile(book, roster, base, name, &stats)?;
            println!("Saved {}", saved.name);
        },
        ProfileCommand::Edit {
            target,
            base,
            name,
            stats,
        } => {
            let saved = commands::edit_profile(book, roster, &target, base, name, &stats)?;
            println!("Saved {}", saved.name);
        },
        ProfileCommand::Remove { name } => {
            book.delete(&name)?;
            info!("Deleted custom profile {name:?}");
            println!("Deleted {name}");
        },
    }
    Ok(())
}

fn run_calc(args: &CalcArgs, config: &CalcConfig, roster: &Roster) -> Result<()> {
    let evaluation = commands::evaluate_matchup(args, config, roster)?;
    if args.json {
        let json = serde_json::to_string_pretty(&report::JsonReport::new(&evaluation))?;
        println!("{json}");
    } else {
        print!(
            "{}",
            report::render_text(&evaluation, commands::avg_def_enabled(args, config))
        );
    }
    Ok(())
}
