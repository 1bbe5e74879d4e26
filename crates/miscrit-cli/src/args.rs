//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use miscrit_common::StatKind;

/// A single stat assignment.
pub type StatOverride = (StatKind, u32);

/// Parse a stat override such as `PA=100`.
pub fn parse_stat(text: &str) -> Result<StatOverride, String> {
    let invalid = || format!("expected KEY=N with KEY one of PA, EA, PD, ED, SPD, HP, got {text:?}");
    let (key, value) = text.split_once('=').ok_or_else(invalid)?;
    let kind = StatKind::from_key(key).ok_or_else(invalid)?;
    let value = value.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((kind, value))
}

/// Miscrits damage calculator.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "miscalc", version)]
#[command(about = "Miscrits damage calculator")]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Entity database, overriding the configured one
    #[arg(long = "db", global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// What to run; a bare invocation runs `calc` with its defaults
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The command to run, defaulting to `calc`.
    pub fn into_command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Calc(CalcArgs::default()))
    }
}

/// Top-level command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Evaluate one matchup
    Calc(CalcArgs),

    /// List the roster
    List {
        /// Only custom miscrits
        #[arg(long = "custom")]
        custom_only: bool,
    },

    /// Manage custom profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Write the effective configuration to the config file
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Options of a damage calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Args)]
pub struct CalcArgs {
    /// Attacker name; defaults to the first visible miscrit
    pub attacker: Option<String>,

    /// Defender name; defaults to the second visible miscrit
    pub defender: Option<String>,

    /// Attack to evaluate; defaults to the strongest
    #[arg(long, value_name = "NAME")]
    pub attack: Option<String>,

    /// Use the enhanced attack tab
    #[arg(long, conflicts_with = "base")]
    pub enhanced: bool,

    /// Use the base attack tab
    #[arg(long)]
    pub base: bool,

    /// Remap defender PD/ED to the average tier
    #[arg(long)]
    pub avg_def: bool,

    /// Swap attacker and defender
    #[arg(long)]
    pub swap: bool,

    /// Only pick custom miscrits as attacker
    #[arg(long)]
    pub custom_attacker: bool,

    /// Only pick custom miscrits as defender
    #[arg(long)]
    pub custom_defender: bool,

    /// Override an attacker stat (PA, EA, PD, ED, SPD, HP)
    #[arg(long = "attacker-stat", value_name = "KEY=N", value_parser = parse_stat)]
    pub attacker_stats: Vec<StatOverride>,

    /// Override a defender stat
    #[arg(long = "defender-stat", value_name = "KEY=N", value_parser = parse_stat)]
    pub defender_stats: Vec<StatOverride>,

    /// Print the evaluation as JSON
    #[arg(long)]
    pub json: bool,
}

impl CalcArgs {
    /// Requested attack tab: `Some(true)` for enhanced, `None` to use the config.
    pub fn enhanced_tab(&self) -> Option<bool> {
        match (self.enhanced, self.base) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Profile subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ProfileCommand {
    /// List stored profiles
    #[command(name = "ls", visible_alias = "list")]
    List,

    /// Create a profile from a base miscrit
    Add {
        /// Base miscrit
        base: String,
        /// Requested name; defaults to "<BASE> (Own)"
        #[arg(long)]
        name: Option<String>,
        /// Stat edits on top of the base stats
        #[arg(long = "stat", value_name = "KEY=N", value_parser = parse_stat)]
        stats: Vec<StatOverride>,
    },

    /// Modify a profile
    Edit {
        /// Profile being edited
        target: String,
        /// New base miscrit
        #[arg(long)]
        base: Option<String>,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Stat edits on top of the current stats
        #[arg(long = "stat", value_name = "KEY=N", value_parser = parse_stat)]
        stats: Vec<StatOverride>,
    },

    /// Delete a profile
    #[command(name = "rm", visible_alias = "delete")]
    Remove {
        /// Profile name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse_str(line: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("miscalc").chain(line.split_whitespace()))
    }

    fn calc_args(line: &str) -> CalcArgs {
        match parse_str(line).expect("valid command line").into_command() {
            Command::Calc(args) => args,
            other => panic!("expected calc, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_calc() {
        let cli = parse_str("").expect("empty command line");
        assert_eq!(cli.command, None);
        assert_eq!(cli.into_command(), Command::Calc(CalcArgs::default()));
    }

    #[test]
    fn test_calc_positionals_and_flags() {
        let cli = parse_str("--db other.json calc Flue Tulipsy --attack Ember --avg-def --enhanced --json")
            .expect("valid command line");
        assert_eq!(cli.database, Some(PathBuf::from("other.json")));
        let Command::Calc(args) = cli.into_command() else {
            panic!("expected calc");
        };
        assert_eq!(args.attacker.as_deref(), Some("Flue"));
        assert_eq!(args.defender.as_deref(), Some("Tulipsy"));
        assert_eq!(args.attack.as_deref(), Some("Ember"));
        assert_eq!(args.enhanced_tab(), Some(true));
        assert!(args.avg_def);
        assert!(args.json);
    }

    #[test]
    fn test_attack_tab_flags() {
        assert_eq!(calc_args("calc").enhanced_tab(), None);
        assert_eq!(calc_args("calc --base").enhanced_tab(), Some(false));
        let err = parse_str("calc --base --enhanced").expect_err("conflicting tabs");
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_stat_overrides() {
        assert_eq!(parse_stat("pa=120"), Ok((StatKind::PhysicalAttack, 120)));
        assert_eq!(parse_stat("HP = 200"), Ok((StatKind::HitPoints, 200)));
        assert!(parse_stat("XX=1").is_err());
        assert!(parse_stat("PA=-1").is_err());
        assert!(parse_stat("PA").is_err());

        let args = calc_args("calc --defender-stat ED=90 --defender-stat hp=10");
        assert_eq!(
            args.defender_stats,
            vec![(StatKind::ElementalDefense, 90), (StatKind::HitPoints, 10)]
        );

        let err = parse_str("calc --attacker-stat PA").expect_err("bad override");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_profile_commands() {
        let cli = parse_str("profile add Flue --name Blaze --stat SPD=99").expect("valid command line");
        assert_eq!(
            cli.into_command(),
            Command::Profile(ProfileCommand::Add {
                base: "Flue".to_string(),
                name: Some("Blaze".to_string()),
                stats: vec![(StatKind::Speed, 99)],
            })
        );

        let cli = parse_str("profile edit Blaze --base Sparkupine").expect("valid command line");
        assert!(matches!(
            cli.into_command(),
            Command::Profile(ProfileCommand::Edit { base: Some(_), .. })
        ));

        let cli = parse_str("--config a.toml profile rm Blaze").expect("valid command line");
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert_eq!(
            cli.into_command(),
            Command::Profile(ProfileCommand::Remove {
                name: "Blaze".to_string()
            })
        );

        let cli = parse_str("profile list").expect("alias");
        assert_eq!(cli.into_command(), Command::Profile(ProfileCommand::List));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = parse_str("list --custom --db other.json").expect("valid command line");
        assert_eq!(cli.database, Some(PathBuf::from("other.json")));
        assert_eq!(cli.into_command(), Command::List { custom_only: true });

        let cli = parse_str("init --force").expect("valid command line");
        assert_eq!(cli.into_command(), Command::Init { force: true });
    }

    #[test]
    fn test_errors() {
        let err = parse_str("--config").expect_err("missing value");
        assert_eq!(err.kind(), ErrorKind::InvalidValue);

        let err = parse_str("calc a b c").expect_err("extra positional");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse_str("calc --frobnicate").expect_err("unknown flag");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse_str("profile").expect_err("missing profile action");
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ));

        let err = parse_str("profile add Flue --base X").expect_err("base not allowed on add");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help() {
        let err = parse_str("--help").expect_err("help exits early");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
