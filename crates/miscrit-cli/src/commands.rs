//! Command glue between parsed arguments and the engine.
//!
//! Everything here returns values instead of printing, so `main` only
//! formats the outcome.

use std::path::Path;

use anyhow::{bail, Context, Result};
use miscrit_calc::{
    evaluate, AttackTab, CustomProfile, Evaluation, ProfileBook, ProfileDraft, ProfileError,
    ProfileRepository, Role, Roster, Session,
};
use miscrit_common::StatBlock;
use tracing::info;

use crate::args::{CalcArgs, StatOverride};
use crate::config::CalcConfig;

/// Whether the average-tier remap is on for this invocation.
pub fn avg_def_enabled(args: &CalcArgs, config: &CalcConfig) -> bool {
    args.avg_def || config.avg_def
}

fn apply_overrides(mut stats: StatBlock, overrides: &[StatOverride]) -> StatBlock {
    for &(kind, value) in overrides {
        stats.set(kind, value);
    }
    stats
}

/// Build the session `args` describe and evaluate it.
///
/// Filters and selections come first, then the tab and the remap, then the
/// swap, and stat overrides last so they apply to the final roles.
pub fn evaluate_matchup<'r>(
    args: &CalcArgs,
    config: &CalcConfig,
    roster: &'r Roster,
) -> Result<Evaluation<'r>> {
    if roster.is_empty() {
        bail!("The database has no miscrits");
    }

    let mut session = Session::new(roster);
    session.set_custom_only(roster, Role::Attacker, args.custom_attacker);
    session.set_custom_only(roster, Role::Defender, args.custom_defender);

    for (role, name) in [(Role::Attacker, &args.attacker), (Role::Defender, &args.defender)] {
        if let Some(name) = name {
            if !session.select(roster, role, name) {
                bail!("Unknown miscrit: {name}");
            }
        }
        if session.name(role).is_none() {
            bail!("No custom miscrits to pick as {role:?}");
        }
    }

    let tab = if args.enhanced_tab().unwrap_or(config.enhanced) {
        AttackTab::Enhanced
    } else {
        AttackTab::Base
    };
    session.set_tab(roster, tab);
    session.set_avg_def(roster, avg_def_enabled(args, config));

    if args.swap {
        session.swap(roster);
    }
    for &(kind, value) in &args.attacker_stats {
        session.set_stat(Role::Attacker, kind, value);
    }
    for &(kind, value) in &args.defender_stats {
        session.set_stat(Role::Defender, kind, value);
    }
    if let Some(attack) = &args.attack {
        session.select_attack(attack.clone());
    }

    let Some(evaluation) = evaluate(roster, &session) else {
        bail!(
            "{} has no {tab:?} attacks",
            session.name(Role::Attacker).unwrap_or("The attacker")
        );
    };
    if let Some(requested) = &args.attack {
        if evaluation.attack.name != *requested {
            let known: Vec<&str> = evaluation.attacks.iter().map(|a| a.name.as_str()).collect();
            bail!("Unknown attack {requested:?}; available: {}", known.join(", "));
        }
    }
    Ok(evaluation)
}

/// Create a profile from a base miscrit plus stat edits.
pub fn create_profile<R: ProfileRepository>(
    book: &mut ProfileBook<R>,
    roster: &Roster,
    base: String,
    name: Option<String>,
    stats: &[StatOverride],
) -> Result<CustomProfile> {
    let base_stats = roster
        .base()
        .iter()
        .find(|m| m.name == base)
        .map_or(StatBlock::DEFAULT_PROFILE, |m| m.stats);
    let draft = ProfileDraft {
        base_name: base,
        name: name.unwrap_or_default(),
        stats: apply_overrides(base_stats, stats),
    };
    let saved = book.save(&draft, roster, None)?;
    info!("Created custom profile {:?}", saved.name);
    Ok(saved)
}

/// Edit a stored profile; unset fields keep their current values.
pub fn edit_profile<R: ProfileRepository>(
    book: &mut ProfileBook<R>,
    roster: &Roster,
    target: &str,
    base: Option<String>,
    name: Option<String>,
    stats: &[StatOverride],
) -> Result<CustomProfile> {
    let existing = book
        .get(target)
        .cloned()
        .ok_or_else(|| ProfileError::NotFound(target.to_string()))?;
    let draft = ProfileDraft {
        base_name: base.unwrap_or(existing.base_name),
        name: name.unwrap_or(existing.name),
        stats: apply_overrides(existing.stats, stats),
    };
    let saved = book.save(&draft, roster, Some(target))?;
    info!("Updated custom profile {:?}", saved.name);
    Ok(saved)
}

/// Write `config` to `path`, refusing to replace a file unless `force`.
pub fn init_config(config: &CalcConfig, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    config
        .save_to(path)
        .with_context(|| format!("Could not write {}", path.display()))
}
