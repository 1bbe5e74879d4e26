//! Evaluation output.

use std::fmt::Write as _;

use miscrit_calc::{Attack, DamageRange, DamageResult, Evaluation, Miscrit};
use miscrit_common::{StatBlock, StatKind};
use serde::Serialize;

/// JSON view of an evaluation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    /// Attacker name.
    pub attacker: &'a str,
    /// Defender name.
    pub defender: &'a str,
    /// Defender elements.
    pub defender_elements: &'a [String],
    /// Evaluated attack.
    pub attack: &'a Attack,
    /// Attacker snapshot.
    pub attacker_stats: StatBlock,
    /// Defender snapshot.
    pub defender_stats: StatBlock,
    /// Damage breakdown.
    pub result: &'a DamageResult,
    /// Main total plus true damage.
    pub total_with_true_damage: Option<DamageRange>,
    /// Main total plus chained hit.
    pub combined_total: Option<DamageRange>,
    /// Combined total plus true damage.
    pub combined_with_true_damage: Option<DamageRange>,
    /// Hits to knock out the defender.
    pub hits_to_ko: Option<u32>,
}

impl<'a> JsonReport<'a> {
    /// Build the JSON view.
    #[must_use]
    pub fn new(evaluation: &'a Evaluation<'a>) -> Self {
        Self {
            attacker: &evaluation.attacker.name,
            defender: &evaluation.defender.name,
            defender_elements: &evaluation.defender.elements,
            attack: &evaluation.attack,
            attacker_stats: evaluation.attacker_stats,
            defender_stats: evaluation.defender_stats,
            result: &evaluation.result,
            total_with_true_damage: evaluation.total_with_true_damage(),
            combined_total: evaluation.combined_total(),
            combined_with_true_damage: evaluation.combined_with_true_damage(),
            hits_to_ko: evaluation.hits_to_ko,
        }
    }
}

/// `PA 60 · EA 60 · ...`
#[must_use]
pub fn format_stats(stats: &StatBlock) -> String {
    StatKind::ALL
        .iter()
        .map(|&kind| format!("{kind} {}", stats.get(kind)))
        .collect::<Vec<_>>()
        .join(" · ")
}

fn format_elements(elements: &[String]) -> String {
    if elements.is_empty() {
        "none".to_string()
    } else {
        elements.join("/")
    }
}

fn format_multiplier(multiplier: f64) -> String {
    format!("x{multiplier:.2}")
}

/// Render an evaluation as text.
#[must_use]
pub fn render_text(evaluation: &Evaluation<'_>, avg_def: bool) -> String {
    let mut out = String::new();
    let result = &evaluation.result;
    let main = &result.main;
    let attack = &evaluation.attack;

    let _ = writeln!(
        out,
        "{} ({}) -> {} ({})",
        evaluation.attacker.name,
        format_elements(&evaluation.attacker.elements),
        evaluation.defender.name,
        format_elements(&evaluation.defender.elements),
    );
    let _ = writeln!(out, "Attacker: {}", format_stats(&evaluation.attacker_stats));
    let _ = writeln!(
        out,
        "Defender: {}{}",
        format_stats(&evaluation.defender_stats),
        if avg_def { " (avg def)" } else { "" }
    );
    let _ = writeln!(
        out,
        "Attack:   {} [{}] AP {} x{}",
        attack.name, main.element, attack.ap, main.hits
    );
    let _ = writeln!(
        out,
        "Per hit:  {}  ({}, atk/def {})",
        main.per.range(),
        format_multiplier(main.elem_mul),
        main.atk_def_ratio
    );
    let _ = writeln!(out, "Total:    {}", main.total);
    if let Some(total) = evaluation.total_with_true_damage() {
        let _ = writeln!(out, "  + true damage {}: {total}", result.true_damage);
    }

    if let Some(extra) = &result.extra {
        let _ = writeln!(
            out,
            "Chained:  {} [{}] AP {}: {}  ({}, atk/def {})",
            extra.name,
            extra.element,
            extra.ap,
            extra.per.range(),
            format_multiplier(extra.elem_mul),
            extra.atk_def_ratio
        );
    }
    if let Some(combined) = evaluation.combined_total() {
        let _ = writeln!(out, "Combined: {combined}");
    }
    if let Some(combined) = evaluation.combined_with_true_damage() {
        let _ = writeln!(out, "  + true damage {}: {combined}", result.true_damage);
    }

    match evaluation.hits_to_ko {
        Some(hits) => {
            let _ = writeln!(out, "Hits to KO: {hits} (HP {})", evaluation.defender_stats.hp);
        },
        None => {
            let _ = writeln!(out, "Hits to KO: n/a");
        },
    }
    out
}

/// One roster line: name, elements, stats and origin.
#[must_use]
pub fn render_miscrit(miscrit: &Miscrit) -> String {
    let origin = match &miscrit.base_name {
        Some(base) => format!("  (custom, from {base})"),
        None => String::new(),
    };
    format!(
        "{} [{}] {}{origin}",
        miscrit.name,
        format_elements(&miscrit.elements),
        format_stats(&miscrit.stats)
    )
}
