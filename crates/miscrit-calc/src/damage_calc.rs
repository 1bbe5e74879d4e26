//! Damage calculation.
//!
//! This module provides:
//! - The deterministic per-hit model (a ±10% band around the expected hit)
//! - Hit-count scaling and chained secondary attacks
//! - Flat true-damage bonuses
//! - Hits-to-knockout estimates
//!
//! Nothing here fails. Degenerate input (zero power, zero stats) produces
//! degenerate but well-formed ranges.

use miscrit_common::StatBlock;
use serde::{Deserialize, Serialize};

use crate::advantage::elemental_multiplier;
use crate::attack::Attack;
use crate::element::is_physical_key;

// ============================================================================
// Damage Range
// ============================================================================

/// A (min, avg, max) damage triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DamageRange {
    /// Lowest roll.
    pub min: i64,
    /// Expected roll.
    pub avg: i64,
    /// Highest roll.
    pub max: i64,
}

impl DamageRange {
    /// Create a range.
    #[must_use]
    pub const fn new(min: i64, avg: i64, max: i64) -> Self {
        Self { min, avg, max }
    }

    /// Scale every component by a hit count.
    #[must_use]
    pub const fn scaled(self, hits: u32) -> Self {
        let hits = hits as i64;
        Self {
            min: self.min.saturating_mul(hits),
            avg: self.avg.saturating_mul(hits),
            max: self.max.saturating_mul(hits),
        }
    }

    /// Pairwise sum with another range.
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self {
            min: self.min.saturating_add(other.min),
            avg: self.avg.saturating_add(other.avg),
            max: self.max.saturating_add(other.max),
        }
    }

    /// Add a flat bonus once to every component.
    ///
    /// Returns `None` when the bonus is zero or not finite, so callers can
    /// tell "no bonus" apart from "bonus applied".
    #[must_use]
    pub fn with_true_damage(self, bonus: f64) -> Option<Self> {
        if bonus == 0.0 || !bonus.is_finite() {
            return None;
        }
        let add = |component: i64| round_half_up(component as f64 + bonus) as i64;
        Some(Self {
            min: add(self.min),
            avg: add(self.avg),
            max: add(self.max),
        })
    }
}

impl std::fmt::Display for DamageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "min {} · avg {} · max {}", self.min, self.avg, self.max)
    }
}

/// Round to the nearest integer, halves toward positive infinity.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

// ============================================================================
// Per-Hit Model
// ============================================================================

/// Damage of a single hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerHit {
    /// Lowest roll.
    pub min: i64,
    /// Expected roll.
    pub avg: i64,
    /// Highest roll.
    pub max: i64,
    /// Expected value before rounding.
    pub raw: f64,
}

impl PerHit {
    /// The integer triple of this hit.
    #[must_use]
    pub const fn range(&self) -> DamageRange {
        DamageRange::new(self.min, self.avg, self.max)
    }
}

/// Compute one hit: `ap * (atk / max(1, def)) * multiplier`, banded ±10%.
///
/// The band is taken in exact tenths so whole-number expectations land on
/// whole-number bounds (raw 100 gives 90..110).
#[must_use]
pub fn per_hit(attack_power: f64, attacker_stat: f64, defender_stat: f64, multiplier: f64) -> PerHit {
    let raw = attack_power * (attacker_stat / defender_stat.max(1.0)) * multiplier;
    let raw = if raw.is_finite() { raw } else { 0.0 };
    PerHit {
        min: (raw * 9.0 / 10.0).floor() as i64,
        avg: round_half_up(raw) as i64,
        max: (raw * 11.0 / 10.0).ceil() as i64,
        raw,
    }
}

/// Attack/defense quotient formatted for display.
#[must_use]
pub fn format_ratio(attacker_stat: f64, defender_stat: f64) -> String {
    format!("{:.2}", attacker_stat / defender_stat.max(1.0))
}

/// Stat pair read by an attack of the given element: PA/PD or EA/ED.
#[must_use]
pub fn stat_pair(element: &str, attacker: &StatBlock, defender: &StatBlock) -> (f64, f64) {
    if is_physical_key(element) {
        (f64::from(attacker.pa), f64::from(defender.pd))
    } else {
        (f64::from(attacker.ea), f64::from(defender.ed))
    }
}

// ============================================================================
// Aggregate Result
// ============================================================================

/// Breakdown of the selected (primary) attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainDamage {
    /// One hit.
    pub per: PerHit,
    /// Effective hit count.
    pub hits: u32,
    /// One hit scaled by the hit count.
    pub total: DamageRange,
    /// Elemental multiplier.
    pub elem_mul: f64,
    /// Attack/defense quotient, two decimals.
    pub atk_def_ratio: String,
    /// Element key of the attack.
    pub element: String,
}

/// Breakdown of a chained secondary attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainedDamage {
    /// The single hit.
    pub per: PerHit,
    /// Elemental multiplier.
    pub elem_mul: f64,
    /// Attack/defense quotient, two decimals.
    pub atk_def_ratio: String,
    /// Element key of the chained attack.
    pub element: String,
    /// Attack power of the chained attack.
    pub ap: f64,
    /// Display name.
    pub name: String,
}

/// Full damage result for one attack against one defender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageResult {
    /// Primary attack.
    pub main: MainDamage,
    /// Chained attack, if the primary carries one.
    pub extra: Option<ChainedDamage>,
    /// Flat bonus of the primary attack.
    pub true_damage: f64,
}

impl DamageResult {
    /// Main total plus true damage, `None` without a bonus.
    #[must_use]
    pub fn total_with_true_damage(&self) -> Option<DamageRange> {
        self.main.total.with_true_damage(self.true_damage)
    }

    /// Main total plus the chained hit, `None` without a chained attack.
    #[must_use]
    pub fn combined_total(&self) -> Option<DamageRange> {
        self.extra
            .as_ref()
            .map(|extra| self.main.total.plus(extra.per.range()))
    }

    /// Combined total plus the primary attack's true damage.
    #[must_use]
    pub fn combined_with_true_damage(&self) -> Option<DamageRange> {
        self.combined_total()?.with_true_damage(self.true_damage)
    }

    /// Hits needed to knock out a defender with `defender_hp`.
    #[must_use]
    pub fn hits_to_knockout(&self, defender_hp: u32) -> Option<u32> {
        let avg = self
            .total_with_true_damage()
            .map_or(self.main.total.avg, |with_bonus| with_bonus.avg);
        hits_to_knockout(avg, defender_hp)
    }
}

/// `ceil(hp / avg)`, undefined for non-positive damage or HP.
#[must_use]
pub fn hits_to_knockout(average_damage: i64, defender_hp: u32) -> Option<u32> {
    if average_damage <= 0 || defender_hp == 0 {
        return None;
    }
    let hp = i64::from(defender_hp);
    Some(((hp + average_damage - 1) / average_damage) as u32)
}

/// Compute the full result of `attack` from `attacker` into `defender`.
///
/// `defender_elements` must already be normalized.
#[must_use]
pub fn compute_result<S: AsRef<str>>(
    attack: &Attack,
    attacker: &StatBlock,
    defender: &StatBlock,
    defender_elements: &[S],
) -> DamageResult {
    let elem_mul = elemental_multiplier(&attack.element, defender_elements);
    let (atk_stat, def_stat) = stat_pair(&attack.element, attacker, defender);
    let per = per_hit(attack.ap, atk_stat, def_stat, elem_mul);
    let hits = attack.effective_hits();

    let main = MainDamage {
        per,
        hits,
        total: per.range().scaled(hits),
        elem_mul,
        atk_def_ratio: format_ratio(atk_stat, def_stat),
        element: attack.element.clone(),
    };

    let extra = attack.chained.as_ref().map(|chained| {
        let element = if chained.element.is_empty() {
            attack.element.clone()
        } else {
            chained.element.clone()
        };
        let elem_mul = elemental_multiplier(&element, defender_elements);
        let (atk_stat, def_stat) = stat_pair(&element, attacker, defender);
        ChainedDamage {
            per: per_hit(chained.ap, atk_stat, def_stat, elem_mul),
            elem_mul,
            atk_def_ratio: format_ratio(atk_stat, def_stat),
            element,
            ap: chained.ap,
            name: chained.name.clone(),
        }
    });

    DamageResult {
        main,
        extra,
        true_damage: attack.true_damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_per_hit_equal_stats() {
        let hit = per_hit(100.0, 100.0, 100.0, 1.0);
        assert_eq!(hit.raw, 100.0);
        assert_eq!((hit.min, hit.avg, hit.max), (90, 100, 110));
    }

    #[test]
    fn test_per_hit_defender_floor() {
        let zero = per_hit(10.0, 50.0, 0.0, 1.0);
        let one = per_hit(10.0, 50.0, 1.0, 1.0);
        assert_eq!(zero, one);
        assert_eq!(zero.raw, 500.0);
    }

    #[test]
    fn test_per_hit_zero_power() {
        let hit = per_hit(0.0, 100.0, 50.0, 2.0);
        assert_eq!(hit.range(), DamageRange::default());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn test_scaled_by_hits() {
        let total = DamageRange::new(10, 12, 14).scaled(3);
        assert_eq!(total, DamageRange::new(30, 36, 42));
    }

    #[test]
    fn test_true_damage_addition() {
        let total = DamageRange::new(10, 12, 14);
        assert_eq!(total.with_true_damage(5.0), Some(DamageRange::new(15, 17, 19)));
        assert_eq!(total.with_true_damage(2.5), Some(DamageRange::new(13, 15, 17)));
        assert_eq!(total.with_true_damage(0.0), None);
        assert_eq!(total.with_true_damage(f64::NAN), None);
    }

    #[test]
    fn test_hits_to_knockout() {
        assert_eq!(hits_to_knockout(17, 50), Some(3));
        assert_eq!(hits_to_knockout(50, 50), Some(1));
        assert_eq!(hits_to_knockout(17, 0), None);
        assert_eq!(hits_to_knockout(0, 50), None);
        assert_eq!(hits_to_knockout(-4, 50), None);
    }

    #[test]
    fn test_end_to_end_physical() {
        let attacker = StatBlock::new(100, 60, 60, 60, 60, 150);
        let defender = StatBlock::new(60, 60, 50, 60, 60, 150);
        let attack = Attack::new("Headbutt", "physical", 20.0);
        let none: [&str; 0] = [];

        let result = compute_result(&attack, &attacker, &defender, &none);
        assert_eq!(result.main.elem_mul, 1.0);
        assert_eq!(result.main.per.raw, 40.0);
        assert_eq!(result.main.total, DamageRange::new(36, 40, 44));
        assert_eq!(result.main.atk_def_ratio, "2.00");
        assert!(result.extra.is_none());
    }

    #[test]
    fn test_elemental_attack_reads_ea_ed() {
        let attacker = StatBlock::new(10, 120, 60, 60, 60, 150);
        let defender = StatBlock::new(60, 60, 999, 60, 60, 150);
        let attack = Attack::new("Splash", "water", 30.0).with_hits(2);

        let result = compute_result(&attack, &attacker, &defender, &["fire"]);
        assert_eq!(result.main.elem_mul, 2.0);
        // 30 * (120 / 60) * 2 = 120 per hit
        assert_eq!(result.main.per.range(), DamageRange::new(108, 120, 132));
        assert_eq!(result.main.total, DamageRange::new(216, 240, 264));
        assert_eq!(result.main.hits, 2);
    }

    #[test]
    fn test_chained_attack_is_independent_single_hit() {
        let attacker = StatBlock::new(100, 50, 60, 60, 60, 150);
        let defender = StatBlock::new(60, 60, 100, 50, 60, 150);
        let attack = Attack::new("Flurry", "physical", 10.0)
            .with_hits(3)
            .with_true_damage(5.0)
            .with_chained("Spark", "lightning", 20.0);

        let result = compute_result(&attack, &attacker, &defender, &["wind"]);
        assert_eq!(result.main.total, DamageRange::new(27, 30, 33));

        let extra = result.extra.as_ref().expect("chained result");
        assert_eq!(extra.elem_mul, 2.0);
        // 20 * (50 / 50) * 2 = 40, one hit regardless of the parent's three.
        assert_eq!(extra.per.range(), DamageRange::new(36, 40, 44));
        assert_eq!(extra.atk_def_ratio, "1.00");

        assert_eq!(result.combined_total(), Some(DamageRange::new(63, 70, 77)));
        assert_eq!(result.combined_with_true_damage(), Some(DamageRange::new(68, 75, 82)));
        assert_eq!(result.total_with_true_damage(), Some(DamageRange::new(32, 35, 38)));
    }

    #[test]
    fn test_result_knockout_uses_bonus() {
        let stats = StatBlock::new(100, 100, 100, 100, 100, 50);
        let attack = Attack::new("Jab", "physical", 12.0).with_true_damage(5.0);
        let none: [&str; 0] = [];
        let result = compute_result(&attack, &stats, &stats, &none);
        // avg 12 + 5 = 17, ceil(50 / 17) = 3
        assert_eq!(result.hits_to_knockout(50), Some(3));
        assert_eq!(result.hits_to_knockout(0), None);

        let plain = compute_result(&Attack::new("Jab", "physical", 12.0), &stats, &stats, &none);
        assert_eq!(plain.hits_to_knockout(50), Some(5));
    }

    #[test]
    fn test_result_json_shape() {
        let stats = StatBlock::DEFAULT_PROFILE;
        let none: [&str; 0] = [];
        let result = compute_result(&Attack::new("Jab", "physical", 12.0), &stats, &stats, &none);
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json["main"]["elemMul"].is_number());
        assert_eq!(json["main"]["atkDefRatio"], "1.00");
        assert!(json["extra"].is_null());
    }

    proptest! {
        #[test]
        fn prop_per_hit_is_ordered(
            ap in 0.0f64..500.0,
            atk in 1.0f64..400.0,
            def in 1.0f64..400.0,
            mul in prop::sample::select(vec![0.5f64, 1.0, 2.0]),
        ) {
            let hit = per_hit(ap, atk, def, mul);
            prop_assert!(hit.min <= hit.avg);
            prop_assert!(hit.avg <= hit.max);
        }

        #[test]
        fn prop_total_scales_componentwise(
            min in 0i64..1000,
            spread in 0i64..100,
            hits in 1u32..10,
        ) {
            let per = DamageRange::new(min, min + spread, min + 2 * spread);
            let total = per.scaled(hits);
            prop_assert_eq!(total.min, per.min * i64::from(hits));
            prop_assert_eq!(total.avg, per.avg * i64::from(hits));
            prop_assert_eq!(total.max, per.max * i64::from(hits));
        }
    }
}
