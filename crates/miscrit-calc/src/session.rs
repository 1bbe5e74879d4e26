//! Selection state and the evaluation pipeline.
//!
//! A [`Session`] records what the user picked: attacker, defender, their
//! working stat snapshots, filters, the attack tab and the selected attack.
//! [`evaluate`] turns a roster plus a session into one [`Evaluation`]
//! without side effects.

use miscrit_common::{StatBlock, StatKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attack::{Attack, AttackTab};
use crate::avg_def::apply_average_tier;
use crate::damage_calc::{compute_result, DamageRange, DamageResult};
use crate::roster::{Miscrit, Roster};

/// Side of the matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The miscrit dealing damage.
    Attacker,
    /// The miscrit receiving damage.
    Defender,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Slot {
    name: Option<String>,
    stats: StatBlock,
    custom_only: bool,
}

impl Slot {
    fn seed(&mut self, miscrit: &Miscrit) {
        self.name = Some(miscrit.name.clone());
        self.stats = miscrit.stats;
    }
}

/// User selections for one matchup.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    attacker: Slot,
    defender: Slot,
    tab: AttackTab,
    selected_attack: Option<String>,
    avg_def: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            attacker: Slot {
                stats: StatBlock::DEFAULT_PROFILE,
                ..Slot::default()
            },
            defender: Slot {
                stats: StatBlock::DEFAULT_PROFILE,
                ..Slot::default()
            },
            tab: AttackTab::Base,
            selected_attack: None,
            avg_def: false,
        }
    }
}

impl Session {
    /// Create a session with default selections for `roster`.
    #[must_use]
    pub fn new(roster: &Roster) -> Self {
        let mut session = Self::default();
        session.sync(roster);
        session
    }

    fn slot(&self, role: Role) -> &Slot {
        match role {
            Role::Attacker => &self.attacker,
            Role::Defender => &self.defender,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Slot {
        match role {
            Role::Attacker => &mut self.attacker,
            Role::Defender => &mut self.defender,
        }
    }

    /// Selected miscrit name for a role.
    #[must_use]
    pub fn name(&self, role: Role) -> Option<&str> {
        self.slot(role).name.as_deref()
    }

    /// Working stat snapshot for a role.
    #[must_use]
    pub fn stats(&self, role: Role) -> &StatBlock {
        &self.slot(role).stats
    }

    /// Whether a role only lists custom miscrits.
    #[must_use]
    pub fn custom_only(&self, role: Role) -> bool {
        self.slot(role).custom_only
    }

    /// Active attack tab.
    #[must_use]
    pub fn tab(&self) -> AttackTab {
        self.tab
    }

    /// Name of the selected attack.
    #[must_use]
    pub fn selected_attack(&self) -> Option<&str> {
        self.selected_attack.as_deref()
    }

    /// Whether the average-tier remap is on.
    #[must_use]
    pub fn avg_def(&self) -> bool {
        self.avg_def
    }

    /// Miscrits selectable for a role.
    #[must_use]
    pub fn visible<'r>(&self, roster: &'r Roster, role: Role) -> Vec<&'r Miscrit> {
        let custom_only = self.slot(role).custom_only;
        roster.iter().filter(|m| !custom_only || m.is_custom()).collect()
    }

    /// Repair selections after the roster or a filter changed.
    ///
    /// A role whose selection is no longer visible falls back to its
    /// default: the first visible miscrit for the attacker, the second (or
    /// only) one for the defender. The selected attack is kept by name.
    pub fn sync(&mut self, roster: &Roster) {
        for role in [Role::Attacker, Role::Defender] {
            let visible = self.visible(roster, role);
            let current = self.slot(role).name.as_deref();
            if current.is_some_and(|name| visible.iter().any(|m| m.name == name)) {
                continue;
            }

            let fallback = match role {
                Role::Attacker => visible.first(),
                Role::Defender => visible.get(1).or_else(|| visible.first()),
            }
            .copied();

            match fallback {
                Some(miscrit) => {
                    debug!("Defaulting {role:?} selection to {:?}", miscrit.name);
                    self.seed(role, miscrit);
                },
                None => self.slot_mut(role).name = None,
            }
        }
        self.sync_attack(roster);
    }

    fn seed(&mut self, role: Role, miscrit: &Miscrit) {
        self.slot_mut(role).seed(miscrit);
        if role == Role::Defender && self.avg_def {
            self.defender.stats = apply_average_tier(self.defender.stats, &miscrit.stats);
        }
    }

    fn sync_attack(&mut self, roster: &Roster) {
        let attacks = attacker_of(roster, self)
            .map(|attacker| attacker.sorted_attacks(self.tab))
            .unwrap_or_default();
        let kept = self
            .selected_attack
            .as_deref()
            .is_some_and(|name| attacks.iter().any(|a| a.name == name));
        if !kept {
            self.selected_attack = attacks.first().map(|a| a.name.clone());
        }
    }

    /// Select a miscrit for a role, seeding its snapshot from base stats.
    ///
    /// Returns `false` when no miscrit has that name.
    pub fn select(&mut self, roster: &Roster, role: Role, name: &str) -> bool {
        let Some(miscrit) = roster.find(name) else {
            return false;
        };
        self.seed(role, miscrit);
        self.sync_attack(roster);
        true
    }

    /// Toggle the custom-only filter for a role.
    pub fn set_custom_only(&mut self, roster: &Roster, role: Role, custom_only: bool) {
        self.slot_mut(role).custom_only = custom_only;
        self.sync(roster);
    }

    /// Switch the attack tab.
    pub fn set_tab(&mut self, roster: &Roster, tab: AttackTab) {
        self.tab = tab;
        self.sync_attack(roster);
    }

    /// Select an attack by name.
    pub fn select_attack(&mut self, name: impl Into<String>) {
        self.selected_attack = Some(name.into());
    }

    /// Turn the average-tier remap on or off.
    ///
    /// On remaps the defender's PD/ED from base stats; off restores the
    /// defender snapshot to base stats.
    pub fn set_avg_def(&mut self, roster: &Roster, on: bool) {
        self.avg_def = on;
        let Some(defender) = defender_of(roster, self) else {
            return;
        };
        self.defender.stats = if on {
            apply_average_tier(self.defender.stats, &defender.stats)
        } else {
            defender.stats
        };
    }

    /// Restore a role's snapshot to its base stats. Ignores the remap.
    pub fn refresh(&mut self, roster: &Roster, role: Role) {
        let miscrit = match role {
            Role::Attacker => attacker_of(roster, self),
            Role::Defender => defender_of(roster, self),
        };
        if let Some(miscrit) = miscrit {
            self.slot_mut(role).stats = miscrit.stats;
        }
    }

    /// Edit one stat of a role's snapshot.
    pub fn set_stat(&mut self, role: Role, kind: StatKind, value: u32) {
        self.slot_mut(role).stats.set(kind, value);
    }

    /// Exchange attacker and defender.
    ///
    /// Filters stay with their role. Both snapshots are reseeded from base
    /// stats, the new defender's through the remap when it is on.
    pub fn swap(&mut self, roster: &Roster) {
        std::mem::swap(&mut self.attacker.name, &mut self.defender.name);
        for role in [Role::Attacker, Role::Defender] {
            let miscrit = match role {
                Role::Attacker => attacker_of(roster, self),
                Role::Defender => defender_of(roster, self),
            };
            if let Some(miscrit) = miscrit {
                self.seed(role, miscrit);
            }
        }
        self.sync_attack(roster);
    }
}

fn attacker_of<'r>(roster: &'r Roster, session: &Session) -> Option<&'r Miscrit> {
    session
        .name(Role::Attacker)
        .and_then(|name| roster.find(name))
        .or_else(|| roster.nth(0))
}

fn defender_of<'r>(roster: &'r Roster, session: &Session) -> Option<&'r Miscrit> {
    session
        .name(Role::Defender)
        .and_then(|name| roster.find(name))
        .or_else(|| roster.nth(1))
        .or_else(|| roster.nth(0))
}

/// Everything derived from one roster and session.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<'a> {
    /// Resolved attacker.
    pub attacker: &'a Miscrit,
    /// Resolved defender.
    pub defender: &'a Miscrit,
    /// Attacker's active attack list, strongest first.
    pub attacks: Vec<Attack>,
    /// Attack the result is for.
    pub attack: Attack,
    /// Attacker snapshot used.
    pub attacker_stats: StatBlock,
    /// Defender snapshot used.
    pub defender_stats: StatBlock,
    /// Damage breakdown.
    pub result: DamageResult,
    /// Hits needed to knock out the defender snapshot.
    pub hits_to_ko: Option<u32>,
}

impl Evaluation<'_> {
    /// Main total plus true damage.
    #[must_use]
    pub fn total_with_true_damage(&self) -> Option<DamageRange> {
        self.result.total_with_true_damage()
    }

    /// Main total plus chained hit.
    #[must_use]
    pub fn combined_total(&self) -> Option<DamageRange> {
        self.result.combined_total()
    }

    /// Combined total plus true damage.
    #[must_use]
    pub fn combined_with_true_damage(&self) -> Option<DamageRange> {
        self.result.combined_with_true_damage()
    }
}

/// Compute the matchup a session describes.
///
/// An unknown attacker name falls back to the first roster entry, an unknown
/// defender to the second (or first). Returns `None` when the roster is
/// empty or the attacker has no attacks on the active tab.
#[must_use]
pub fn evaluate<'a>(roster: &'a Roster, session: &Session) -> Option<Evaluation<'a>> {
    let attacker = attacker_of(roster, session)?;
    let defender = defender_of(roster, session)?;

    let attacks = attacker.sorted_attacks(session.tab);
    let attack = session
        .selected_attack
        .as_deref()
        .and_then(|name| attacks.iter().find(|a| a.name == name))
        .or_else(|| attacks.first())?
        .clone();

    let attacker_stats = session.attacker.stats;
    let defender_stats = session.defender.stats;
    let result = compute_result(&attack, &attacker_stats, &defender_stats, &defender.elements);
    let hits_to_ko = result.hits_to_knockout(defender_stats.hp);

    Some(Evaluation {
        attacker,
        defender,
        attacks,
        attack,
        attacker_stats,
        defender_stats,
        result,
        hits_to_ko,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom::CustomProfile;
    use serde_json::json;

    fn roster() -> Roster {
        Roster::from_payload(&json!([
            {
                "name": "Flue",
                "elements": "Fire",
                "stats": { "PA": 100, "EA": 100, "PD": 72, "ED": 95, "SPD": 80, "HP": 150 },
                "attacks": [
                    { "name": "Ember", "element": "fire", "ap": 30 },
                    { "name": "Tackle", "ap": 40 },
                ],
                "enhancedAttacks": [ { "name": "Inferno", "element": "fire", "ap": 60 } ]
            },
            {
                "name": "Tulipsy",
                "elements": "Nature",
                "stats": { "PA": 60, "EA": 60, "PD": 60, "ED": 100, "SPD": 60, "HP": 120 },
                "attacks": [ { "name": "Ember", "element": "fire", "ap": 20 } ]
            },
            { "name": "Stonewall", "elements": "Earth" },
        ]))
        .with_profiles(&[CustomProfile {
            name: "Tank Flue".to_string(),
            base_name: "Flue".to_string(),
            stats: StatBlock::new(10, 10, 200, 200, 10, 500),
        }])
    }

    #[test]
    fn test_default_selection() {
        let roster = roster();
        let session = Session::new(&roster);
        assert_eq!(session.name(Role::Attacker), Some("Flue"));
        assert_eq!(session.name(Role::Defender), Some("Tulipsy"));
        assert_eq!(session.stats(Role::Defender).ed, 100);
        // Strongest first: Tackle (40) before Ember (30).
        assert_eq!(session.selected_attack(), Some("Tackle"));
    }

    #[test]
    fn test_custom_only_filter() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_custom_only(&roster, Role::Defender, true);
        // Only one custom miscrit, so the defender default is that one.
        assert_eq!(session.name(Role::Defender), Some("Tank Flue"));
        assert_eq!(session.stats(Role::Defender).hp, 500);
        assert_eq!(session.visible(&roster, Role::Defender).len(), 1);
        assert_eq!(session.visible(&roster, Role::Attacker).len(), 4);
    }

    #[test]
    fn test_empty_filter_clears_selection() {
        let roster = Roster::from_payload(&json!([{ "name": "Solo" }]));
        let mut session = Session::new(&roster);
        assert_eq!(session.name(Role::Defender), Some("Solo"));
        session.set_custom_only(&roster, Role::Attacker, true);
        assert_eq!(session.name(Role::Attacker), None);
    }

    #[test]
    fn test_select_seeds_snapshot() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_stat(Role::Attacker, StatKind::PhysicalAttack, 1);
        assert!(session.select(&roster, Role::Attacker, "Flue"));
        assert_eq!(session.stats(Role::Attacker).pa, 60);
        assert!(!session.select(&roster, Role::Attacker, "Nobody"));
    }

    #[test]
    fn test_avg_def_toggle() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.select(&roster, Role::Defender, "Flue");
        session.set_stat(Role::Defender, StatKind::Speed, 1);

        session.set_avg_def(&roster, true);
        assert_eq!(session.stats(Role::Defender).pd, 93);
        assert_eq!(session.stats(Role::Defender).ed, 127);
        assert_eq!(session.stats(Role::Defender).spd, 1);

        session.set_avg_def(&roster, false);
        assert_eq!(*session.stats(Role::Defender), StatBlock::new(100, 100, 72, 95, 80, 150));
    }

    #[test]
    fn test_new_defender_remapped_while_avg_def_on() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_avg_def(&roster, true);
        session.select(&roster, Role::Defender, "Flue");
        assert_eq!(session.stats(Role::Defender).pd, 93);
    }

    #[test]
    fn test_refresh_ignores_avg_def() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_avg_def(&roster, true);
        session.refresh(&roster, Role::Defender);
        assert_eq!(session.stats(Role::Defender).ed, 100);
        assert!(session.avg_def());
    }

    #[test]
    fn test_swap_reseeds_from_base_stats() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_stat(Role::Attacker, StatKind::HitPoints, 1);
        session.set_stat(Role::Defender, StatKind::PhysicalAttack, 1);
        session.swap(&roster);
        assert_eq!(session.name(Role::Attacker), Some("Tulipsy"));
        assert_eq!(session.name(Role::Defender), Some("Flue"));
        assert_eq!(session.stats(Role::Defender).hp, 150);
        assert_eq!(session.stats(Role::Attacker).pa, 60);
        assert_eq!(session.selected_attack(), Some("Ember"));
    }

    #[test]
    fn test_swap_remaps_new_defender() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_avg_def(&roster, true);
        session.swap(&roster);
        // Flue's base PD 72 maps to 93; the attacker keeps its base stats.
        assert_eq!(session.stats(Role::Defender).pd, 93);
        assert_eq!(session.stats(Role::Attacker).ed, 100);
    }

    #[test]
    fn test_selected_attack_kept_by_name() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.select_attack("Ember");
        session.select(&roster, Role::Attacker, "Tulipsy");
        assert_eq!(session.selected_attack(), Some("Ember"));

        session.set_tab(&roster, AttackTab::Enhanced);
        // Tulipsy has no enhanced attacks.
        assert_eq!(session.selected_attack(), None);
    }

    #[test]
    fn test_evaluate_super_effective() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.select_attack("Ember");

        let evaluation = evaluate(&roster, &session).expect("evaluation");
        assert_eq!(evaluation.attack.name, "Ember");
        assert_eq!(evaluation.result.main.elem_mul, 2.0);
        // 30 * (100 / 100) * 2 = 60.
        assert_eq!(evaluation.result.main.total, DamageRange::new(54, 60, 66));
        assert_eq!(evaluation.hits_to_ko, Some(2));
        assert_eq!(evaluation.attacks.len(), 2);
        assert!(evaluation.combined_total().is_none());
    }

    #[test]
    fn test_evaluate_uses_enhanced_tab() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.set_tab(&roster, AttackTab::Enhanced);
        let evaluation = evaluate(&roster, &session).expect("evaluation");
        assert_eq!(evaluation.attack.name, "Inferno");
    }

    #[test]
    fn test_evaluate_without_attacks() {
        let roster = roster();
        let mut session = Session::new(&roster);
        session.select(&roster, Role::Attacker, "Stonewall");
        assert!(evaluate(&roster, &session).is_none());
        assert!(evaluate(&Roster::default(), &Session::default()).is_none());
    }
}
