//! Type-advantage resolver.
//!
//! Six elements form two three-node cycles of advantage:
//! Water > Fire > Nature > Water and Lightning > Wind > Earth > Lightning.
//! An advantaged attack deals 2x, a disadvantaged one 0.5x. A defender that
//! is both favorable and unfavorable to the attack resolves to neutral.

use crate::element::{is_physical_key, Element};

/// Multiplier for an advantaged attack.
pub const ADVANTAGE_MULTIPLIER: f64 = 2.0;

/// Multiplier for a disadvantaged attack.
pub const DISADVANTAGE_MULTIPLIER: f64 = 0.5;

/// Multiplier with no elemental interaction.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

impl Element {
    /// The element this one is strong against, if it takes part in the cycle.
    #[must_use]
    pub const fn strong_against(self) -> Option<Element> {
        match self {
            Self::Water => Some(Self::Fire),
            Self::Fire => Some(Self::Nature),
            Self::Nature => Some(Self::Water),
            Self::Lightning => Some(Self::Wind),
            Self::Wind => Some(Self::Earth),
            Self::Earth => Some(Self::Lightning),
            Self::Physical | Self::Neutral | Self::Light => None,
        }
    }

    /// Whether this element is strong against the target.
    #[must_use]
    pub fn is_strong_against(self, target: Self) -> bool {
        self.strong_against() == Some(target)
    }

    /// Whether this element is weak against the target.
    #[must_use]
    pub fn is_weak_against(self, target: Self) -> bool {
        target.is_strong_against(self)
    }
}

/// Whether the element keyed `attacker` is strong against the key `target`.
///
/// Unknown keys never interact.
#[must_use]
pub fn key_strong_against(attacker: &str, target: &str) -> bool {
    match (Element::from_key(attacker), Element::from_key(target)) {
        (Some(a), Some(t)) => a.is_strong_against(t),
        _ => false,
    }
}

/// Elemental multiplier of an attack against a defender's element set.
///
/// `defender_elements` must already be normalized.
#[must_use]
pub fn elemental_multiplier<S: AsRef<str>>(attack_element: &str, defender_elements: &[S]) -> f64 {
    let attack = attack_element.trim().to_lowercase();
    if is_physical_key(&attack) || defender_elements.is_empty() {
        return NEUTRAL_MULTIPLIER;
    }

    let advantage = defender_elements
        .iter()
        .any(|defender| key_strong_against(&attack, defender.as_ref()));
    let disadvantage = defender_elements
        .iter()
        .any(|defender| key_strong_against(defender.as_ref(), &attack));

    match (advantage, disadvantage) {
        (true, false) => ADVANTAGE_MULTIPLIER,
        (false, true) => DISADVANTAGE_MULTIPLIER,
        _ => NEUTRAL_MULTIPLIER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CYCLE: [Element; 6] = [
        Element::Water,
        Element::Fire,
        Element::Nature,
        Element::Lightning,
        Element::Wind,
        Element::Earth,
    ];

    #[test]
    fn test_each_cycle_element_has_one_target() {
        for element in CYCLE {
            let targets: Vec<Element> = Element::ALL
                .into_iter()
                .filter(|&target| element.is_strong_against(target))
                .collect();
            assert_eq!(targets.len(), 1, "{element} should beat exactly one element");
            assert_ne!(targets[0], element, "{element} must not beat itself");
            assert!(CYCLE.contains(&targets[0]));
        }
    }

    #[test]
    fn test_cycle_is_a_permutation() {
        let mut targets: Vec<Element> = CYCLE.iter().filter_map(|e| e.strong_against()).collect();
        targets.sort_by_key(|e| e.key());
        let mut expected = CYCLE.to_vec();
        expected.sort_by_key(|e| e.key());
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_non_cycle_elements_beat_nothing() {
        assert_eq!(Element::Physical.strong_against(), None);
        assert_eq!(Element::Neutral.strong_against(), None);
        assert_eq!(Element::Light.strong_against(), None);
    }

    #[test]
    fn test_single_defender_multipliers() {
        assert_eq!(elemental_multiplier("water", &["fire"]), 2.0);
        assert_eq!(elemental_multiplier("fire", &["water"]), 0.5);
        assert_eq!(elemental_multiplier("fire", &["wind"]), 1.0);
        assert_eq!(elemental_multiplier("lightning", &["wind"]), 2.0);
        assert_eq!(elemental_multiplier("earth", &["wind"]), 0.5);
        assert_eq!(elemental_multiplier("Fire", &["nature"]), 2.0);
    }

    #[test]
    fn test_non_elemental_attacks_are_neutral() {
        for defender in CYCLE {
            assert_eq!(elemental_multiplier("physical", &[defender.key()]), 1.0);
            assert_eq!(elemental_multiplier("neutral", &[defender.key()]), 1.0);
            assert_eq!(elemental_multiplier("", &[defender.key()]), 1.0);
        }
    }

    #[test]
    fn test_no_defender_elements() {
        let none: [&str; 0] = [];
        assert_eq!(elemental_multiplier("water", &none), 1.0);
    }

    #[test]
    fn test_mixed_defender_cancels() {
        // Water beats fire but is beaten by nature.
        assert_eq!(elemental_multiplier("water", &["fire", "nature"]), 1.0);
        assert_eq!(elemental_multiplier("water", &["fire", "wind"]), 2.0);
        assert_eq!(elemental_multiplier("water", &["nature", "earth"]), 0.5);
    }

    #[test]
    fn test_unknown_elements_do_not_interact() {
        assert_eq!(elemental_multiplier("shadow", &["fire"]), 1.0);
        assert_eq!(elemental_multiplier("fire", &["shadow"]), 1.0);
    }

    fn cycle_element() -> impl Strategy<Value = Element> {
        prop::sample::select(CYCLE.to_vec())
    }

    proptest! {
        #[test]
        fn prop_advantage_and_disadvantage_cancel(attack in cycle_element()) {
            let beats = attack.strong_against().map(Element::key).unwrap_or_default();
            let beaten_by = CYCLE
                .into_iter()
                .find(|e| e.is_strong_against(attack))
                .map(Element::key)
                .unwrap_or_default();
            prop_assert_eq!(elemental_multiplier(attack.key(), &[beats, beaten_by]), 1.0);
            prop_assert_eq!(elemental_multiplier(attack.key(), &[beaten_by, beats]), 1.0);
        }

        #[test]
        fn prop_one_on_one_multiplier(attack in cycle_element(), defender in cycle_element()) {
            let mul = elemental_multiplier(attack.key(), &[defender.key()]);
            let expected = if attack.is_strong_against(defender) {
                2.0
            } else if attack.is_weak_against(defender) {
                0.5
            } else {
                1.0
            };
            prop_assert_eq!(mul, expected);
        }
    }
}
