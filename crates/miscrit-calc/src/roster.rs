//! Miscrit definitions and the roster.
//!
//! The roster is the session's entity set: the base miscrits loaded from the
//! database followed by custom profiles derived from them. Every alias and
//! coercion rule for entity records is applied once, when a record enters
//! the roster.

use miscrit_common::{StatBlock, StatKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::attack::{sorted_by_strength, Attack, AttackTab};
use crate::custom::CustomProfile;
use crate::element::normalize_value;
use crate::ingest::{coerce_stat, FieldAliases};

/// Key of the entity list when the payload is wrapped in an object.
pub const PAYLOAD_LIST_KEY: &str = "miscrits";

/// A creature definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Miscrit {
    /// Unique name.
    pub name: String,
    /// Canonical element keys.
    pub elements: Vec<String>,
    /// Base stats.
    pub stats: StatBlock,
    /// Base attack list.
    pub attacks: Vec<Attack>,
    /// Enhanced attack list.
    pub enhanced_attacks: Vec<Attack>,
    /// Base miscrit name when this is a custom profile.
    pub base_name: Option<String>,
}

impl Miscrit {
    /// Create a miscrit with no attacks.
    #[must_use]
    pub fn new(name: impl Into<String>, elements: Vec<String>, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            elements,
            stats,
            attacks: Vec::new(),
            enhanced_attacks: Vec::new(),
            base_name: None,
        }
    }

    /// Add a base attack (builder pattern).
    #[must_use]
    pub fn with_attack(mut self, attack: Attack) -> Self {
        self.attacks.push(attack);
        self
    }

    /// Add an enhanced attack (builder pattern).
    #[must_use]
    pub fn with_enhanced_attack(mut self, attack: Attack) -> Self {
        self.enhanced_attacks.push(attack);
        self
    }

    /// Whether this is a user-authored custom profile.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.base_name.is_some()
    }

    /// Raw attack list for a tab.
    #[must_use]
    pub fn attacks_for(&self, tab: AttackTab) -> &[Attack] {
        match tab {
            AttackTab::Base => &self.attacks,
            AttackTab::Enhanced => &self.enhanced_attacks,
        }
    }

    /// Attack list for a tab, strongest first.
    #[must_use]
    pub fn sorted_attacks(&self, tab: AttackTab) -> Vec<Attack> {
        sorted_by_strength(self.attacks_for(tab))
    }

    /// Build a miscrit from a raw record. Records without a name yield `None`.
    #[must_use]
    pub fn from_value(record: &Value) -> Option<Self> {
        let name = record.get("name")?.as_str()?.to_string();
        let elements = FieldAliases::ELEMENTS
            .first_truthy(record)
            .map(normalize_value)
            .unwrap_or_default();

        Some(Self {
            name,
            elements,
            stats: stats_from_value(record.get("stats")),
            attacks: Attack::list_from_value(record.get("attacks")),
            enhanced_attacks: Attack::list_from_value(record.get("enhancedAttacks")),
            base_name: None,
        })
    }

    /// Derive a custom miscrit from this one.
    #[must_use]
    pub fn derive(&self, profile: &CustomProfile) -> Self {
        Self {
            name: profile.name.clone(),
            stats: profile.stats,
            base_name: Some(self.name.clone()),
            ..self.clone()
        }
    }
}

/// Build a stat block from a raw `stats` record.
///
/// A missing record yields [`StatBlock::DEFAULT_PROFILE`]; missing or
/// non-numeric keys within a record yield 0.
#[must_use]
pub fn stats_from_value(value: Option<&Value>) -> StatBlock {
    match value {
        Some(record @ Value::Object(_)) => {
            let mut stats = StatBlock::default();
            for kind in StatKind::ALL {
                stats.set(kind, coerce_stat(record.get(kind.key())));
            }
            stats
        },
        _ => StatBlock::DEFAULT_PROFILE,
    }
}

/// Base miscrits followed by custom profiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    base: Vec<Miscrit>,
    custom: Vec<Miscrit>,
}

impl Roster {
    /// Create a roster from base miscrits.
    #[must_use]
    pub fn new(base: Vec<Miscrit>) -> Self {
        Self {
            base,
            custom: Vec::new(),
        }
    }

    /// Build the base roster from a database payload.
    ///
    /// Accepts a bare list or an object wrapping the list under `miscrits`.
    /// Any other shape yields an empty roster.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let list = match payload {
            Value::Array(list) => list,
            Value::Object(map) => match map.get(PAYLOAD_LIST_KEY) {
                Some(Value::Array(list)) => list,
                _ => {
                    debug!("Payload object has no `{PAYLOAD_LIST_KEY}` list");
                    return Self::default();
                },
            },
            _ => {
                debug!("Payload is neither a list nor an object");
                return Self::default();
            },
        };

        let base: Vec<Miscrit> = list
            .iter()
            .filter_map(|record| {
                let miscrit = Miscrit::from_value(record);
                if miscrit.is_none() {
                    debug!("Skipping miscrit record without a name");
                }
                miscrit
            })
            .collect();

        Self::new(base)
    }

    /// Attach custom profiles (builder pattern).
    #[must_use]
    pub fn with_profiles(mut self, profiles: &[CustomProfile]) -> Self {
        self.apply_profiles(profiles);
        self
    }

    /// Replace the custom subset with one derived from `profiles`.
    ///
    /// Profiles whose base miscrit is missing are dropped.
    pub fn apply_profiles(&mut self, profiles: &[CustomProfile]) {
        self.custom = profiles
            .iter()
            .filter_map(|profile| {
                let base = self.base.iter().find(|m| m.name == profile.base_name);
                if base.is_none() {
                    debug!(
                        "Dropping custom profile {:?}: base {:?} not found",
                        profile.name, profile.base_name
                    );
                }
                base.map(|base| base.derive(profile))
            })
            .collect();
    }

    /// Base miscrits.
    #[must_use]
    pub fn base(&self) -> &[Miscrit] {
        &self.base
    }

    /// Custom miscrits.
    #[must_use]
    pub fn custom(&self) -> &[Miscrit] {
        &self.custom
    }

    /// Every miscrit, base first.
    pub fn iter(&self) -> impl Iterator<Item = &Miscrit> {
        self.base.iter().chain(self.custom.iter())
    }

    /// Miscrit at a position in [`Roster::iter`] order.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&Miscrit> {
        self.iter().nth(index)
    }

    /// Look up a miscrit by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Miscrit> {
        self.iter().find(|m| m.name == name)
    }

    /// Number of miscrits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len() + self.custom.len()
    }

    /// Whether the roster has no miscrits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
