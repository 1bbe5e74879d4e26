//! Attack records.
//!
//! This module provides:
//! - Canonical attack and chained-attack types
//! - Ingestion from raw JSON records (alias resolution happens once, here)
//! - The base/enhanced attack tabs and their display ordering

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::DEFAULT_ATTACK_ELEMENT;
use crate::ingest::{coerce_element_key, coerce_number, coerce_string, is_truthy, FieldAliases};

/// Name given to a chained attack that has none.
pub const DEFAULT_CHAINED_NAME: &str = "Extra Hit";

/// A secondary attack bundled with a primary one. Always exactly one hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainedAttack {
    /// Display name.
    pub name: String,
    /// Lowercase element key.
    pub element: String,
    /// Attack power.
    pub ap: f64,
}

/// A canonical attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    /// Display name.
    pub name: String,
    /// Lowercase element key.
    pub element: String,
    /// Attack power.
    pub ap: f64,
    /// Hit count as recorded. See [`Attack::effective_hits`].
    pub hits: i64,
    /// Flat bonus added once to a total.
    #[serde(rename = "trueDamage")]
    pub true_damage: f64,
    /// Optional chained secondary attack.
    pub chained: Option<ChainedAttack>,
}

impl Default for Attack {
    fn default() -> Self {
        Self {
            name: String::new(),
            element: DEFAULT_ATTACK_ELEMENT.to_string(),
            ap: 0.0,
            hits: 1,
            true_damage: 0.0,
            chained: None,
        }
    }
}

impl Attack {
    /// Create a single-hit attack.
    #[must_use]
    pub fn new(name: impl Into<String>, element: impl Into<String>, ap: f64) -> Self {
        let element = element.into().trim().to_lowercase();
        Self {
            name: name.into(),
            element: if element.is_empty() {
                DEFAULT_ATTACK_ELEMENT.to_string()
            } else {
                element
            },
            ap,
            ..Self::default()
        }
    }

    /// Set hit count.
    #[must_use]
    pub fn with_hits(mut self, hits: i64) -> Self {
        self.hits = hits;
        self
    }

    /// Set flat bonus damage.
    #[must_use]
    pub fn with_true_damage(mut self, bonus: f64) -> Self {
        self.true_damage = if bonus.is_finite() { bonus } else { 0.0 };
        self
    }

    /// Attach a chained secondary attack.
    ///
    /// An empty element inherits this attack's element.
    #[must_use]
    pub fn with_chained(mut self, name: impl Into<String>, element: &str, ap: f64) -> Self {
        let element = element.trim().to_lowercase();
        self.chained = Some(ChainedAttack {
            name: name.into(),
            element: if element.is_empty() {
                self.element.clone()
            } else {
                element
            },
            ap,
        });
        self
    }

    /// Hit count used in arithmetic; never below 1.
    #[must_use]
    pub fn effective_hits(&self) -> u32 {
        self.hits.clamp(1, i64::from(u32::MAX)) as u32
    }

    /// Ordering key for attack lists.
    #[must_use]
    pub fn sort_key(&self) -> f64 {
        self.ap * self.hits as f64
    }

    /// Build an attack from a raw record. Non-object records yield `None`.
    #[must_use]
    pub fn from_value(record: &Value) -> Option<Self> {
        if !record.is_object() {
            return None;
        }

        let name = coerce_string(record.get("name")).unwrap_or_default();
        let element = coerce_element_key(record.get("element"))
            .unwrap_or_else(|| DEFAULT_ATTACK_ELEMENT.to_string());
        let ap = coerce_number(FieldAliases::ATTACK_POWER.first_truthy(record));
        let hits = match record.get("hits").filter(|v| is_truthy(v)) {
            Some(value) => {
                let n = coerce_number(Some(value)).trunc();
                if n == 0.0 {
                    1
                } else {
                    n as i64
                }
            },
            None => 1,
        };
        let true_damage = coerce_number(FieldAliases::TRUE_DAMAGE.first_present(record));

        let chained = FieldAliases::CHAINED
            .first_truthy(record)
            .filter(|value| value.is_object())
            .map(|chained| ChainedAttack {
                name: coerce_string(chained.get("name"))
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_CHAINED_NAME.to_string()),
                element: coerce_element_key(chained.get("element"))
                    .unwrap_or_else(|| element.clone()),
                ap: coerce_number(FieldAliases::ATTACK_POWER.first_truthy(chained)),
            });

        Some(Self {
            name,
            element,
            ap,
            hits,
            true_damage,
            chained,
        })
    }

    /// Build every attack in a raw list; anything but an array yields none.
    #[must_use]
    pub fn list_from_value(value: Option<&Value>) -> Vec<Self> {
        match value {
            Some(Value::Array(records)) => records.iter().filter_map(Self::from_value).collect(),
            _ => Vec::new(),
        }
    }
}

/// Which of an attacker's attack lists is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackTab {
    /// The base attack list.
    #[default]
    Base,
    /// The enhanced attack list.
    Enhanced,
}

/// Order attacks for display: descending `ap * hits`, ties keep source order.
#[must_use]
pub fn sorted_by_strength(attacks: &[Attack]) -> Vec<Attack> {
    let mut sorted = attacks.to_vec();
    sorted.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key()));
    sorted
}
