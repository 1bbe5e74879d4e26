//! The six-stat block shared by every miscrit.

use serde::{Deserialize, Serialize};

/// One of the six named stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    /// Physical attack (PA).
    #[serde(rename = "PA")]
    PhysicalAttack,
    /// Elemental attack (EA).
    #[serde(rename = "EA")]
    ElementalAttack,
    /// Physical defense (PD).
    #[serde(rename = "PD")]
    PhysicalDefense,
    /// Elemental defense (ED).
    #[serde(rename = "ED")]
    ElementalDefense,
    /// Speed (SPD).
    #[serde(rename = "SPD")]
    Speed,
    /// Hit points (HP).
    #[serde(rename = "HP")]
    HitPoints,
}

impl StatKind {
    /// All stats in display order.
    pub const ALL: [StatKind; 6] = [
        Self::PhysicalAttack,
        Self::ElementalAttack,
        Self::PhysicalDefense,
        Self::ElementalDefense,
        Self::Speed,
        Self::HitPoints,
    ];

    /// Short key used in data files ("PA", "EA", ...).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PhysicalAttack => "PA",
            Self::ElementalAttack => "EA",
            Self::PhysicalDefense => "PD",
            Self::ElementalDefense => "ED",
            Self::Speed => "SPD",
            Self::HitPoints => "HP",
        }
    }

    /// Parse a short key, case-insensitive.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A full set of the six stats.
///
/// Used both for an entity's base stats and for the editable working
/// snapshot of the attacker and defender roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    /// Physical attack.
    #[serde(rename = "PA")]
    pub pa: u32,
    /// Elemental attack.
    #[serde(rename = "EA")]
    pub ea: u32,
    /// Physical defense.
    #[serde(rename = "PD")]
    pub pd: u32,
    /// Elemental defense.
    #[serde(rename = "ED")]
    pub ed: u32,
    /// Speed.
    #[serde(rename = "SPD")]
    pub spd: u32,
    /// Hit points.
    #[serde(rename = "HP")]
    pub hp: u32,
}

impl StatBlock {
    /// Stats used when an entity record carries no stats at all.
    pub const DEFAULT_PROFILE: Self = Self {
        pa: 60,
        ea: 60,
        pd: 60,
        ed: 60,
        spd: 60,
        hp: 153,
    };

    /// Creates a stat block from the six values in display order.
    #[must_use]
    pub const fn new(pa: u32, ea: u32, pd: u32, ed: u32, spd: u32, hp: u32) -> Self {
        Self {
            pa,
            ea,
            pd,
            ed,
            spd,
            hp,
        }
    }

    /// Get a single stat.
    #[must_use]
    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::PhysicalAttack => self.pa,
            StatKind::ElementalAttack => self.ea,
            StatKind::PhysicalDefense => self.pd,
            StatKind::ElementalDefense => self.ed,
            StatKind::Speed => self.spd,
            StatKind::HitPoints => self.hp,
        }
    }

    /// Set a single stat.
    pub fn set(&mut self, kind: StatKind, value: u32) {
        match kind {
            StatKind::PhysicalAttack => self.pa = value,
            StatKind::ElementalAttack => self.ea = value,
            StatKind::PhysicalDefense => self.pd = value,
            StatKind::ElementalDefense => self.ed = value,
            StatKind::Speed => self.spd = value,
            StatKind::HitPoints => self.hp = value,
        }
    }

    /// Set a single stat (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: StatKind, value: u32) -> Self {
        self.set(kind, value);
        self
    }
}
