//! Average-tier defense remap.
//!
//! A what-if transform that swaps a defender's PD/ED for the value an
//! average-tier miscrit of the same base would have. It only ever touches
//! the working snapshot; base stats are the source of truth for undoing it.

use miscrit_common::StatBlock;
use serde::{Deserialize, Serialize};

/// Which defense table to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseKind {
    /// Elemental defense (ED).
    #[serde(rename = "ED")]
    Elemental,
    /// Physical defense (PD).
    #[serde(rename = "PD")]
    Physical,
}

/// ED lookup, ascending by key.
const ELEMENTAL_TABLE: [(u32, u32); 5] = [(60, 85), (72, 99), (83, 112), (95, 127), (107, 141)];

/// PD lookup, ascending by key.
const PHYSICAL_TABLE: [(u32, u32); 5] = [(60, 78), (72, 93), (83, 108), (95, 124), (107, 139)];

impl DefenseKind {
    fn table(self) -> &'static [(u32, u32)] {
        match self {
            Self::Elemental => &ELEMENTAL_TABLE,
            Self::Physical => &PHYSICAL_TABLE,
        }
    }
}

/// Remap a defense value to its average-tier counterpart.
///
/// Exact keys map directly; anything else uses the nearest key, with ties
/// going to the smaller key. A missing value passes through.
#[must_use]
pub fn remap(value: Option<u32>, kind: DefenseKind) -> Option<u32> {
    let value = value?;
    let table = kind.table();

    if let Some(&(_, mapped)) = table.iter().find(|&&(key, _)| key == value) {
        return Some(mapped);
    }

    let mut best = table[0];
    for &entry in &table[1..] {
        if entry.0.abs_diff(value) < best.0.abs_diff(value) {
            best = entry;
        }
    }
    Some(best.1)
}

/// Apply the remap to a snapshot, reading PD/ED from `base`.
///
/// Every other stat keeps its snapshot value.
#[must_use]
pub fn apply_average_tier(snapshot: StatBlock, base: &StatBlock) -> StatBlock {
    StatBlock {
        pd: remap(Some(base.pd), DefenseKind::Physical).unwrap_or(base.pd),
        ed: remap(Some(base.ed), DefenseKind::Elemental).unwrap_or(base.ed),
        ..snapshot
    }
}
