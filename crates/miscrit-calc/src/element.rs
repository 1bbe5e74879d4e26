//! Element tags and the element normalizer.
//!
//! Element data arrives in several shapes: a list (`["Fire", "Water"]`), a
//! delimited string (`"Fire/Water"`), a compound word (`"FireWater"`) or a
//! free-form single word. [`normalize_str`], [`normalize_list`] and
//! [`normalize_value`] turn all of these into one canonical ordered sequence
//! of lowercase keys. Normalization never fails; unrecognized input degrades
//! to a best-effort guess.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Known Elements
// ============================================================================

/// The element vocabulary known to the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Fire.
    Fire,
    /// Water.
    Water,
    /// Nature.
    Nature,
    /// Lightning.
    Lightning,
    /// Earth.
    Earth,
    /// Wind.
    Wind,
    /// Physical (non-elemental).
    Physical,
    /// Neutral (non-elemental).
    Neutral,
    /// Light.
    Light,
}

impl Element {
    /// Vocabulary in scan order.
    pub const ALL: [Element; 9] = [
        Self::Fire,
        Self::Water,
        Self::Nature,
        Self::Lightning,
        Self::Earth,
        Self::Wind,
        Self::Physical,
        Self::Neutral,
        Self::Light,
    ];

    /// Canonical lowercase key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Nature => "nature",
            Self::Lightning => "lightning",
            Self::Earth => "earth",
            Self::Wind => "wind",
            Self::Physical => "physical",
            Self::Neutral => "neutral",
            Self::Light => "light",
        }
    }

    /// Look up a canonical key. Case-insensitive.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|element| element.key().eq_ignore_ascii_case(key))
    }

    /// Whether this element reads the elemental stat pair (EA/ED).
    #[must_use]
    pub const fn is_elemental(self) -> bool {
        !matches!(self, Self::Physical | Self::Neutral)
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Key used for attacks that carry no element.
pub const DEFAULT_ATTACK_ELEMENT: &str = "physical";

/// Whether an element key denotes a non-elemental attack.
///
/// Empty keys count as non-elemental.
#[must_use]
pub fn is_physical_key(key: &str) -> bool {
    key.is_empty()
        || key.eq_ignore_ascii_case(Element::Physical.key())
        || key.eq_ignore_ascii_case(Element::Neutral.key())
}

// ============================================================================
// Normalizer
// ============================================================================

/// Normalize a list of element tags: trim, lowercase, drop empties.
#[must_use]
pub fn normalize_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .filter(|key| !key.is_empty())
        .collect()
}

/// Normalize a single string of element tags.
#[must_use]
pub fn normalize_str(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.contains(&['/', ','][..]) || trimmed.contains(char::is_whitespace) {
        return trimmed
            .split(|c: char| c == '/' || c == ',' || c.is_whitespace())
            .filter(|piece| !piece.is_empty())
            .map(str::to_lowercase)
            .collect();
    }

    let segments = word_segments(trimmed);
    if segments.len() > 1 {
        return segments.into_iter().map(str::to_lowercase).collect();
    }

    let lowered = trimmed.to_lowercase();
    let found: Vec<String> = Element::ALL
        .into_iter()
        .filter(|element| lowered.contains(element.key()))
        .map(|element| element.key().to_string())
        .collect();
    if !found.is_empty() {
        return found;
    }

    vec![lowered]
}

/// Normalize an arbitrary JSON value holding element tags.
///
/// Null yields an empty sequence, arrays are normalized element-wise, and
/// scalars are normalized as strings. Objects carry no usable tags.
#[must_use]
pub fn normalize_value(input: &Value) -> Vec<String> {
    match input {
        Value::Null | Value::Object(_) => Vec::new(),
        Value::Array(items) => {
            let keys: Vec<String> = items.iter().map(scalar_text).collect();
            normalize_list(&keys)
        },
        Value::String(s) => normalize_str(s),
        Value::Number(n) => normalize_str(&n.to_string()),
        Value::Bool(b) => normalize_str(&b.to_string()),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

/// Split a run-together compound word on its case transitions.
///
/// A segment is an optional capital followed by lowercase letters
/// (`"Fire"`, `"water"`), or a run of capitals not followed by a lowercase
/// letter (`"EA"` in `"EAFire"`). Characters outside ASCII letters only
/// separate segments.
fn word_segments(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < len {
        let start = i;
        let mut j = i;
        if bytes[j].is_ascii_uppercase() {
            j += 1;
        }
        let lower_start = j;
        while j < len && bytes[j].is_ascii_lowercase() {
            j += 1;
        }
        if j > lower_start {
            segments.push(&input[start..j]);
            i = j;
            continue;
        }

        if bytes[i].is_ascii_uppercase() {
            let mut k = i;
            while k < len && bytes[k].is_ascii_uppercase() {
                k += 1;
            }
            // The last capital belongs to the next word if a lowercase follows.
            if k < len && bytes[k].is_ascii_lowercase() {
                k -= 1;
            }
            if k > i {
                segments.push(&input[i..k]);
                i = k;
                continue;
            }
        }

        i += 1;
    }

    segments
}
