//! Field coercion and alias resolution for loosely-typed source records.
//!
//! Source data is hand-maintained JSON: numbers sometimes arrive as strings,
//! fields go missing, and the same value can live under more than one name.
//! Everything here resolves such a record into one canonical value and never
//! fails; unusable values collapse to a neutral default.

use serde_json::Value;

/// Ordered list of field names that may carry the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAliases(pub &'static [&'static str]);

impl FieldAliases {
    /// Element tags of an entity.
    pub const ELEMENTS: Self = Self(&["elements", "type", "element"]);
    /// Attack power of an attack.
    pub const ATTACK_POWER: Self = Self(&["ap", "AP"]);
    /// Flat bonus damage of an attack.
    pub const TRUE_DAMAGE: Self = Self(&["trueDamage", "extraDamage"]);
    /// Chained secondary attack.
    pub const CHAINED: Self = Self(&["chained", "extra"]);

    /// First alias whose value is present and not null.
    #[must_use]
    pub fn first_present<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .filter_map(|key| record.get(key))
            .find(|value| !value.is_null())
    }

    /// First alias whose value is truthy (non-empty, non-zero, not false).
    #[must_use]
    pub fn first_truthy<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .filter_map(|key| record.get(key))
            .find(|value| is_truthy(value))
    }
}

/// Loose truthiness: null, false, zero, NaN and "" are falsy.
///
/// Arrays and objects are truthy even when empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce an optional value to a finite number, defaulting to 0.
///
/// Numeric strings are parsed; booleans count as 0/1.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        },
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Coerce an optional value to a non-negative integer stat.
#[must_use]
pub fn coerce_stat(value: Option<&Value>) -> u32 {
    let n = coerce_number(value);
    if n <= 0.0 {
        0
    } else {
        n.round().min(f64::from(u32::MAX)) as u32
    }
}

/// Coerce an optional scalar value to a string.
#[must_use]
pub fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce an element tag: trimmed and lowercased, `None` when blank.
#[must_use]
pub fn coerce_element_key(value: Option<&Value>) -> Option<String> {
    coerce_string(value)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}
