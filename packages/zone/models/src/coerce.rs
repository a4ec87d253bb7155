//! Explicit numeric coercion of loosely typed upstream fields.
//!
//! Each raw field resolves to a [`FieldValue`] so callers can tell a field
//! that was never sent apart from one that was sent but unusable.

use serde_json::Value;

/// Outcome of coercing one raw field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    /// The field was present and converted successfully.
    Parsed(T),
    /// The field was absent, `null`, or an empty string.
    Missing,
    /// The field was present but could not be converted. Holds the raw
    /// text for diagnostics.
    Invalid(String),
}

impl<T> FieldValue<T> {
    /// Converts into an [`Option`], discarding why a value was unusable.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Missing | Self::Invalid(_) => None,
        }
    }
}

/// Coerces a raw field into a finite `f64`.
///
/// Strings are trimmed before parsing. `NaN` and infinities are rejected.
#[must_use]
pub fn coerce_f64(raw: Option<&Value>) -> FieldValue<f64> {
    let parsed = match raw {
        None | Some(Value::Null) => return FieldValue::Missing,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return FieldValue::Missing;
            }
            trimmed.parse::<f64>().ok()
        }
        Some(other) => return FieldValue::Invalid(other.to_string()),
    };

    match parsed {
        Some(value) if value.is_finite() => FieldValue::Parsed(value),
        _ => FieldValue::Invalid(raw.map(Value::to_string).unwrap_or_default()),
    }
}

/// Coerces a raw field into a whole-number count.
///
/// Any finite number is accepted: fractional values round to the nearest
/// whole number (`"2.5"` yields `3`) and negative values clamp to `0`.
/// Only non-numeric input is [`FieldValue::Invalid`].
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn coerce_count(raw: Option<&Value>) -> FieldValue<u64> {
    if let Some(Value::Number(n)) = raw
        && let Some(count) = n.as_u64()
    {
        return FieldValue::Parsed(count);
    }

    match coerce_f64(raw) {
        FieldValue::Parsed(value) if value <= 0.0 => FieldValue::Parsed(0),
        FieldValue::Parsed(value) if value >= u64::MAX as f64 => FieldValue::Parsed(u64::MAX),
        FieldValue::Parsed(value) => FieldValue::Parsed(value.round() as u64),
        FieldValue::Missing => FieldValue::Missing,
        FieldValue::Invalid(text) => FieldValue::Invalid(text),
    }
}
