//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Decimal to the REAL representation used by the tables.
pub(crate) fn to_storage(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// REAL column back to a decimal; non-finite values mean the row is damaged.
pub(crate) fn from_storage(value: f64, label: &str) -> ResultEngine<Decimal> {
    if !value.is_finite() {
        return Err(EngineError::Corrupted(format!(
            "{label} is not a finite number"
        )));
    }
    Decimal::from_f64(value)
        .map(|d| d.normalize())
        .ok_or_else(|| EngineError::Corrupted(format!("{label} is out of range: {value}")))
}

pub(crate) fn ensure_non_negative(value: Decimal, label: &str) -> ResultEngine<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive(value: Decimal, label: &str) -> ResultEngine<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be > 0, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Folds text for matching: NFKD, combining marks dropped, lower-cased.
pub(crate) fn search_key(value: &str) -> String {
    value
        .trim()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}
