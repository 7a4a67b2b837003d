//! Value normalizers shared by the filter builder and the stores
//!
//! Filter map values are always strings. These helpers fix the canonical
//! string form on the way in and parse it back on the way out.

use crate::errors::CatalogError;

/// Canonical string form of a decimal criterion.
///
/// Whole numbers keep one fractional digit (`750.0` stays `"750.0"`), other
/// values use the shortest representation that round-trips. Positional
/// notation is kept at every magnitude.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[inline]
pub fn format_integer(value: i64) -> String {
    value.to_string()
}

/// Parses a raw decimal query parameter. Empty input counts as absent.
///
/// `NaN` and infinities are rejected; no store can range over them.
pub fn parse_decimal_param(name: &str, raw: &str) -> Result<Option<f64>, CatalogError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(CatalogError::invalid_request(format!(
            "Invalid decimal value for {}: {}",
            name, trimmed
        ))),
    }
}

/// Parses a raw integer query parameter. Empty input counts as absent.
pub fn parse_integer_param(name: &str, raw: &str) -> Result<Option<i64>, CatalogError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| CatalogError::invalid_request(format!("Invalid integer value for {}: {}", name, trimmed)))
}

/// Parses a text parameter. Blank input counts as absent, anything else is
/// kept verbatim.
pub fn parse_text_param(raw: &str) -> Option<String> {
    if raw.trim().is_empty() { None } else { Some(raw.to_string()) }
}

/// Reads a numeric bound back out of a filter map value.
pub fn parse_numeric_bound(field: &str, value: Option<&str>) -> Result<Option<f64>, CatalogError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(bound) if bound.is_finite() => Ok(Some(bound)),
        _ => Err(CatalogError::invalid_request(format!(
            "Invalid numeric bound for {}: {}",
            field, raw
        ))),
    }
}
