//! Field checks shared by every create/update payload.
//!
//! Payload fields arrive as optional strings; an empty (or blank) string is
//! treated the same as an absent field, which is what gives updates their
//! merge-patch behaviour.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ActiveEnum, Iterable};

use crate::error::AppError;

/// Drops empty strings so they never overwrite stored values.
pub fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Collects the names of required fields that are missing.
#[derive(Default)]
pub struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value, recording `field` as missing when it is absent or blank.
    pub fn text(&mut self, field: &'static str, value: Option<String>) -> String {
        match provided(value) {
            Some(v) => v,
            None => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// Returns the value, recording `field` as missing unless it is strictly positive.
    pub fn positive(&mut self, field: &'static str, value: Option<i32>) -> i32 {
        match value {
            Some(v) if v > 0 => v,
            _ => {
                self.missing.push(field);
                0
            }
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

/// Comma separated list of the values `E` accepts.
pub fn allowed<E>() -> String
where
    E: ActiveEnum<Value = String>,
{
    E::iter()
        .map(|v| v.to_value())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps a raw string onto its enum variant.
pub fn parse_enum<E>(field: &str, raw: &str) -> Result<E, AppError>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.to_string()).map_err(|_| {
        AppError::Validation(format!("Invalid {field}. Use: {}", allowed::<E>()))
    })
}

/// Like [`parse_enum`], but absent or blank input yields `None`.
pub fn parse_optional_enum<E>(field: &str, raw: Option<String>) -> Result<Option<E>, AppError>
where
    E: ActiveEnum<Value = String>,
{
    provided(raw)
        .map(|v| parse_enum(field, v.trim()))
        .transpose()
}

/// Create-side count: absent means zero, negatives are rejected.
pub fn non_negative(field: &str, value: Option<i32>) -> Result<i32, AppError> {
    match value {
        None => Ok(0),
        Some(v) if v >= 0 => Ok(v),
        Some(_) => Err(AppError::Validation(format!("{field} must not be negative"))),
    }
}

/// Update-side count: zero leaves the stored value alone, negatives are rejected.
pub fn changed_count(field: &str, value: Option<i32>) -> Result<Option<i32>, AppError> {
    match value {
        None | Some(0) => Ok(None),
        Some(v) if v > 0 => Ok(Some(v)),
        Some(_) => Err(AppError::Validation(format!("{field} must not be negative"))),
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp field. RFC 3339 values are converted to UTC; naive
/// values are taken as UTC already; a bare date means midnight.
pub fn parse_timestamp(
    field: &str,
    raw: Option<String>,
) -> Result<Option<NaiveDateTime>, AppError> {
    let Some(raw) = provided(raw) else {
        return Ok(None);
    };
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc).naive_utc()));
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(dt));
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(dt));
    }

    Err(AppError::Validation(format!("Invalid {field} timestamp")))
}
