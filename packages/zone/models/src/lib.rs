#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident zone record types for the freezing-zones dashboard.
//!
//! The upstream portal publishes "frequent freezing-hazard zones": regions
//! with repeated ice-related traffic accidents in a given year. This crate
//! defines the raw wire schema ([`raw`]), explicit field coercion
//! ([`coerce`]), and the cleaned [`AccidentZone`] record every downstream
//! crate works with.

pub mod coerce;
pub mod raw;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Earliest year the upstream API publishes data for.
pub const MIN_SUPPORTED_YEAR: u16 = 2015;

/// Latest year the upstream API publishes data for.
pub const MAX_SUPPORTED_YEAR: u16 = 2023;

/// A cleaned accident-zone record.
///
/// Latitude, longitude and occurrence count are guaranteed present; records
/// missing any of them never make it into this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentZone {
    /// Combined administrative name (e.g. `"경기 고양시"`).
    pub province_district_name: String,
    /// First whitespace-delimited token of `province_district_name`.
    pub province: String,
    /// Hazard spot description, when the portal sends one.
    pub spot_name: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Number of accidents recorded in the zone for the queried year.
    pub occurrence_count: u64,
    /// Number of injured persons, if reported.
    pub casualty_count: Option<u64>,
    /// Deaths, if reported.
    pub deaths: Option<u64>,
    /// Serious injuries, if reported.
    pub serious_injuries: Option<u64>,
    /// Minor injuries, if reported.
    pub minor_injuries: Option<u64>,
    /// Injury reports, if reported.
    pub reported_injuries: Option<u64>,
}

/// Derives the province from a combined province/district name.
///
/// Returns an empty string when the name has no tokens.
#[must_use]
pub fn province_of(province_district_name: &str) -> &str {
    province_district_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
}

/// Upstream field names used when reporting why a record was rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZoneField {
    /// `la_crd`
    LaCrd,
    /// `lo_crd`
    LoCrd,
    /// `occrrnc_cnt`
    OccrrncCnt,
}

/// A calendar year the upstream API can be queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(u16);

impl Year {
    /// Creates a year within the default supported range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidYearError`] if `value` is outside
    /// [`MIN_SUPPORTED_YEAR`]..=[`MAX_SUPPORTED_YEAR`].
    pub fn new(value: u16) -> Result<Self, InvalidYearError> {
        Self::new_in(value, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR)
    }

    /// Creates a year within an explicit inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidYearError`] if `value` is outside `min..=max`.
    pub fn new_in(value: u16, min: u16, max: u16) -> Result<Self, InvalidYearError> {
        if (min..=max).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidYearError {
                input: value.to_string(),
                reason: InvalidYearReason::OutOfRange { min, max },
            })
        }
    }

    /// Parses a 4-digit year string within an explicit inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidYearError`] if `s` is not exactly four ASCII digits
    /// or falls outside `min..=max`.
    pub fn parse_in(s: &str, min: u16, max: u16) -> Result<Self, InvalidYearError> {
        let trimmed = s.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidYearError {
                input: s.to_string(),
                reason: InvalidYearReason::Malformed,
            });
        }
        let value: u16 = trimmed.parse().map_err(|_| InvalidYearError {
            input: s.to_string(),
            reason: InvalidYearReason::Malformed,
        })?;
        Self::new_in(value, min, max)
    }

    /// Returns every year in `min..=max`, newest first.
    #[must_use]
    pub fn range_desc(min: u16, max: u16) -> Vec<Self> {
        (min..=max).rev().map(Self).collect()
    }

}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Year {
    type Err = InvalidYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_in(s, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR)
    }
}

impl TryFrom<String> for Year {
    type Error = InvalidYearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Year> for String {
    fn from(year: Year) -> Self {
        year.to_string()
    }
}

/// Why a year string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidYearReason {
    /// Not exactly four ASCII digits.
    Malformed,
    /// Outside the supported inclusive range.
    OutOfRange {
        /// Earliest accepted year.
        min: u16,
        /// Latest accepted year.
        max: u16,
    },
}

/// Error returned when a year cannot be used to query the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidYearError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: InvalidYearReason,
}

impl std::fmt::Display for InvalidYearError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            InvalidYearReason::Malformed => {
                write!(f, "invalid year '{}': expected 4 digits", self.input)
            }
            InvalidYearReason::OutOfRange { min, max } => {
                write!(f, "invalid year '{}': expected {min}-{max}", self.input)
            }
        }
    }
}

impl std::error::Error for InvalidYearError {}
