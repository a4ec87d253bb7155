#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter selections and aggregate result types for the freezing-zone
//! dashboard.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentinel label meaning "do not filter on this dimension".
pub const ALL_SENTINEL: &str = "all";

/// Korean label for [`ALL_SENTINEL`], accepted as input.
pub const ALL_SENTINEL_KO: &str = "전체";

/// A province or district selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionFilter {
    /// No filtering.
    #[default]
    All,
    /// Exact-match on the given name.
    Named(String),
}

impl RegionFilter {
    /// Returns `true` for [`Self::All`].
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns `true` if `value` passes this filter.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == value,
        }
    }
}

impl std::fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_SENTINEL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(ALL_SENTINEL)
            || trimmed == ALL_SENTINEL_KO
        {
            Ok(Self::All)
        } else {
            Ok(Self::Named(trimmed.to_string()))
        }
    }
}

impl From<String> for RegionFilter {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(filter) => filter,
            Err(infallible) => match infallible {},
        }
    }
}

impl From<&str> for RegionFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RegionFilter> for String {
    fn from(filter: RegionFilter) -> Self {
        filter.to_string()
    }
}

/// Summed occurrence count for one province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceTotal {
    /// Province name.
    pub province: String,
    /// Sum of `occurrence_count` over the province's records.
    pub occurrence_count: u64,
}

/// Headline numbers for the current filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    /// Number of records.
    pub record_count: usize,
    /// Sum of occurrence counts.
    pub total_occurrences: u64,
    /// Sum of the casualty counts that were reported.
    pub total_casualties: u64,
    /// Mean occurrence count. `None` on an empty set.
    pub mean_occurrences: Option<f64>,
    /// Mean casualty count over records that reported one. `None` if none
    /// did.
    pub mean_casualties: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sentinels_as_all() {
        for s in ["all", "ALL", "", "  ", "전체"] {
            assert_eq!(s.parse::<RegionFilter>().unwrap(), RegionFilter::All, "{s:?}");
        }
    }

    #[test]
    fn parses_names_trimmed() {
        assert_eq!(
            RegionFilter::from(" 경기 "),
            RegionFilter::Named("경기".to_string())
        );
    }

    #[test]
    fn matches_exactly() {
        let filter = RegionFilter::from("경기 고양시");
        assert!(filter.matches("경기 고양시"));
        assert!(!filter.matches("경기 고양"));
        assert!(RegionFilter::All.matches("anything"));
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&RegionFilter::All).unwrap(),
            "\"all\""
        );
        let named: RegionFilter = serde_json::from_str("\"강원\"").unwrap();
        assert_eq!(named, RegionFilter::Named("강원".to_string()));
    }
}
