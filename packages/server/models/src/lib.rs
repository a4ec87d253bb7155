#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the freezing-zones server.
//!
//! The dashboard render model itself is served as-is; these types cover
//! the envelope around it.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` when the server answers.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// Response of `GET /api/years`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiYears {
    /// Selectable years, newest first.
    pub years: Vec<String>,
    /// Year used when a request omits one.
    pub default_year: Option<String>,
}

/// Query parameters for `GET /api/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// 4-digit year. Defaults to the newest supported year.
    pub year: Option<String>,
    /// Province name or `all`.
    pub province: Option<String>,
    /// Full province/district name or `all`.
    pub district: Option<String>,
    /// Drop the cached year and refetch before answering.
    #[serde(default)]
    pub refresh: bool,
}

/// Error body returned with any non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Builds an error body from anything displayable.
    #[must_use]
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
