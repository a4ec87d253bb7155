//! Config-driven definition of the upstream freezing-zone endpoint.
//!
//! The TOML in `packages/source/sources/` is baked into the binary at
//! compile time via [`include_str!`]. Environment variables can override
//! the endpoint and supply the service key at runtime.

use freezing_zones_zone_models::{InvalidYearError, Year};
use serde::Deserialize;

use crate::SourceError;

/// Source definition embedded at compile time.
const SOURCE_TOML: &str = include_str!("../sources/freezing_zones.toml");

/// Environment variable holding the portal service key (decoded form).
pub const SERVICE_KEY_ENV: &str = "FREEZING_ZONES_SERVICE_KEY";

/// Environment variable overriding the endpoint URL.
pub const API_URL_ENV: &str = "FREEZING_ZONES_API_URL";

/// Environment variable setting the cache TTL in seconds.
pub const CACHE_TTL_ENV: &str = "FREEZING_ZONES_CACHE_TTL_SECS";

/// Everything needed to query the upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"koroad_freezing_zones"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Endpoint URL.
    pub api_url: String,
    /// Value sent for the response type parameter.
    pub response_type: String,
    /// Rows requested per call. Only one page is ever fetched.
    pub page_size: u64,
    /// Page number requested.
    pub page_no: u64,
    /// Connect and read timeout in seconds.
    pub timeout_secs: u64,
    /// Earliest year the endpoint serves.
    pub min_year: u16,
    /// Latest year the endpoint serves.
    pub max_year: u16,
    /// Query parameter names.
    pub params: QueryParamNames,
}

/// Upstream query parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryParamNames {
    /// Service key parameter.
    pub service_key: String,
    /// Year parameter.
    pub year: String,
    /// Province filter parameter.
    pub province: String,
    /// District filter parameter.
    pub district: String,
    /// Response type parameter.
    pub response_type: String,
    /// Page size parameter.
    pub page_size: String,
    /// Page number parameter.
    pub page_no: String,
}

impl SourceDefinition {
    /// Parses the definition embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the embedded TOML is
    /// malformed.
    pub fn embedded() -> Result<Self, SourceError> {
        parse_source_toml(SOURCE_TOML).map_err(SourceError::from)
    }

    /// Parses a year string against this endpoint's supported range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidYearError`] if `s` is malformed or out of range.
    pub fn parse_year(&self, s: &str) -> Result<Year, InvalidYearError> {
        Year::parse_in(s, self.min_year, self.max_year)
    }

    /// Returns every supported year, newest first.
    #[must_use]
    pub fn supported_years(&self) -> Vec<Year> {
        Year::range_desc(self.min_year, self.max_year)
    }
}

/// Runtime settings read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Endpoint URL (definition default or override).
    pub api_url: String,
    /// Portal service key.
    pub service_key: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_url", &self.api_url)
            .field("service_key", &"***")
            .finish()
    }
}

impl ApiConfig {
    /// Reads [`SERVICE_KEY_ENV`] and [`API_URL_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the service key is unset or
    /// blank.
    pub fn from_env(definition: &SourceDefinition) -> Result<Self, SourceError> {
        let service_key = std::env::var(SERVICE_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SourceError::Config {
                message: format!("{SERVICE_KEY_ENV} is not set"),
            })?;

        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| definition.api_url.clone());

        Ok(Self {
            api_url,
            service_key,
        })
    }
}

/// Reads the optional cache TTL from [`CACHE_TTL_ENV`].
///
/// Unset, blank, or unparseable values mean "no expiry".
#[must_use]
pub fn cache_ttl_from_env() -> Option<std::time::Duration> {
    let raw = std::env::var(CACHE_TTL_ENV).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(std::time::Duration::from_secs(secs)),
        Err(e) => {
            log::warn!("Ignoring {CACHE_TTL_ENV}='{raw}': {e}");
            None
        }
    }
}

/// Parses a source definition from TOML.
///
/// # Errors
///
/// Returns a TOML error if `s` does not match [`SourceDefinition`].
pub fn parse_source_toml(s: &str) -> Result<SourceDefinition, toml::de::Error> {
    toml::from_str(s)
}
