#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Freezing-zone data source.
//!
//! Fetches one page of accident-zone records from the upstream portal via a
//! [`ZoneSource`], cleans them into [`AccidentZone`]s, and memoizes the
//! result per [`ZoneQuery`] in a [`session::Session`]-owned cache.

pub mod api;
pub mod cache;
pub mod cleaning;
pub mod http;
pub mod loader;
pub mod progress;
pub mod session;
pub mod source_def;

use async_trait::async_trait;
use freezing_zones_zone_models::raw::ZoneEnvelope;
use freezing_zones_zone_models::{AccidentZone, InvalidYearError, Year};
use serde::Serialize;

/// Errors that can occur during data source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connect error, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Request URL with the service key redacted.
        url: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The portal reported a non-success result code.
    #[error("Upstream API error {code}: {message}")]
    Api {
        /// Portal result code.
        code: String,
        /// Portal result message.
        message: String,
    },

    /// The embedded source definition could not be parsed.
    #[error("Source definition error: {0}")]
    Definition(#[from] toml::de::Error),

    /// Required configuration was missing or unusable.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The requested year cannot be queried.
    #[error(transparent)]
    InvalidYear(#[from] InvalidYearError),
}

/// Parameters for one upstream query.
///
/// Also serves as the cache key: two loads with equal queries share a
/// result within a session. Empty region strings mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneQuery {
    /// Year to query.
    pub year: Year,
    /// Upstream province filter (`siDo`), passed through verbatim.
    pub province: String,
    /// Upstream district filter (`guGun`), passed through verbatim.
    pub district: String,
}

impl ZoneQuery {
    /// Creates an unfiltered query for a single year.
    #[must_use]
    pub const fn for_year(year: Year) -> Self {
        Self {
            year,
            province: String::new(),
            district: String::new(),
        }
    }
}

/// The cleaned result of one load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSet {
    /// The query this set answers.
    pub query: ZoneQuery,
    /// Records that survived cleaning, in upstream order.
    pub zones: Vec<AccidentZone>,
    /// Row count the portal reported, if any.
    pub total_count: Option<u64>,
    /// Whether the portal holds more rows than the single fetched page.
    pub truncated: bool,
    /// Number of items dropped during cleaning.
    pub dropped: usize,
}

impl ZoneSet {
    /// Returns `true` when no records survived cleaning.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Anything that can answer a [`ZoneQuery`] with a raw envelope.
///
/// The production implementation is [`api::OpenApiSource`]; tests use
/// in-memory sources.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Returns a unique identifier for this source.
    fn id(&self) -> &str;

    /// Fetches the raw envelope for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, the server answers
    /// with a non-success status, or the body is not a valid envelope.
    async fn fetch(&self, query: &ZoneQuery) -> Result<ZoneEnvelope, SourceError>;
}
