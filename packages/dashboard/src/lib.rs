#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Freezing-zone dashboard pipeline.
//!
//! Each user interaction calls [`Dashboard::view`] with the current
//! [`FilterState`]. The year's records come from the session cache (or a
//! single upstream fetch on a miss), are narrowed by province and
//! district, and are aggregated into a [`DashboardView`] that any UI can
//! render.

pub mod view;

use freezing_zones_source::progress::ProgressCallback;
use freezing_zones_source::session::Session;
use freezing_zones_source::{SourceError, ZoneQuery};
use freezing_zones_zone_models::Year;

pub use view::{DashboardOutcome, DashboardView, FilterState, MapPoint, TableRow, build_view};

/// Session-owning entry point for the dashboard pipeline.
pub struct Dashboard {
    session: Session,
}

impl Dashboard {
    /// Wraps an existing session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Creates a dashboard backed by the live portal.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the session cannot be configured from
    /// the environment.
    pub fn from_env() -> Result<Self, SourceError> {
        Ok(Self::new(Session::from_env()?))
    }

    /// Years the year selector offers, newest first.
    #[must_use]
    pub fn supported_years(&self) -> Vec<Year> {
        self.session.definition().supported_years()
    }

    /// Parses a year string against the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidYear`] if `s` is malformed or out of
    /// range.
    pub fn parse_year(&self, s: &str) -> Result<Year, SourceError> {
        Ok(self.session.definition().parse_year(s)?)
    }

    /// Runs load, filter and aggregate for `filter`.
    ///
    /// Region filters are applied locally; the upstream is always queried
    /// by year alone, so every filter change within a year is a cache hit.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if loading the year fails. No partial view
    /// is produced.
    pub async fn view(
        &mut self,
        filter: &FilterState,
        progress: &dyn ProgressCallback,
    ) -> Result<DashboardOutcome, SourceError> {
        let set = self
            .session
            .load(&ZoneQuery::for_year(filter.year), progress)
            .await?;
        Ok(build_view(&set, filter))
    }

    /// Forgets the cached data for `year` so the next view refetches it.
    pub fn refresh(&mut self, year: Year) -> bool {
        self.session.invalidate(&ZoneQuery::for_year(year))
    }
}
