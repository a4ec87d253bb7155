//! The render model and the pure function that builds it.

use freezing_zones_analytics::{
    district_options, filter_by_district, filter_by_province, group_sum, province_options,
    sorted_totals, summarize, top_n,
};
use freezing_zones_analytics_models::{ProvinceTotal, RegionFilter, SummaryMetrics};
use freezing_zones_source::ZoneSet;
use freezing_zones_zone_models::{AccidentZone, Year};
use serde::{Deserialize, Serialize};

/// Rows shown in the ranked table.
pub const TOP_N: usize = 10;

/// Largest map marker diameter; the zone with the highest count gets it.
pub const MAX_MARKER_SIZE: f64 = 20.0;

/// Fixed takeaways shown under the charts.
pub const INSIGHTS: &[&str] = &[
    "Freezing accidents cluster in inland northern and mountainous regions.",
    "Concentrate snow clearing and de-icing on the highest-ranked zones.",
    "Compare accident and casualty counts per province to pre-empt high-risk stretches.",
];

/// The user's current selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Selected year.
    pub year: Year,
    /// Selected province.
    #[serde(default)]
    pub province: RegionFilter,
    /// Selected district (full province/district name).
    #[serde(default)]
    pub district: RegionFilter,
}

impl FilterState {
    /// All provinces and districts for `year`.
    #[must_use]
    pub const fn for_year(year: Year) -> Self {
        Self {
            year,
            province: RegionFilter::All,
            district: RegionFilter::All,
        }
    }
}

/// One marker on the point map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Hover label.
    pub name: String,
    /// Hazard spot description.
    pub spot_name: Option<String>,
    /// Accident count (also the colour scale value).
    pub occurrence_count: u64,
    /// Casualty count.
    pub casualty_count: Option<u64>,
    /// Marker diameter, area-proportional to `occurrence_count`.
    pub marker_size: f64,
}

/// One row of the ranked table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// 1-based rank.
    pub rank: usize,
    /// Province/district name.
    pub name: String,
    /// Accident count.
    pub occurrence_count: u64,
    /// Casualty count.
    pub casualty_count: Option<u64>,
}

/// Everything a UI needs to draw the dashboard for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Heading for the map and charts.
    pub title: String,
    /// Effective selections (the district may have been reset).
    pub filter: FilterState,
    /// Province selector options, `all` first.
    pub province_options: Vec<RegionFilter>,
    /// District selector options for the selected province, `all` first.
    pub district_options: Vec<RegionFilter>,
    /// Headline numbers for the filtered set.
    pub summary: SummaryMetrics,
    /// Map markers for the filtered set.
    pub map_points: Vec<MapPoint>,
    /// Highest-count zones.
    pub top_zones: Vec<TableRow>,
    /// Per-province totals, by province name.
    pub province_distribution: Vec<ProvinceTotal>,
    /// Per-province totals, highest first.
    pub province_comparison: Vec<ProvinceTotal>,
    /// Whether the upstream page limit cut the year's data short.
    pub truncated: bool,
    /// Fixed takeaways.
    pub insights: Vec<String>,
}

/// Result of running the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DashboardOutcome {
    /// The upstream returned no usable records for the year.
    NoData {
        /// The queried year.
        year: Year,
    },
    /// A render model is available.
    Ready(Box<DashboardView>),
}

/// Builds the render model for `filter` over a loaded set.
///
/// Short-circuits to [`DashboardOutcome::NoData`] before computing any
/// aggregate when the set is empty.
#[must_use]
pub fn build_view(set: &ZoneSet, filter: &FilterState) -> DashboardOutcome {
    if set.is_empty() {
        log::info!("No freezing-zone data for {}", filter.year);
        return DashboardOutcome::NoData { year: filter.year };
    }

    let zones = &set.zones;
    let province_options = province_options(zones);
    let district_options = district_options(zones, &filter.province);

    let mut effective = filter.clone();
    if !district_options.contains(&effective.district) {
        log::debug!(
            "District {} is not in province {}; resetting to all",
            effective.district,
            effective.province
        );
        effective.district = RegionFilter::All;
    }

    let filtered = filter_by_district(
        filter_by_province(zones, &effective.province),
        &effective.district,
    );

    let totals = group_sum(filtered.iter().copied());

    DashboardOutcome::Ready(Box::new(DashboardView {
        title: format!("{} freezing accident hotspots", effective.year),
        summary: summarize(filtered.iter().copied()),
        map_points: map_points(&filtered),
        top_zones: top_n(filtered.iter().copied(), TOP_N)
            .into_iter()
            .enumerate()
            .map(|(i, zone)| TableRow {
                rank: i + 1,
                name: zone.province_district_name.clone(),
                occurrence_count: zone.occurrence_count,
                casualty_count: zone.casualty_count,
            })
            .collect(),
        province_distribution: totals
            .iter()
            .map(|(province, &occurrence_count)| ProvinceTotal {
                province: province.clone(),
                occurrence_count,
            })
            .collect(),
        province_comparison: sorted_totals(&totals),
        truncated: set.truncated,
        insights: INSIGHTS.iter().map(|s| (*s).to_string()).collect(),
        filter: effective,
        province_options,
        district_options,
    }))
}

#[allow(clippy::cast_precision_loss)]
fn map_points(zones: &[&AccidentZone]) -> Vec<MapPoint> {
    let max = zones
        .iter()
        .map(|z| z.occurrence_count)
        .max()
        .unwrap_or_default();

    zones
        .iter()
        .map(|zone| MapPoint {
            latitude: zone.latitude,
            longitude: zone.longitude,
            name: zone.province_district_name.clone(),
            spot_name: zone.spot_name.clone(),
            occurrence_count: zone.occurrence_count,
            casualty_count: zone.casualty_count,
            marker_size: if max == 0 {
                1.0
            } else {
                (MAX_MARKER_SIZE * (zone.occurrence_count as f64 / max as f64).sqrt()).max(1.0)
            },
        })
        .collect()
}
