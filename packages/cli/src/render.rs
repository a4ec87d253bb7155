//! Plain-text rendering of the dashboard render model.

use std::cmp::Reverse;

use console::{Alignment, pad_str, style};
use freezing_zones_analytics_models::ProvinceTotal;
use freezing_zones_dashboard::{DashboardView, MapPoint, TableRow};
use freezing_zones_zone_models::Year;

/// Width of the longest bar in the province chart.
const BAR_WIDTH: u64 = 40;

/// Display width of the zone-name column.
const NAME_WIDTH: usize = 24;

/// Markers listed in the text rendering of the map.
const MAX_MARKERS: usize = 10;

/// Message shown when a year has no usable records.
#[must_use]
pub fn render_no_data(year: Year) -> String {
    style(format!("No freezing-zone data available for {year}."))
        .yellow()
        .to_string()
}

/// Message shown when the upstream load failed.
#[must_use]
pub fn render_load_failure(year: Year) -> String {
    style(format!(
        "No data available for {year}: the upstream request failed."
    ))
    .red()
    .to_string()
}

/// Renders the full dashboard as terminal text.
#[must_use]
pub fn render_view(view: &DashboardView) -> String {
    let mut lines = vec![
        style(&view.title).bold().to_string(),
        format!(
            "Province: {}   District: {}",
            view.filter.province, view.filter.district
        ),
        String::new(),
    ];

    let summary = &view.summary;
    lines.push(format!(
        "Zones: {}   Accidents: {}   Casualties: {}",
        summary.record_count, summary.total_occurrences, summary.total_casualties
    ));
    lines.push(format!(
        "Mean accidents per zone: {}   Mean casualties per zone: {}",
        format_mean(summary.mean_occurrences),
        format_mean(summary.mean_casualties)
    ));

    if view.truncated {
        lines.push(
            style("Note: only the first page of results was returned; totals may be incomplete.")
                .yellow()
                .to_string(),
        );
    }

    if view.top_zones.is_empty() {
        lines.push(String::new());
        lines.push("No zones match this selection.".to_string());
    } else {
        lines.push(String::new());
        lines.push(style("Top zones").bold().underlined().to_string());
        lines.extend(table(&view.top_zones));

        lines.push(String::new());
        lines.push(style("Accidents by province").bold().underlined().to_string());
        lines.extend(bar_chart(&view.province_comparison));

        lines.push(String::new());
        lines.push(style("Province distribution").bold().underlined().to_string());
        lines.extend(distribution(&view.province_distribution));

        lines.push(String::new());
        lines.push(style("Map markers").bold().underlined().to_string());
        lines.extend(markers(&view.map_points));
    }

    lines.push(String::new());
    lines.push(style("Insights").bold().underlined().to_string());
    lines.extend(view.insights.iter().map(|insight| format!("  - {insight}")));

    lines.join("\n")
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map_or_else(|| "-".to_string(), |m| format!("{m:.2}"))
}

fn table(rows: &[TableRow]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>4}  {}  {:>9}  {:>10}",
        "Rank",
        pad_str("Zone", NAME_WIDTH, Alignment::Left, None),
        "Accidents",
        "Casualties"
    )];

    lines.extend(rows.iter().map(|row| {
        format!(
            "{:>4}  {}  {:>9}  {:>10}",
            row.rank,
            pad_str(&row.name, NAME_WIDTH, Alignment::Left, Some("…")),
            row.occurrence_count,
            row.casualty_count
                .map_or_else(|| "-".to_string(), |c| c.to_string())
        )
    }));

    lines
}

/// Horizontal bars scaled so the largest total spans [`BAR_WIDTH`].
fn bar_chart(totals: &[ProvinceTotal]) -> Vec<String> {
    let max = totals
        .iter()
        .map(|t| t.occurrence_count)
        .max()
        .unwrap_or_default();
    let label_width = totals
        .iter()
        .map(|t| console::measure_text_width(&t.province))
        .max()
        .unwrap_or_default();

    totals
        .iter()
        .map(|total| {
            let len = if max == 0 {
                0
            } else {
                (total.occurrence_count * BAR_WIDTH).div_ceil(max)
            };
            format!(
                "{}  {} {}",
                pad_str(&total.province, label_width, Alignment::Left, None),
                style("█".repeat(usize::try_from(len).unwrap_or_default())).cyan(),
                total.occurrence_count
            )
        })
        .collect()
}

/// Each province's share of all accidents, in the order given.
#[allow(clippy::cast_precision_loss)]
fn distribution(totals: &[ProvinceTotal]) -> Vec<String> {
    let sum: u64 = totals.iter().map(|t| t.occurrence_count).sum();
    let label_width = totals
        .iter()
        .map(|t| console::measure_text_width(&t.province))
        .max()
        .unwrap_or_default();

    totals
        .iter()
        .map(|total| {
            let share = if sum == 0 {
                0.0
            } else {
                total.occurrence_count as f64 * 100.0 / sum as f64
            };
            format!(
                "{}  {:>6}  {share:>5.1}%",
                pad_str(&total.province, label_width, Alignment::Left, None),
                total.occurrence_count
            )
        })
        .collect()
}

/// The largest markers first, capped at [`MAX_MARKERS`].
fn markers(points: &[MapPoint]) -> Vec<String> {
    let mut ordered: Vec<&MapPoint> = points.iter().collect();
    ordered.sort_by_key(|point| Reverse(point.occurrence_count));

    let mut lines: Vec<String> = ordered
        .iter()
        .take(MAX_MARKERS)
        .map(|point| {
            format!(
                "{:>9.4}, {:>9.4}  {}  accidents {:>4}  size {:.1}",
                point.latitude,
                point.longitude,
                pad_str(&point.name, NAME_WIDTH, Alignment::Left, Some("…")),
                point.occurrence_count,
                point.marker_size
            )
        })
        .collect();

    if ordered.len() > MAX_MARKERS {
        lines.push(format!(
            "... and {} more marker(s)",
            ordered.len() - MAX_MARKERS
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use freezing_zones_analytics_models::RegionFilter;
    use freezing_zones_dashboard::{DashboardOutcome, FilterState, build_view};
    use freezing_zones_source::{ZoneQuery, ZoneSet};
    use freezing_zones_zone_models::{AccidentZone, province_of};

    use super::*;

    fn zone(name: &str, occurrences: u64, casualties: Option<u64>) -> AccidentZone {
        AccidentZone {
            province_district_name: name.to_string(),
            province: province_of(name).to_string(),
            spot_name: None,
            latitude: 37.5,
            longitude: 127.0,
            occurrence_count: occurrences,
            casualty_count: casualties,
            deaths: None,
            serious_injuries: None,
            minor_injuries: None,
            reported_injuries: None,
        }
    }

    fn view(filter: &FilterState, truncated: bool) -> DashboardView {
        view_of(
            vec![
                zone("경기 고양시", 8, Some(12)),
                zone("강원 춘천시", 4, None),
            ],
            filter,
            truncated,
        )
    }

    fn view_of(zones: Vec<AccidentZone>, filter: &FilterState, truncated: bool) -> DashboardView {
        let set = ZoneSet {
            query: ZoneQuery::for_year(filter.year),
            zones,
            total_count: None,
            truncated,
            dropped: 0,
        };
        match build_view(&set, filter) {
            DashboardOutcome::Ready(view) => *view,
            DashboardOutcome::NoData { .. } => panic!("expected a view"),
        }
    }

    fn year() -> Year {
        Year::new(2021).unwrap()
    }

    #[test]
    fn renders_sections() {
        let text = render_view(&view(&FilterState::for_year(year()), false));

        assert!(text.contains("2021 freezing accident hotspots"));
        assert!(text.contains("Zones: 2   Accidents: 12   Casualties: 12"));
        assert!(text.contains("Mean accidents per zone: 6.00"));
        assert!(text.contains("경기 고양시"));
        assert!(text.contains("Insights"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn largest_province_gets_full_bar() {
        let text = render_view(&view(&FilterState::for_year(year()), false));
        assert!(text.contains(&"█".repeat(40)));
        assert!(!text.contains(&"█".repeat(41)));
    }

    #[test]
    fn distribution_lists_shares_alphabetically() {
        let text = render_view(&view(&FilterState::for_year(year()), false));
        let section = text
            .split("Province distribution")
            .nth(1)
            .and_then(|rest| rest.split("Map markers").next())
            .unwrap();

        assert!(section.contains("33.3%"));
        assert!(section.contains("66.7%"));
        assert!(section.find("강원").unwrap() < section.find("경기").unwrap());
    }

    #[test]
    fn markers_list_position_and_size() {
        let text = render_view(&view(&FilterState::for_year(year()), false));
        let section = text
            .split("Map markers")
            .nth(1)
            .and_then(|rest| rest.split("Insights").next())
            .unwrap();

        assert!(section.contains("37.5000"));
        assert!(section.contains("127.0000"));
        assert!(section.contains("size 20.0"));
        assert!(section.contains("size 14.1"));
        assert!(section.find("고양시").unwrap() < section.find("춘천시").unwrap());
        assert!(!section.contains("more marker"));
    }

    #[test]
    fn markers_beyond_limit_are_counted() {
        let zones = (1..=12)
            .map(|i| zone(&format!("경기 구역{i}"), i, None))
            .collect();
        let text = render_view(&view_of(zones, &FilterState::for_year(year()), false));

        assert!(text.contains("... and 2 more marker(s)"));
        assert!(text.contains("구역12"));
        assert!(!text.contains("구역1 "));
    }

    #[test]
    fn truncation_is_noted() {
        let text = render_view(&view(&FilterState::for_year(year()), true));
        assert!(text.contains("only the first page"));
    }

    #[test]
    fn empty_selection_skips_table() {
        let filter = FilterState {
            year: year(),
            province: RegionFilter::from("제주"),
            district: RegionFilter::All,
        };
        let text = render_view(&view(&filter, false));

        assert!(text.contains("No zones match this selection."));
        assert!(text.contains("Mean accidents per zone: -"));
        assert!(!text.contains("Top zones"));
    }

    #[test]
    fn no_data_message_names_year() {
        assert!(render_no_data(year()).contains("2021"));
        assert!(render_load_failure(year()).contains("2021"));
    }
}
