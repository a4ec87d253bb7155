//! Region filters and the selector options derived from loaded data.

use std::collections::BTreeSet;

use freezing_zones_analytics_models::RegionFilter;
use freezing_zones_zone_models::AccidentZone;

/// Keeps records whose derived province equals the selection.
///
/// [`RegionFilter::All`] keeps everything.
pub fn filter_by_province<'a>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
    province: &RegionFilter,
) -> Vec<&'a AccidentZone> {
    records
        .into_iter()
        .filter(|zone| province.matches(&zone.province))
        .collect()
}

/// Keeps records whose full province/district name equals the selection.
///
/// [`RegionFilter::All`] keeps everything.
pub fn filter_by_district<'a>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
    full_name: &RegionFilter,
) -> Vec<&'a AccidentZone> {
    records
        .into_iter()
        .filter(|zone| full_name.matches(&zone.province_district_name))
        .collect()
}

/// Province selector options: [`RegionFilter::All`] followed by every
/// distinct province, sorted.
pub fn province_options<'a>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
) -> Vec<RegionFilter> {
    let provinces: BTreeSet<&str> = records
        .into_iter()
        .map(|zone| zone.province.as_str())
        .filter(|p| !p.is_empty())
        .collect();

    std::iter::once(RegionFilter::All)
        .chain(provinces.into_iter().map(|p| RegionFilter::Named(p.to_string())))
        .collect()
}

/// District selector options for a province selection.
///
/// Only [`RegionFilter::All`] when `province` is itself `All`; otherwise
/// `All` followed by the sorted distinct district names in that province.
pub fn district_options<'a>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
    province: &RegionFilter,
) -> Vec<RegionFilter> {
    if province.is_all() {
        return vec![RegionFilter::All];
    }

    let districts: BTreeSet<&str> = records
        .into_iter()
        .filter(|zone| province.matches(&zone.province))
        .map(|zone| zone.province_district_name.as_str())
        .collect();

    std::iter::once(RegionFilter::All)
        .chain(districts.into_iter().map(|d| RegionFilter::Named(d.to_string())))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use freezing_zones_zone_models::province_of;

    use super::*;

    pub fn zone(name: &str, occurrences: u64, casualties: Option<u64>) -> AccidentZone {
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

    pub fn sample() -> Vec<AccidentZone> {
        vec![
            zone("경기 고양시", 7, Some(12)),
            zone("강원 춘천시", 4, Some(5)),
            zone("경기 파주시", 3, None),
            zone("강원 원주시", 9, Some(2)),
            zone("경기 고양시", 2, Some(1)),
        ]
    }

    #[test]
    fn province_filter_exact_match() {
        let records = sample();
        let filtered = filter_by_province(&records, &RegionFilter::from("경기"));
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|z| z.province == "경기"));

        assert!(filter_by_province(&records, &RegionFilter::from("경")).is_empty());
    }

    #[test]
    fn all_sentinel_bypasses_filters() {
        let records = sample();
        assert_eq!(filter_by_province(&records, &RegionFilter::All).len(), 5);
        assert_eq!(filter_by_district(&records, &RegionFilter::All).len(), 5);
    }

    #[test]
    fn district_filter_matches_full_name() {
        let records = sample();
        let filtered = filter_by_district(&records, &RegionFilter::from("경기 고양시"));
        assert_eq!(filtered.len(), 2);
        assert!(filter_by_district(&records, &RegionFilter::from("고양시")).is_empty());
    }

    #[test]
    fn filters_chain_and_preserve_order() {
        let records = sample();
        let province = filter_by_province(&records, &RegionFilter::from("경기"));
        let district = filter_by_district(province, &RegionFilter::from("경기 고양시"));
        let counts: Vec<u64> = district.iter().map(|z| z.occurrence_count).collect();
        assert_eq!(counts, [7, 2]);
    }

    #[test]
    fn province_options_start_with_all_and_are_sorted() {
        let options = province_options(&sample());
        assert_eq!(
            options,
            [
                RegionFilter::All,
                RegionFilter::from("강원"),
                RegionFilter::from("경기")
            ]
        );
    }

    #[test]
    fn district_options_depend_on_province() {
        let records = sample();
        assert_eq!(
            district_options(&records, &RegionFilter::All),
            [RegionFilter::All]
        );
        assert_eq!(
            district_options(&records, &RegionFilter::from("경기")),
            [
                RegionFilter::All,
                RegionFilter::from("경기 고양시"),
                RegionFilter::from("경기 파주시"),
            ]
        );
    }
}
