//! Ranking, grouping and summary statistics.

use std::collections::BTreeMap;

use freezing_zones_analytics_models::{ProvinceTotal, SummaryMetrics};
use freezing_zones_zone_models::AccidentZone;

/// The `n` records with the highest occurrence count, highest first.
///
/// Ties keep their input order.
pub fn top_n<'a>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
    n: usize,
) -> Vec<&'a AccidentZone> {
    top_n_by(records, n, |zone| zone.occurrence_count)
}

/// The `n` records with the highest `key`, highest first. Stable.
pub fn top_n_by<'a, F>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
    n: usize,
    key: F,
) -> Vec<&'a AccidentZone>
where
    F: Fn(&AccidentZone) -> u64,
{
    let mut ranked: Vec<&AccidentZone> = records.into_iter().collect();
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.truncate(n);
    ranked
}

/// Sums occurrence counts per derived province.
pub fn group_sum<'a>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
) -> BTreeMap<String, u64> {
    group_sum_by(
        records,
        |zone| zone.province.as_str(),
        |zone| zone.occurrence_count,
    )
}

/// Sums `value` per `key`. Group order carries no meaning.
pub fn group_sum_by<'a, K, V>(
    records: impl IntoIterator<Item = &'a AccidentZone>,
    key: K,
    value: V,
) -> BTreeMap<String, u64>
where
    K: Fn(&'a AccidentZone) -> &'a str,
    V: Fn(&AccidentZone) -> u64,
{
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for zone in records {
        *totals.entry(key(zone).to_string()).or_default() += value(zone);
    }
    totals
}

/// Group totals sorted by count descending, then province name.
#[must_use]
pub fn sorted_totals(totals: &BTreeMap<String, u64>) -> Vec<ProvinceTotal> {
    let mut sorted: Vec<ProvinceTotal> = totals
        .iter()
        .map(|(province, &occurrence_count)| ProvinceTotal {
            province: province.clone(),
            occurrence_count,
        })
        .collect();
    sorted.sort_by(|a, b| {
        b.occurrence_count
            .cmp(&a.occurrence_count)
            .then_with(|| a.province.cmp(&b.province))
    });
    sorted
}

/// Mean occurrence count, or `None` for an empty input.
pub fn mean_occurrences<'a>(records: impl IntoIterator<Item = &'a AccidentZone>) -> Option<f64> {
    mean(records.into_iter().map(|zone| zone.occurrence_count))
}

/// Mean casualty count over records that reported one, or `None` if none
/// did.
pub fn mean_casualties<'a>(records: impl IntoIterator<Item = &'a AccidentZone>) -> Option<f64> {
    mean(records.into_iter().filter_map(|zone| zone.casualty_count))
}

/// Headline metrics for a filtered set.
pub fn summarize<'a>(records: impl IntoIterator<Item = &'a AccidentZone>) -> SummaryMetrics {
    let records: Vec<&AccidentZone> = records.into_iter().collect();

    SummaryMetrics {
        record_count: records.len(),
        total_occurrences: records.iter().map(|z| z.occurrence_count).sum(),
        total_casualties: records.iter().filter_map(|z| z.casualty_count).sum(),
        mean_occurrences: mean_occurrences(records.iter().copied()),
        mean_casualties: mean_casualties(records.iter().copied()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| {
        (sum.saturating_add(v), count + 1)
    });
    if count == 0 {
        log::trace!("mean over empty input");
        return None;
    }
    Some(sum as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::{sample, zone};

    #[test]
    fn top_n_sorts_descending_and_truncates() {
        let records = sample();
        let top = top_n(&records, 3);
        let counts: Vec<u64> = top.iter().map(|z| z.occurrence_count).collect();
        assert_eq!(counts, [9, 7, 4]);
    }

    #[test]
    fn top_n_is_stable_on_ties() {
        let records = vec![
            zone("A 1", 5, None),
            zone("B 1", 8, None),
            zone("A 2", 5, None),
            zone("C 1", 5, None),
        ];
        let names: Vec<&str> = top_n(&records, 10)
            .iter()
            .map(|z| z.province_district_name.as_str())
            .collect();
        assert_eq!(names, ["B 1", "A 1", "A 2", "C 1"]);
    }

    #[test]
    fn top_n_returns_subsequence_of_input() {
        let records = sample();
        let top = top_n(&records, 10);
        assert!(top.len() <= 10);
        assert_eq!(top.len(), records.len());
        for picked in top {
            assert!(records.iter().any(|r| std::ptr::eq(r, picked)));
        }
    }

    #[test]
    fn group_sum_by_province() {
        let records = vec![zone("A x", 3, None), zone("A y", 5, None), zone("B z", 2, None)];
        let totals = group_sum(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["A"], 8);
        assert_eq!(totals["B"], 2);
    }

    #[test]
    fn group_sum_by_custom_field() {
        let records = sample();
        let casualties = group_sum_by(
            &records,
            |z| z.province.as_str(),
            |z| z.casualty_count.unwrap_or_default(),
        );
        assert_eq!(casualties["경기"], 13);
        assert_eq!(casualties["강원"], 7);
    }

    #[test]
    fn sorted_totals_descending() {
        let totals = group_sum(&sample());
        let sorted = sorted_totals(&totals);
        assert_eq!(sorted[0].province, "강원");
        assert_eq!(sorted[0].occurrence_count, 13);
        assert_eq!(sorted[1].province, "경기");
        assert_eq!(sorted[1].occurrence_count, 12);
    }

    #[test]
    fn means_skip_missing_casualties() {
        let records = sample();
        assert_eq!(mean_occurrences(&records), Some(5.0));
        assert_eq!(mean_casualties(&records), Some(5.0));
    }

    #[test]
    fn empty_input_has_no_means() {
        let records: Vec<AccidentZone> = Vec::new();
        let summary = summarize(&records);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.mean_occurrences, None);
        assert_eq!(summary.mean_casualties, None);
        assert!(top_n(&records, 10).is_empty());
        assert!(group_sum(&records).is_empty());
    }

    #[test]
    fn summarize_totals() {
        let summary = summarize(&sample());
        assert_eq!(summary.record_count, 5);
        assert_eq!(summary.total_occurrences, 25);
        assert_eq!(summary.total_casualties, 20);
    }
}
