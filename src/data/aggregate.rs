use std::collections::BTreeMap;
use std::collections::HashMap;

use super::model::Record;

/// Cap on the by-state table: only the 20 busiest states are charted.
pub const TOP_STATES: usize = 20;

/// Category substituted for an empty incident type at aggregation time.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ---------------------------------------------------------------------------
// AggregateEntry – (key, count), rebuilt fresh on every render
// ---------------------------------------------------------------------------

/// One grouping key paired with its record count under the current filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub key: String,
    pub count: usize,
}

/// Count records per key, keeping first-encounter order of the keys.
fn count_by_key<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<AggregateEntry> {
    let mut order: Vec<AggregateEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for key in keys {
        match index.get(key) {
            Some(&i) => order[i].count += 1,
            None => {
                index.insert(key.to_string(), order.len());
                order.push(AggregateEntry {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    order
}

/// Group the filtered records by state, count descending, top 20 only.
/// The sort is stable, so equal counts keep first-encounter order.
pub fn by_region(records: &[Record], indices: &[usize]) -> Vec<AggregateEntry> {
    let mut entries = count_by_key(indices.iter().map(|&i| records[i].state.as_str()));
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(TOP_STATES);
    entries
}

/// Group the FULL record set by year, ascending.
///
/// This deliberately ignores the active year filter: the trend view shows
/// the series the filter is selecting within, not the selection itself.
pub fn by_year(records: &[Record]) -> Vec<(i32, usize)> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.year).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Group the filtered records by incident type, count descending, no
/// truncation.  An empty type counts under "Unknown"; this substitution
/// happens here only, never at load time.
pub fn by_category(records: &[Record], indices: &[usize]) -> Vec<AggregateEntry> {
    let mut entries = count_by_key(indices.iter().map(|&i| {
        let t = records[i].incident_type.as_str();
        if t.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            t
        }
    }));
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// A slice's share of the total, rounded to the nearest whole percent.
pub fn percent_of(count: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, YearFilter};
    use chrono::NaiveDate;

    fn rec(state: &str, year: i32, incident: &str) -> Record {
        Record {
            state: state.to_string(),
            declared: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            year,
            incident_type: incident.to_string(),
        }
    }

    fn all(records: &[Record]) -> Vec<usize> {
        (0..records.len()).collect()
    }

    #[test]
    fn tx_tx_ca_scenario() {
        let records = vec![
            rec("TX", 2020, "Flood"),
            rec("TX", 2021, "Flood"),
            rec("CA", 2020, "Fire"),
        ];

        let regions = by_region(&records, &all(&records));
        assert_eq!(regions.len(), 2);
        assert_eq!((regions[0].key.as_str(), regions[0].count), ("TX", 2));
        assert_eq!((regions[1].key.as_str(), regions[1].count), ("CA", 1));

        let idx_2020 = filtered_indices(&records, YearFilter::Year(2020));
        let categories = by_category(&records, &idx_2020);
        assert_eq!((categories[0].key.as_str(), categories[0].count), ("Flood", 1));
        assert_eq!((categories[1].key.as_str(), categories[1].count), ("Fire", 1));
        assert_eq!(categories.iter().map(|e| e.count).sum::<usize>(), 2);
    }

    #[test]
    fn by_region_caps_at_twenty() {
        let mut records = Vec::new();
        for i in 0..30 {
            // state i appears (31 - i) times so every count is distinct
            for _ in 0..(31 - i) {
                records.push(rec(&format!("S{i:02}"), 2020, "Flood"));
            }
        }
        let regions = by_region(&records, &all(&records));
        assert_eq!(regions.len(), TOP_STATES);
        assert_eq!(regions[0].key, "S00");
        for pair in regions.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn by_region_ties_keep_first_encounter_order() {
        let records = vec![
            rec("WA", 2020, "Fire"),
            rec("OR", 2020, "Fire"),
            rec("CA", 2020, "Fire"),
            rec("CA", 2021, "Fire"),
        ];
        let regions = by_region(&records, &all(&records));
        let keys: Vec<&str> = regions.iter().map(|e| e.key.as_str()).collect();
        // CA leads with 2; WA/OR tie at 1 and keep input order.
        assert_eq!(keys, vec!["CA", "WA", "OR"]);
    }

    #[test]
    fn by_year_ignores_the_year_filter() {
        let records = vec![
            rec("TX", 2019, "Flood"),
            rec("TX", 2020, "Flood"),
            rec("CA", 2020, "Fire"),
        ];
        // by_year takes the full set regardless of any active filter
        let years = by_year(&records);
        assert_eq!(years, vec![(2019, 1), (2020, 2)]);
    }

    #[test]
    fn by_year_is_ascending() {
        let records = vec![
            rec("TX", 2021, "Flood"),
            rec("TX", 1999, "Flood"),
            rec("TX", 2010, "Flood"),
        ];
        let years: Vec<i32> = by_year(&records).into_iter().map(|(y, _)| y).collect();
        assert_eq!(years, vec![1999, 2010, 2021]);
    }

    #[test]
    fn by_category_counts_empty_as_unknown_and_sums_to_filtered_size() {
        let records = vec![
            rec("TX", 2020, "Flood"),
            rec("TX", 2020, ""),
            rec("CA", 2020, "Fire"),
            rec("CA", 2020, ""),
            rec("FL", 2020, "Flood"),
        ];
        let idx = all(&records);
        let categories = by_category(&records, &idx);

        let total: usize = categories.iter().map(|e| e.count).sum();
        assert_eq!(total, records.len());

        let unknown = categories
            .iter()
            .find(|e| e.key == UNKNOWN_CATEGORY)
            .unwrap();
        assert_eq!(unknown.count, 2);
    }

    #[test]
    fn empty_filtered_set_yields_empty_aggregates() {
        let records = vec![rec("TX", 2020, "Flood")];
        let idx = filtered_indices(&records, YearFilter::Year(2077));
        assert!(by_region(&records, &idx).is_empty());
        assert!(by_category(&records, &idx).is_empty());
    }

    #[test]
    fn percents_sum_to_100_within_rounding_error() {
        let counts = [7usize, 5, 3, 3, 1];
        let total: usize = counts.iter().sum();
        let sum: i64 = counts.iter().map(|&c| percent_of(c, total)).sum();
        assert!((sum - 100).unsigned_abs() as usize <= counts.len());
    }

    #[test]
    fn percent_of_empty_total_is_zero() {
        assert_eq!(percent_of(0, 0), 0);
    }
}
