use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, ChartKind, FilterState, YearFilter};
use crate::data::model::{distinct_years, Record};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded record set (empty until the fetch completes).
    pub records: Vec<Record>,

    /// Distinct years observed in the data, ascending.
    pub years: Vec<i32>,

    /// Selected year + chart kind.
    pub filter: FilterState,

    /// Indices of records passing the year filter (cached, input order).
    pub visible_indices: Vec<usize>,

    /// Key → colour assignment, shared by all chart kinds.
    pub colors: ColorMap,

    /// Load-failure message shown in place of the charts.
    pub error_message: Option<String>,

    /// Whether the initial fetch is still in flight.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            years: Vec::new(),
            filter: FilterState::default(),
            visible_indices: Vec::new(),
            colors: ColorMap::default(),
            error_message: None,
            loading: true,
        }
    }
}

impl AppState {
    /// Ingest the loaded record set: populate the year options and show
    /// everything.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.years = distinct_years(&records);
        self.visible_indices = (0..records.len()).collect();
        self.records = records;
        self.error_message = None;
        self.loading = false;
    }

    /// Record a fatal load failure; the message replaces the chart area.
    pub fn set_load_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.records.clear();
        self.years.clear();
        self.visible_indices.clear();
        self.loading = false;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.records, self.filter.year);
    }

    pub fn set_year(&mut self, year: YearFilter) {
        self.filter.year = year;
        self.refilter();
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.filter.chart = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(state: &str, year: i32, incident: &str) -> Record {
        Record {
            state: state.to_string(),
            declared: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            year,
            incident_type: incident.to_string(),
        }
    }

    #[test]
    fn set_records_populates_years_and_shows_all() {
        let mut state = AppState::default();
        state.set_records(vec![
            rec("TX", 2021, "Flood"),
            rec("CA", 2019, "Fire"),
            rec("TX", 2021, "Flood"),
        ]);
        assert_eq!(state.years, vec![2019, 2021]);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert!(!state.loading);
    }

    #[test]
    fn set_year_refilters_and_all_restores_everything() {
        let mut state = AppState::default();
        state.set_records(vec![
            rec("TX", 2020, "Flood"),
            rec("CA", 2021, "Fire"),
            rec("FL", 2020, "Hurricane"),
        ]);

        state.set_year(YearFilter::Year(2020));
        assert_eq!(state.visible_indices, vec![0, 2]);

        state.set_year(YearFilter::All);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn load_error_clears_the_dataset() {
        let mut state = AppState::default();
        state.set_records(vec![rec("TX", 2020, "Flood")]);
        state.set_load_error("fetching data: connection refused".to_string());
        assert!(state.records.is_empty());
        assert!(state.years.is_empty());
        assert_eq!(
            state.error_message.as_deref(),
            Some("fetching data: connection refused")
        );
    }
}
