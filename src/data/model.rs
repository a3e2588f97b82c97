use chrono::{DateTime, Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Record – one retained disaster declaration
// ---------------------------------------------------------------------------

/// A single disaster declaration (one row of the source CSV).
///
/// Every retained record has a non-empty state, a parsed declaration date
/// and a non-empty incident type; rows failing that are dropped at load
/// time and never re-enter the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Declaring state (two-letter code in the FEMA feed).
    pub state: String,
    /// Declaration date.
    pub declared: NaiveDate,
    /// Calendar year derived from `declared`.
    pub year: i32,
    /// Incident category, e.g. "Flood" or "Hurricane".
    pub incident_type: String,
}

impl Record {
    /// Build a record from raw field text, deriving the year from the date.
    /// Returns `None` when any required field is empty or the date does not
    /// parse.
    pub fn from_fields(state: &str, declaration_date: &str, incident_type: &str) -> Option<Self> {
        if state.is_empty() || incident_type.is_empty() {
            return None;
        }
        let declared = parse_declaration_date(declaration_date)?;
        Some(Record {
            state: state.to_string(),
            year: declared.year(),
            declared,
            incident_type: incident_type.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Parse a declaration date.  The FEMA feed uses RFC 3339 timestamps
/// (`1953-05-02T04:00:00.000Z`); plain `YYYY-MM-DD` and `MM/DD/YYYY` are
/// accepted as well.
pub fn parse_declaration_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

/// Distinct years observed in the records, sorted ascending.  Feeds the
/// year-filter selector.
pub fn distinct_years(records: &[Record]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_timestamp() {
        let d = parse_declaration_date("1953-05-02T04:00:00.000Z").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(1953, 5, 2).unwrap());
    }

    #[test]
    fn parses_plain_date_forms() {
        assert_eq!(
            parse_declaration_date("2020-08-14"),
            NaiveDate::from_ymd_opt(2020, 8, 14)
        );
        assert_eq!(
            parse_declaration_date("08/14/2020"),
            NaiveDate::from_ymd_opt(2020, 8, 14)
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_declaration_date(""), None);
        assert_eq!(parse_declaration_date("not a date"), None);
        assert_eq!(parse_declaration_date("2020-13-40"), None);
    }

    #[test]
    fn from_fields_derives_year_and_drops_incomplete() {
        let rec = Record::from_fields("TX", "2021-02-19T00:00:00Z", "Severe Ice Storm").unwrap();
        assert_eq!(rec.year, 2021);
        assert_eq!(rec.state, "TX");

        assert!(Record::from_fields("", "2021-02-19", "Flood").is_none());
        assert!(Record::from_fields("TX", "", "Flood").is_none());
        assert!(Record::from_fields("TX", "2021-02-19", "").is_none());
    }

    #[test]
    fn distinct_years_sorted_and_deduped() {
        let mk = |y: i32| Record {
            state: "CA".into(),
            declared: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
            year: y,
            incident_type: "Fire".into(),
        };
        let records = vec![mk(2021), mk(1999), mk(2021), mk(2005)];
        assert_eq!(distinct_years(&records), vec![1999, 2005, 2021]);
    }
}
