use std::io::Read;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::model::Record;

/// Default location of the FEMA disaster-declaration CSV.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/nitanagdeote/Federal-Emergency-Management-Agency-FEMA-Project/refs/heads/main/data.csv";

/// Environment variable overriding the data source (URL or local path).
pub const SOURCE_ENV_VAR: &str = "DISASTER_DATA_URL";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to produce a record set.  Fatal to the initial render; the UI
/// shows the message in place of the charts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetching data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reading data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the record set from a URL or local file path.
///
/// Rows missing any required field, or whose declaration date does not
/// parse, are dropped; malformed CSV framing or an absent required column
/// is an error.
pub fn load(source: &str) -> Result<Vec<Record>, LoadError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?
            .get(source)
            .send()?
            .error_for_status()?;
        let text = response.text()?;
        parse_records(text.as_bytes())
    } else {
        let text = std::fs::read_to_string(source)?;
        parse_records(text.as_bytes())
    }
}

/// The data source to load from: the `DISASTER_DATA_URL` override if set,
/// otherwise the FEMA CSV.
pub fn source_from_env() -> String {
    std::env::var(SOURCE_ENV_VAR).unwrap_or_else(|_| DEFAULT_SOURCE.to_string())
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Raw CSV row before validation.  Extra columns in the feed are ignored;
/// the three required ones default to empty so presence is checked per row
/// rather than by serde errors.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    state: String,
    #[serde(default, rename = "declarationDate")]
    declaration_date: String,
    #[serde(default, rename = "incidentType")]
    incident_type: String,
}

/// Parse CSV text into validated records.
pub fn parse_records<R: Read>(input: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers()?.clone();
    for required in ["state", "declarationDate", "incidentType"] {
        if !headers.iter().any(|h| h.trim() == required) {
            return Err(LoadError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in reader.deserialize::<RawRow>() {
        let row = result?;
        match Record::from_fields(
            row.state.trim(),
            row.declaration_date.trim(),
            row.incident_type.trim(),
        ) {
            Some(rec) => records.push(rec),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} incomplete rows while loading");
    }
    log::info!("loaded {} declarations", records.len());

    Ok(records)
}
