//! Generates a synthetic disaster-declaration CSV for offline use.
//!
//! The output matches the columns the viewer reads (`state`,
//! `declarationDate`, `incidentType`) plus a couple of extra columns the
//! loader is expected to ignore.  Point the app at it with
//! `DISASTER_DATA_URL=sample_declarations.csv`.

use std::io::Write;

use anyhow::{Context, Result};

const STATES: &[&str] = &[
    "TX", "CA", "FL", "OK", "NY", "WA", "LA", "MO", "KY", "VA", "AL", "GA", "TN", "MN", "IA",
    "KS", "NE", "OR", "CO", "AZ", "NM", "MT", "ND", "SD",
];

const INCIDENT_TYPES: &[&str] = &[
    "Flood",
    "Fire",
    "Hurricane",
    "Severe Storm",
    "Tornado",
    "Severe Ice Storm",
    "Snowstorm",
    "Drought",
    "Earthquake",
    "Biological",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_declarations.csv".to_string());
    let rows: usize = std::env::args()
        .nth(2)
        .map(|s| s.parse())
        .transpose()
        .context("row count must be a number")?
        .unwrap_or(800);

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {path}"))?;

    writer.write_record([
        "disasterNumber",
        "state",
        "declarationDate",
        "incidentType",
        "declarationTitle",
    ])?;

    for i in 0..rows {
        let state = rng.pick(STATES);
        let incident = rng.pick(INCIDENT_TYPES);
        let year = rng.range(1990, 2025);
        let month = rng.range(1, 13);
        let day = rng.range(1, 29);

        // A few rows with a missing field, exercising the drop policy.
        let incident = if rng.next_u64() % 50 == 0 { "" } else { incident };

        writer.write_record([
            (1000 + i).to_string(),
            state.to_string(),
            format!("{year}-{month:02}-{day:02}T00:00:00.000Z"),
            incident.to_string(),
            format!("{incident} declaration in {state}"),
        ])?;
    }

    writer.flush()?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "wrote {rows} rows to {path}")?;
    Ok(())
}
