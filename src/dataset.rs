use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Number of tracked in-match statistics carried per record.
pub const STAT_COUNT: usize = 8;

/// Column names of the tracked statistics, in feature order.
pub const STAT_NAMES: [&str; STAT_COUNT] = ["gf", "ga", "sh", "sot", "dist", "fk", "pk", "pkatt"];

/// Columns the dataset must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "date", "time", "team", "opponent", "result", "venue", "day", "gf", "ga", "sh", "sot", "dist",
    "fk", "pk", "pkatt",
];

mod date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer};

    const FMT: &str = "%Y-%m-%d";

    pub fn deserialize<'de, D>(d: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(&s, FMT).map_err(serde::de::Error::custom)
    }
}

/// One historical fixture seen from one team's perspective. The same
/// physical game may appear twice in a dataset, once per team.
///
/// Statistic cells left blank in the source file deserialize to `None` and
/// stay distinguishable from a recorded zero.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub time: String,
    pub team: String,
    pub opponent: String,
    pub result: String,
    pub venue: String,
    pub day: String,
    pub gf: Option<f64>,
    pub ga: Option<f64>,
    pub sh: Option<f64>,
    pub sot: Option<f64>,
    pub dist: Option<f64>,
    pub fk: Option<f64>,
    pub pk: Option<f64>,
    pub pkatt: Option<f64>,
}

impl MatchRecord {
    /// Tracked statistics in the order of [`STAT_NAMES`].
    pub fn stats(&self) -> [Option<f64>; STAT_COUNT] {
        [
            self.gf, self.ga, self.sh, self.sot, self.dist, self.fk, self.pk, self.pkatt,
        ]
    }

    /// True when this row's team won the game. Losses and draws are both
    /// non-wins as far as the label is concerned.
    pub fn is_win(&self) -> bool {
        self.result == "W"
    }
}

/// Loads the match table, validating the header row up front so a missing
/// column fails fast with its name instead of as a row-level deserialize
/// error somewhere mid-file.
pub fn load_matches(path: &Path) -> Result<Vec<MatchRecord>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn { column });
        }
    }

    let mut out = Vec::new();
    for row in rdr.deserialize() {
        out.push(row?);
    }
    Ok(out)
}
