use std::collections::HashMap;

use crate::dataset::MatchRecord;
use crate::error::{Error, Result};

/// Weekday tokens in fixed calendar order; the index is the code.
pub const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Learned categorical mappings. Built once from the full dataset and reused
/// for every later lookup so training, evaluation, and live prediction all
/// see the same codes. Values absent from a mapping are rejected, never
/// silently coded as 0.
#[derive(Debug, Clone)]
pub struct Encodings {
    opponents: HashMap<String, usize>,
}

impl Encodings {
    /// Assigns opponent codes by ascending alphabetical order of the distinct
    /// opponent names in the dataset, 0-indexed.
    pub fn learn(matches: &[MatchRecord]) -> Self {
        let mut names: Vec<&str> = matches.iter().map(|m| m.opponent.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        let opponents = names
            .into_iter()
            .enumerate()
            .map(|(code, name)| (name.to_string(), code))
            .collect();
        Self { opponents }
    }

    pub fn opponent_code(&self, name: &str) -> Result<usize> {
        self.opponents
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownValue {
                field: "opponent",
                value: name.to_string(),
            })
    }

    pub fn opponent_count(&self) -> usize {
        self.opponents.len()
    }
}

/// Fixed venue mapping: Home is 1, Away is 0. Not data-dependent.
pub fn venue_code(venue: &str) -> Result<u8> {
    match venue {
        "Home" => Ok(1),
        "Away" => Ok(0),
        other => Err(Error::UnknownValue {
            field: "venue",
            value: other.to_string(),
        }),
    }
}

/// Fixed weekday mapping Mon=0 .. Sun=6.
pub fn day_code(day: &str) -> Result<usize> {
    DAYS.iter()
        .position(|d| *d == day)
        .ok_or_else(|| Error::UnknownValue {
            field: "day",
            value: day.to_string(),
        })
}

/// Extracts the hour from an `HH:MM` kickoff time.
pub fn parse_hour(time: &str) -> Result<u32> {
    let bad = || Error::BadTime {
        raw: time.to_string(),
    };
    let (hh, mm) = time.split_once(':').ok_or_else(bad)?;
    let hour: u32 = hh.parse().map_err(|_| bad())?;
    let minute: u32 = mm.parse().map_err(|_| bad())?;
    if hour >= 24 || minute >= 60 {
        return Err(bad());
    }
    Ok(hour)
}

/// A match record extended with its categorical codes.
#[derive(Debug, Clone)]
pub struct EncodedMatch {
    pub record: MatchRecord,
    pub venue_code: u8,
    pub opp_code: usize,
    pub hour: u32,
    pub day_code: usize,
}

/// Encodes the full table. Produces a fresh table and the learned mappings;
/// the caller's records are never mutated, so the raw table stays available
/// for re-encoding or debugging.
pub fn encode_matches(matches: &[MatchRecord]) -> Result<(Vec<EncodedMatch>, Encodings)> {
    let encodings = Encodings::learn(matches);
    let mut out = Vec::with_capacity(matches.len());
    for record in matches {
        out.push(EncodedMatch {
            venue_code: venue_code(&record.venue)?,
            opp_code: encodings.opponent_code(&record.opponent)?,
            hour: parse_hour(&record.time)?,
            day_code: day_code(&record.day)?,
            record: record.clone(),
        });
    }
    Ok((out, encodings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(team: &str, opponent: &str, venue: &str, time: &str, day: &str) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(2021, 8, 14).unwrap(),
            time: time.to_string(),
            team: team.to_string(),
            opponent: opponent.to_string(),
            result: "W".to_string(),
            venue: venue.to_string(),
            day: day.to_string(),
            gf: Some(2.0),
            ga: Some(1.0),
            sh: Some(14.0),
            sot: Some(6.0),
            dist: Some(16.5),
            fk: Some(11.0),
            pk: Some(0.0),
            pkatt: Some(0.0),
        }
    }

    #[test]
    fn opponent_codes_follow_alphabetical_order() {
        let matches = vec![
            record("Arsenal", "Chelsea", "Home", "15:00", "Sat"),
            record("Arsenal", "Brentford", "Away", "20:00", "Fri"),
            record("Chelsea", "Arsenal", "Away", "15:00", "Sat"),
            record("Arsenal", "Chelsea", "Home", "12:30", "Sun"),
        ];
        let enc = Encodings::learn(&matches);
        assert_eq!(enc.opponent_count(), 3);
        assert_eq!(enc.opponent_code("Arsenal").unwrap(), 0);
        assert_eq!(enc.opponent_code("Brentford").unwrap(), 1);
        assert_eq!(enc.opponent_code("Chelsea").unwrap(), 2);
    }

    #[test]
    fn unknown_opponent_is_named_in_the_error() {
        let matches = vec![record("Arsenal", "Chelsea", "Home", "15:00", "Sat")];
        let enc = Encodings::learn(&matches);
        match enc.opponent_code("Z9 Nonexistent FC").unwrap_err() {
            Error::UnknownValue { field, value } => {
                assert_eq!(field, "opponent");
                assert_eq!(value, "Z9 Nonexistent FC");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn venue_mapping_is_fixed() {
        assert_eq!(venue_code("Home").unwrap(), 1);
        assert_eq!(venue_code("Away").unwrap(), 0);
        assert!(venue_code("Neutral").is_err());
    }

    #[test]
    fn day_codes_use_calendar_order() {
        assert_eq!(day_code("Mon").unwrap(), 0);
        assert_eq!(day_code("Sun").unwrap(), 6);
        assert!(day_code("Noday").is_err());
    }

    #[test]
    fn hour_extraction() {
        assert_eq!(parse_hour("15:30").unwrap(), 15);
        assert_eq!(parse_hour("09:05").unwrap(), 9);
        assert!(parse_hour("15.30").is_err());
        assert!(parse_hour("25:00").is_err());
        assert!(parse_hour("12:61").is_err());
        assert!(parse_hour("").is_err());
    }

    #[test]
    fn encode_rejects_malformed_time() {
        let matches = vec![record("Arsenal", "Chelsea", "Home", "afternoon", "Sat")];
        match encode_matches(&matches).unwrap_err() {
            Error::BadTime { raw } => assert_eq!(raw, "afternoon"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
