use chrono::NaiveDate;

use matchcast::dataset::MatchRecord;
use matchcast::encode;
use matchcast::error::Error;
use matchcast::predict::{Category, FixtureRequest, MatchPredictor};
use matchcast::split::SplitStrategy;

fn record(
    date: NaiveDate,
    team: &str,
    opponent: &str,
    result: &str,
    venue: &str,
    gf: f64,
    ga: f64,
) -> MatchRecord {
    MatchRecord {
        date,
        time: "15:00".to_string(),
        team: team.to_string(),
        opponent: opponent.to_string(),
        result: result.to_string(),
        venue: venue.to_string(),
        day: "Sat".to_string(),
        gf: Some(gf),
        ga: Some(ga),
        sh: Some(8.0 + gf * 3.0),
        sot: Some(2.0 + gf),
        dist: Some(17.0),
        fk: Some(10.0),
        pk: Some(0.0),
        pkatt: Some(0.0),
    }
}

/// Ten A-beats-B games, each seen from both perspectives.
fn dominant_dataset() -> Vec<MatchRecord> {
    let mut matches = Vec::new();
    for week in 0..10u64 {
        let date = NaiveDate::from_ymd_opt(2021, 9, 4).unwrap() + chrono::Days::new(week * 7);
        matches.push(record(date, "A", "B", "W", "Home", 3.0, 0.0));
        matches.push(record(date, "B", "A", "L", "Away", 0.0, 3.0));
    }
    matches
}

#[test]
fn dominant_team_gets_a_favorable_probability() {
    let matches = dominant_dataset();
    let predictor =
        MatchPredictor::train_with(&matches, 3, &[SplitStrategy::Ratio(0.8)]).unwrap();

    let prediction = predictor
        .predict(&FixtureRequest {
            team: "A".to_string(),
            opponent: "B".to_string(),
            venue: "home".to_string(),
            time: "15:00".to_string(),
            day: "Sat".to_string(),
        })
        .unwrap();

    assert!(prediction.probability >= 50.0);
    assert!((0.0..=100.0).contains(&prediction.probability));
}

#[test]
fn unknown_opponent_is_rejected_by_name() {
    let matches = dominant_dataset();
    let predictor = MatchPredictor::train(&matches).unwrap();

    let err = predictor
        .predict(&FixtureRequest {
            team: "A".to_string(),
            opponent: "Z9 Nonexistent FC".to_string(),
            venue: "home".to_string(),
            time: "15:00".to_string(),
            day: "Sat".to_string(),
        })
        .unwrap_err();

    match err {
        Error::UnknownValue { field, value } => {
            assert_eq!(field, "opponent");
            assert_eq!(value, "Z9 Nonexistent FC");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_team_and_bad_time_are_rejected() {
    let matches = dominant_dataset();
    let predictor = MatchPredictor::train(&matches).unwrap();

    let err = predictor
        .predict(&FixtureRequest {
            team: "Nowhere United".to_string(),
            opponent: "B".to_string(),
            venue: "home".to_string(),
            time: "15:00".to_string(),
            day: "Sat".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::UnknownValue { field: "team", .. }));

    let err = predictor
        .predict(&FixtureRequest {
            team: "A".to_string(),
            opponent: "B".to_string(),
            venue: "home".to_string(),
            time: "quarter past three".to_string(),
            day: "Sat".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::BadTime { .. }));
}

#[test]
fn known_fixture_encodes_as_expected() {
    // venue "Home" is always 1 and a 15:30 kickoff is hour 15, regardless of
    // the dataset contents.
    assert_eq!(encode::venue_code("Home").unwrap(), 1);
    assert_eq!(encode::parse_hour("15:30").unwrap(), 15);
    assert_eq!(encode::day_code("Sat").unwrap(), 5);
}

#[test]
fn selection_survives_one_degenerate_strategy() {
    let matches = dominant_dataset();
    // The cutoff predates every match, so that strategy has an empty
    // training partition; the ratio strategy must still carry the day.
    let strategies = [
        SplitStrategy::DateCutoff(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        SplitStrategy::Ratio(0.8),
    ];
    let predictor = MatchPredictor::train_with(&matches, 3, &strategies).unwrap();
    assert_eq!(predictor.evaluation().strategy.label(), "ratio");
}

#[test]
fn all_degenerate_strategies_fail_with_insufficient_data() {
    let matches = dominant_dataset();
    let strategies = [SplitStrategy::DateCutoff(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    )];
    let err = MatchPredictor::train_with(&matches, 3, &strategies).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { .. }));
}

#[test]
fn categories_follow_the_probability_bands() {
    assert_eq!(Category::from_probability(0.61), Category::High);
    assert_eq!(Category::from_probability(0.5), Category::Medium);
    assert_eq!(Category::from_probability(0.1), Category::Low);
}
