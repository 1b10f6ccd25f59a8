use std::fs;
use std::path::PathBuf;

use matchcast::dataset;
use matchcast::predict::{FixtureRequest, MatchPredictor};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let data_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("matches.csv"));
    let case_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/fixture_case.json"));

    let matches = dataset::load_matches(&data_path)?;
    let predictor = MatchPredictor::train(&matches)?;

    let raw = fs::read_to_string(&case_path)?;
    let request: FixtureRequest = serde_json::from_str(&raw)?;

    // This binary is intentionally simple: one fixture descriptor in, the
    // model's answer out. No serving layer, meant for quick manual iteration
    // on the feature pipeline.
    match predictor.predict(&request) {
        Ok(prediction) => {
            println!("{} vs {}", request.team, request.opponent);
            println!("Win probability: {:.1}%", prediction.probability);
            println!("{}", prediction.message);
        }
        Err(err) => println!("Prediction failed: {err}"),
    }

    Ok(())
}
