use std::path::PathBuf;

use anyhow::{Context, Result};

use matchcast::dataset;
use matchcast::predict::{FixtureRequest, MatchPredictor};
use matchcast::train;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("matches.csv"));

    let matches = dataset::load_matches(&path)
        .with_context(|| format!("load match data from {}", path.display()))?;
    println!("Loaded {} matches from {}", matches.len(), path.display());

    let predictor = MatchPredictor::train(&matches).context("train win model")?;

    let eval = predictor.evaluation();
    println!("\nSelected split: {}", eval.strategy.label());
    println!(
        "Training period: {} to {} ({} matches)",
        eval.train_period.start, eval.train_period.end, eval.train_rows
    );
    println!(
        "Testing period: {} to {} ({} matches)",
        eval.test_period.start, eval.test_period.end, eval.test_rows
    );
    println!("Precision: {:.3}", eval.precision);
    println!("Accuracy: {:.3}", eval.accuracy);

    let summary = train::analyze(&eval.results);
    println!(
        "Correct predictions: {} / {}",
        summary.correct_predictions, summary.total_matches
    );
    println!(
        "Win rate: {:.3} actual, {:.3} predicted",
        summary.win_rate, summary.predicted_win_rate
    );

    // Optional one-shot fixture prediction from the remaining arguments.
    let rest: Vec<String> = args.collect();
    if rest.len() == 5 {
        let request = FixtureRequest {
            team: rest[0].clone(),
            opponent: rest[1].clone(),
            venue: rest[2].clone(),
            time: rest[3].clone(),
            day: rest[4].clone(),
        };
        let prediction = predictor
            .predict(&request)
            .with_context(|| format!("predict {} vs {}", request.team, request.opponent))?;
        println!(
            "\n{} vs {} ({}, {} {})",
            request.team, request.opponent, request.venue, request.day, request.time
        );
        println!("Win probability: {:.1}%", prediction.probability);
        println!("{}", prediction.message);
    } else if !rest.is_empty() {
        eprintln!("Expected five fixture arguments: TEAM OPPONENT home|away HH:MM DAY");
    }

    Ok(())
}
