use chrono::NaiveDate;

use crate::dataset::STAT_COUNT;
use crate::error::{Error, Result};
use crate::forest::BinaryClassifier;
use crate::rolling::FormMatch;
use crate::split::{self, SplitStrategy};

/// Width of the model's feature vector: the four categorical features
/// followed by one rolling average per tracked statistic.
pub const FEATURE_COUNT: usize = 4 + STAT_COUNT;

/// The fixed feature order shared by training, evaluation, and live
/// prediction: venue code, opponent code, hour, day code, then the rolling
/// statistics in dataset order.
pub fn feature_vector(row: &FormMatch) -> Vec<f64> {
    let mut v = Vec::with_capacity(FEATURE_COUNT);
    v.push(row.enc.venue_code as f64);
    v.push(row.enc.opp_code as f64);
    v.push(row.enc.hour as f64);
    v.push(row.enc.day_code as f64);
    v.extend_from_slice(&row.form);
    v
}

/// One evaluated fixture: what happened against what the model said.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub result: String,
    pub actual: u8,
    pub predicted: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Outcome of fitting one split strategy and scoring it on the held-out
/// rows.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub strategy: SplitStrategy,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_period: Period,
    pub test_period: Period,
    pub precision: f64,
    pub accuracy: f64,
    pub results: Vec<ResultRow>,
}

/// Fraction of predicted wins that actually were wins. Defined as 0 when the
/// model predicted no wins at all; that is a score, not a failure.
pub fn precision(results: &[ResultRow]) -> f64 {
    let predicted_positive = results.iter().filter(|r| r.predicted == 1).count();
    if predicted_positive == 0 {
        return 0.0;
    }
    let true_positive = results
        .iter()
        .filter(|r| r.predicted == 1 && r.actual == 1)
        .count();
    true_positive as f64 / predicted_positive as f64
}

pub fn accuracy(results: &[ResultRow]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let correct = results.iter().filter(|r| r.predicted == r.actual).count();
    correct as f64 / results.len() as f64
}

/// Sorts the form table chronologically, splits it with `strategy`, fits the
/// classifier on the training partition, and scores it on the evaluation
/// partition. An empty partition on either side is an
/// [`Error::InsufficientData`] for this attempt; the caller may still try
/// another strategy.
pub fn fit_and_evaluate(
    rows: &[FormMatch],
    strategy: SplitStrategy,
    model: &mut dyn BinaryClassifier,
) -> Result<Evaluation> {
    let mut rows = rows.to_vec();
    split::sort_by_date(&mut rows);

    let at = split::split_index(&rows, strategy);
    let (train, test) = rows.split_at(at);
    if train.is_empty() {
        return Err(Error::InsufficientData {
            partition: "training",
        });
    }
    if test.is_empty() {
        return Err(Error::InsufficientData {
            partition: "evaluation",
        });
    }

    let train_x: Vec<Vec<f64>> = train.iter().map(feature_vector).collect();
    let train_y: Vec<u8> = train.iter().map(|r| u8::from(r.enc.record.is_win())).collect();
    model.fit(&train_x, &train_y);

    let test_x: Vec<Vec<f64>> = test.iter().map(feature_vector).collect();
    let predictions = model.predict(&test_x)?;

    let results: Vec<ResultRow> = test
        .iter()
        .zip(&predictions)
        .map(|(row, &predicted)| ResultRow {
            date: row.enc.record.date,
            team: row.enc.record.team.clone(),
            opponent: row.enc.record.opponent.clone(),
            result: row.enc.record.result.clone(),
            actual: u8::from(row.enc.record.is_win()),
            predicted,
        })
        .collect();

    Ok(Evaluation {
        strategy,
        train_rows: train.len(),
        test_rows: test.len(),
        train_period: period(train),
        test_period: period(test),
        precision: precision(&results),
        accuracy: accuracy(&results),
        results,
    })
}

fn period(rows: &[FormMatch]) -> Period {
    // Callers only build a Period from a non-empty, date-sorted partition.
    Period {
        start: rows.first().map(|r| r.enc.record.date).unwrap_or_default(),
        end: rows.last().map(|r| r.enc.record.date).unwrap_or_default(),
    }
}

/// Evaluates each strategy in order with a fresh classifier and keeps the one
/// with the highest precision; ties keep the earlier strategy. A strategy
/// failing with [`Error::InsufficientData`] drops out of the comparison
/// without sinking the others; every strategy failing is fatal.
pub fn select_strategy<M, F>(
    rows: &[FormMatch],
    strategies: &[SplitStrategy],
    mut make_model: F,
) -> Result<(M, Evaluation)>
where
    M: BinaryClassifier,
    F: FnMut() -> M,
{
    let mut best: Option<(M, Evaluation)> = None;
    let mut last_insufficient = None;

    for &strategy in strategies {
        let mut model = make_model();
        match fit_and_evaluate(rows, strategy, &mut model) {
            Ok(eval) => {
                let better = best
                    .as_ref()
                    .is_none_or(|(_, current)| eval.precision > current.precision);
                if better {
                    best = Some((model, eval));
                }
            }
            Err(err @ Error::InsufficientData { .. }) => last_insufficient = Some(err),
            Err(err) => return Err(err),
        }
    }

    best.ok_or_else(|| {
        last_insufficient.unwrap_or(Error::InsufficientData {
            partition: "training",
        })
    })
}

/// Post-hoc summary of an evaluation's result rows, the numbers a caller
/// reports alongside precision.
#[derive(Debug, Clone, Copy)]
pub struct Analysis {
    pub total_matches: usize,
    pub correct_predictions: usize,
    pub accuracy: f64,
    pub win_rate: f64,
    pub predicted_win_rate: f64,
}

pub fn analyze(results: &[ResultRow]) -> Analysis {
    let total = results.len();
    let correct = results.iter().filter(|r| r.predicted == r.actual).count();
    let wins = results.iter().filter(|r| r.actual == 1).count();
    let predicted_wins = results.iter().filter(|r| r.predicted == 1).count();
    let n = total.max(1) as f64;
    Analysis {
        total_matches: total,
        correct_predictions: correct,
        accuracy: correct as f64 / n,
        win_rate: wins as f64 / n,
        predicted_win_rate: predicted_wins as f64 / n,
    }
}
