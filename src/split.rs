use chrono::NaiveDate;

use crate::rolling::FormMatch;

/// How the chronological table is partitioned into train and evaluation
/// sets. Both strategies keep training rows strictly earlier in the sorted
/// order than evaluation rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitStrategy {
    /// Training takes rows dated strictly before the cutoff, evaluation the
    /// rows on or after it.
    DateCutoff(NaiveDate),
    /// Training takes the first `floor(N * ratio)` rows by sorted position,
    /// evaluation the remainder.
    Ratio(f64),
}

impl SplitStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            SplitStrategy::DateCutoff(_) => "date-cutoff",
            SplitStrategy::Ratio(_) => "ratio",
        }
    }
}

/// Sorts the form table by date ascending. The sort is stable, so rows
/// sharing a date keep their (team, date) order from the builder.
pub fn sort_by_date(rows: &mut [FormMatch]) {
    rows.sort_by_key(|r| r.enc.record.date);
}

/// Index of the first evaluation row. `rows` must already be sorted by date
/// ascending.
pub fn split_index(rows: &[FormMatch], strategy: SplitStrategy) -> usize {
    match strategy {
        SplitStrategy::DateCutoff(cutoff) => rows.partition_point(|r| r.enc.record.date < cutoff),
        SplitStrategy::Ratio(ratio) => (rows.len() as f64 * ratio.clamp(0.0, 1.0)) as usize,
    }
}
