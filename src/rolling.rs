use std::collections::BTreeMap;

use crate::dataset::STAT_COUNT;
use crate::encode::EncodedMatch;

/// Default trailing-window size for the form averages.
pub const DEFAULT_WINDOW: usize = 3;

/// An encoded match extended with trailing-window means of each tracked
/// statistic over the team's preceding matches, current one included.
#[derive(Debug, Clone)]
pub struct FormMatch {
    pub enc: EncodedMatch,
    pub form: [f64; STAT_COUNT],
}

/// Builds the form table: rows grouped by team, each group ordered by date
/// ascending (original position breaks ties), each statistic averaged over
/// the trailing `window` rows of that team only. A team's first matches use
/// however many rows exist, so sparse history never fails; a window with no
/// recorded value for a statistic falls back to 0.0, the one documented
/// substitute for genuinely missing data.
///
/// The output has the same row count as the input, ordered by (team, date).
pub fn build_form_table(encoded: &[EncodedMatch], window: usize) -> Vec<FormMatch> {
    let window = window.max(1);

    let mut teams: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, m) in encoded.iter().enumerate() {
        teams.entry(m.record.team.as_str()).or_default().push(idx);
    }

    let mut out = Vec::with_capacity(encoded.len());
    for rows in teams.values() {
        let mut rows = rows.clone();
        rows.sort_by_key(|&i| (encoded[i].record.date, i));

        for (pos, &i) in rows.iter().enumerate() {
            let start = pos + 1 - window.min(pos + 1);
            let mut form = [0.0; STAT_COUNT];
            for (stat, slot) in form.iter_mut().enumerate() {
                let mut sum = 0.0;
                let mut count = 0usize;
                for &j in &rows[start..=pos] {
                    if let Some(v) = encoded[j].record.stats()[stat] {
                        sum += v;
                        count += 1;
                    }
                }
                if count > 0 {
                    *slot = sum / count as f64;
                }
            }
            out.push(FormMatch {
                enc: encoded[i].clone(),
                form,
            });
        }
    }
    out
}
