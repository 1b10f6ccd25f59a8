use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::{MatchRecord, STAT_COUNT};
use crate::encode::{self, Encodings};
use crate::error::{Error, Result};
use crate::forest::{BinaryClassifier, RandomForest};
use crate::rolling::{self, DEFAULT_WINDOW, FormMatch};
use crate::split::SplitStrategy;
use crate::train::{self, Evaluation};

/// How many of a team's latest matches feed the live form averages.
pub const RECENT_MATCHES: usize = 3;

/// The two split strategies tried at startup, in evaluation order.
pub fn default_strategies() -> [SplitStrategy; 2] {
    [
        SplitStrategy::DateCutoff(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()),
        SplitStrategy::Ratio(0.8),
    ]
}

/// A prospective fixture as the serving layer hands it over.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRequest {
    pub team: String,
    pub opponent: String,
    /// "home" or "away".
    pub venue: String,
    /// Kickoff time, HH:MM.
    pub time: String,
    /// Three-letter weekday, Mon..Sun.
    pub day: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    High,
    Medium,
    Low,
}

impl Category {
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.6 {
            Category::High
        } else if p >= 0.4 {
            Category::Medium
        } else {
            Category::Low
        }
    }

    pub fn message(self, team: &str) -> String {
        match self {
            Category::High => format!("Strong chance of {team} winning"),
            Category::Medium => "Match could go either way".to_string(),
            Category::Low => format!("Lower chance of {team} winning"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Win probability in percent, rounded to one decimal.
    pub probability: f64,
    pub category: Category,
    pub message: String,
}

/// The prediction context built once at startup: learned encodings, the
/// cached form table, and the fitted model of whichever split strategy
/// evaluated better. Nothing here mutates after construction, so the context
/// can be shared by reference across concurrent readers.
pub struct MatchPredictor {
    encodings: Encodings,
    form: Vec<FormMatch>,
    model: Box<dyn BinaryClassifier>,
    evaluation: Evaluation,
}

impl std::fmt::Debug for MatchPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchPredictor").finish_non_exhaustive()
    }
}

impl MatchPredictor {
    /// Trains with the default window, the default strategies, and the
    /// default forest.
    pub fn train(matches: &[MatchRecord]) -> Result<Self> {
        Self::train_with(matches, DEFAULT_WINDOW, &default_strategies())
    }

    pub fn train_with(
        matches: &[MatchRecord],
        window: usize,
        strategies: &[SplitStrategy],
    ) -> Result<Self> {
        Self::train_with_classifier(matches, window, strategies, RandomForest::default_model)
    }

    /// Full-control constructor: the classifier is injected, so anything
    /// satisfying [`BinaryClassifier`] can replace the forest.
    pub fn train_with_classifier<M, F>(
        matches: &[MatchRecord],
        window: usize,
        strategies: &[SplitStrategy],
        make_model: F,
    ) -> Result<Self>
    where
        M: BinaryClassifier + 'static,
        F: FnMut() -> M,
    {
        let (encoded, encodings) = encode::encode_matches(matches)?;
        let form = rolling::build_form_table(&encoded, window);
        let (model, evaluation) = train::select_strategy(&form, strategies, make_model)?;
        Ok(Self {
            encodings,
            form,
            model: Box::new(model),
            evaluation,
        })
    }

    /// The evaluation of the strategy that won the selection.
    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn encodings(&self) -> &Encodings {
        &self.encodings
    }

    /// Predicts the win probability for one prospective fixture. Every
    /// lookup failure names the offending field so the serving layer can
    /// report it verbatim.
    pub fn predict(&self, request: &FixtureRequest) -> Result<Prediction> {
        let venue_code = match request.venue.to_ascii_lowercase().as_str() {
            "home" => 1u8,
            "away" => 0u8,
            _ => {
                return Err(Error::UnknownValue {
                    field: "venue",
                    value: request.venue.clone(),
                });
            }
        };
        let opp_code = self.encodings.opponent_code(&request.opponent)?;
        let day_code = encode::day_code(&request.day)?;
        let hour = encode::parse_hour(&request.time)?;
        let form = self.recent_form(&request.team)?;

        let mut features = Vec::with_capacity(train::FEATURE_COUNT);
        features.push(venue_code as f64);
        features.push(opp_code as f64);
        features.push(hour as f64);
        features.push(day_code as f64);
        features.extend_from_slice(&form);

        let p = self.model.predict_proba(&features)?;
        let category = Category::from_probability(p);
        Ok(Prediction {
            probability: (p * 1000.0).round() / 10.0,
            category,
            message: category.message(&request.team),
        })
    }

    /// Averages the raw tracked statistics over the team's most recent
    /// matches. A team with no history at all is unknown; a statistic with
    /// no recorded values averages to the documented 0.0 fallback.
    fn recent_form(&self, team: &str) -> Result<[f64; STAT_COUNT]> {
        let mut rows: Vec<&FormMatch> = self
            .form
            .iter()
            .filter(|r| r.enc.record.team == team)
            .collect();
        if rows.is_empty() {
            return Err(Error::UnknownValue {
                field: "team",
                value: team.to_string(),
            });
        }
        rows.sort_by(|a, b| b.enc.record.date.cmp(&a.enc.record.date));
        rows.truncate(RECENT_MATCHES);

        let mut out = [0.0; STAT_COUNT];
        for (stat, slot) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for row in &rows {
                if let Some(v) = row.enc.record.stats()[stat] {
                    sum += v;
                    count += 1;
                }
            }
            if count > 0 {
                *slot = sum / count as f64;
            }
        }
        Ok(out)
    }
}
