use qc_stats::{mean, min_max, quantiles, std_dev};
use qc_types::Grade;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a query among the historical values, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub position: usize,
    pub out_of: usize,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.out_of)
    }
}

/// The values separating the four grades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoints {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl CutPoints {
    /// Bad below `q1`, Fair below `q2`, Good below `q3`, Great otherwise.
    /// `None` for a NaN query.
    pub fn grade(&self, query: f64) -> Option<Grade> {
        if query.is_nan() {
            None
        } else if query < self.q1 {
            Some(Grade::Bad)
        } else if query < self.q2 {
            Some(Grade::Fair)
        } else if query < self.q3 {
            Some(Grade::Good)
        } else {
            Some(Grade::Great)
        }
    }
}

/// Linear map of the historical range onto a fixed score interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
    pub low: f64,
    pub high: f64,
}

impl ScoreScale {
    /// Scale `value` and clamp it to `[low, high]`. When the historical range is
    /// empty every value maps to the midpoint. NaN stays NaN.
    pub fn rescale(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let span = self.max - self.min;
        if span.is_nan() || span <= 0.0 {
            return (self.low + self.high) / 2.0;
        }
        (self.low + (self.high - self.low) * (value - self.min) / span).clamp(self.low, self.high)
    }
}

/// Settings of [`HistoricalDistribution::assess`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Quantiles of the history that separate Bad/Fair, Fair/Good and Good/Great.
    pub grade_quantiles: [f64; 3],
    /// Interval of the normalised score.
    pub score_range: [f64; 2],
}

impl Default for RankerConfig {
    fn default() -> Self {
        RankerConfig {
            grade_quantiles: [0.2, 0.5, 0.8],
            score_range: [1.0, 10.0],
        }
    }
}

/// Immutable set of previously observed values of one metric, excluding the
/// query being assessed. NaN values are dropped on construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoricalDistribution {
    values: Vec<f64>,
}

impl FromIterator<f64> for HistoricalDistribution {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        HistoricalDistribution {
            values: iter.into_iter().filter(|v| !v.is_nan()).collect(),
        }
    }
}

impl HistoricalDistribution {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `1 + |{h > query}|` out of `len + 1`. Ties share the better position.
    /// A NaN query ranks last.
    pub fn rank(&self, query: f64) -> Rank {
        let out_of = self.values.len() + 1;
        let position = if query.is_nan() {
            out_of
        } else {
            1 + self.values.iter().filter(|&&h| h > query).count()
        };
        Rank { position, out_of }
    }

    /// Grade boundaries at the given quantiles, `None` for an empty history.
    pub fn cut_points(&self, at: [f64; 3]) -> Option<CutPoints> {
        let q = quantiles(&self.values, &at)?;
        Some(CutPoints {
            q1: q[0],
            q2: q[1],
            q3: q[2],
        })
    }

    pub fn scale(&self, range: [f64; 2]) -> ScoreScale {
        let (min, max) = min_max(&self.values).unwrap_or((f64::NAN, f64::NAN));
        ScoreScale {
            min,
            max,
            low: range[0],
            high: range[1],
        }
    }

    /// Mean and sample standard deviation of the history together with `query`.
    pub fn summary_with(&self, query: f64) -> (f64, f64) {
        let mut all = self.values.clone();
        all.push(query);
        (mean(&all), std_dev(&all, 1))
    }

    /// Everything the report shows about `query` relative to this history.
    pub fn assess(&self, query: f64, config: &RankerConfig) -> Assessment {
        let rank = self.rank(query);
        let cut_points = self.cut_points(config.grade_quantiles);
        let scale = self.scale(config.score_range);
        let (historical_mean, historical_sd) = self.summary_with(query);
        Assessment {
            value: query,
            rank,
            grade: cut_points.and_then(|c| c.grade(query)),
            score: scale.rescale(query),
            scaled_cut_points: cut_points.map(|c| CutPoints {
                q1: scale.rescale(c.q1),
                q2: scale.rescale(c.q2),
                q3: scale.rescale(c.q3),
            }),
            cut_points,
            scale,
            historical_mean,
            historical_sd,
        }
    }
}

/// A query value placed within its historical distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub value: f64,
    pub rank: Rank,
    pub grade: Option<Grade>,
    /// Normalised score, clamped to the score range.
    pub score: f64,
    pub cut_points: Option<CutPoints>,
    /// Cut points mapped onto the score range.
    pub scaled_cut_points: Option<CutPoints>,
    pub scale: ScoreScale,
    pub historical_mean: f64,
    pub historical_sd: f64,
}

impl Assessment {
    /// Horizontal position of the marker on the score bar, in percent. The bar
    /// is drawn at half width, so positions run from 0 to 200.
    pub fn marker_percent(&self) -> f64 {
        if self.score <= self.scale.low {
            return 0.0;
        }
        if self.score >= self.scale.high {
            return 200.0;
        }
        let n = self.rank.out_of as f64;
        ((n - self.rank.position as f64) * 2.0 / n + 1.0 / n) * 100.0
    }
}
