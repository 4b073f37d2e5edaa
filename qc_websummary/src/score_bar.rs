use crate::PrettyMetric;
use serde::Serialize;

/// Label on the scale underneath the score bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTick {
    pub label: String,
    /// Offset from the left edge of the bar, in percent.
    pub left_percent: f64,
}

/// The horizontal Bad/Fair/Good/Great bar with an arrow marking the queried
/// run's normalised total score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBar {
    pub score: f64,
    /// Arrow position; 0 to 200 over an arrow track drawn at half the bar width.
    pub marker_percent: f64,
    /// (grade name, color, width in percent)
    pub segments: Vec<(String, String, f64)>,
    pub ticks: Vec<ScoreTick>,
}

impl ScoreBar {
    /// A bar split into the usual 20/30/30/20 percent grade bands, ticks at the
    /// band boundaries labelled with the scaled cut points.
    pub fn new(
        score: f64,
        marker_percent: f64,
        grades: [(&str, &str); 4],
        range: [f64; 2],
        scaled_cut_points: [f64; 3],
    ) -> Self {
        let widths = [20.0, 30.0, 30.0, 20.0];
        let segments = grades
            .iter()
            .zip(widths)
            .map(|((name, color), w)| (name.to_string(), color.to_string(), w))
            .collect();
        let label = |v: f64| PrettyMetric::decimal(v).0;
        let ticks = vec![
            ScoreTick {
                label: PrettyMetric::fixed(range[0], 0).0,
                left_percent: 0.0,
            },
            ScoreTick {
                label: label(scaled_cut_points[0]),
                left_percent: widths[0] - 0.8,
            },
            ScoreTick {
                label: label(scaled_cut_points[1]),
                left_percent: widths[0] + widths[1] - 1.0,
            },
            ScoreTick {
                label: label(scaled_cut_points[2]),
                left_percent: widths[0] + widths[1] + widths[2] - 1.0,
            },
            ScoreTick {
                label: PrettyMetric::fixed(range[1], 0).0,
                left_percent: 99.0,
            },
        ];
        ScoreBar {
            score,
            marker_percent,
            segments,
            ticks,
        }
    }

    /// The score as printed over the arrow.
    pub fn score_label(&self) -> String {
        PrettyMetric::decimal(self.score).0
    }
}
