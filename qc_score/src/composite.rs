use qc_stats::mean;
use qc_types::{FamilyConcordance, SampleCalls, VariantType};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Weight applied to the first argument of [`combine`] as β².
pub const DEFAULT_BETA_SQUARED: f64 = 0.5;

/// Weighted harmonic combination of two ratios:
/// `(1 + β²)·a·b / (β²·a + b)`.
///
/// With β² < 1 the result leans towards `b`. NaN when the denominator is zero;
/// NaN inputs propagate.
pub fn combine(a: f64, b: f64, beta_squared: f64) -> f64 {
    let denom = beta_squared * a + b;
    if denom == 0.0 {
        return f64::NAN;
    }
    (1.0 + beta_squared) * a * b / denom
}

/// The seven metrics reported in the evaluation table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityMetric {
    #[strum(to_string = "Precision (SNV)")]
    PrecisionSnv,
    #[strum(to_string = "Precision (INDEL)")]
    PrecisionIndel,
    #[strum(to_string = "Recall (SNV)")]
    RecallSnv,
    #[strum(to_string = "Recall (INDEL)")]
    RecallIndel,
    #[strum(to_string = "Mendelian Concordance Rate (SNV)")]
    MendelianSnv,
    #[strum(to_string = "Mendelian Concordance Rate (INDEL)")]
    MendelianIndel,
    #[strum(to_string = "Total Score")]
    Total,
}

impl QualityMetric {
    /// Column name used in the data files.
    pub fn key(self) -> &'static str {
        match self {
            QualityMetric::PrecisionSnv => "precision_snv",
            QualityMetric::PrecisionIndel => "precision_indel",
            QualityMetric::RecallSnv => "recall_snv",
            QualityMetric::RecallIndel => "recall_indel",
            QualityMetric::MendelianSnv => "mendelian_snv",
            QualityMetric::MendelianIndel => "mendelian_indel",
            QualityMetric::Total => "total",
        }
    }
}

/// Mean accuracy metrics of one batch, i.e. one or more sets of Quartet samples
/// sequenced together. The total score is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScore {
    pub batch_id: String,
    pub precision_snv: f64,
    pub precision_indel: f64,
    pub recall_snv: f64,
    pub recall_indel: f64,
    pub mendelian_snv: f64,
    pub mendelian_indel: f64,
}

impl BatchScore {
    /// Average precision and recall over every sample of the batch and
    /// Mendelian concordance over every family.
    pub fn from_observations(
        batch_id: impl Into<String>,
        calls: &[SampleCalls],
        families: &[FamilyConcordance],
    ) -> BatchScore {
        let pr_mean = |vt: VariantType, precision: bool| {
            let xs: Vec<f64> = calls
                .iter()
                .map(|c| {
                    let pr = c.get(vt);
                    if precision {
                        pr.precision
                    } else {
                        pr.recall
                    }
                })
                .collect();
            mean(&xs)
        };
        let mcr_mean = |vt: VariantType| {
            let xs: Vec<f64> = families
                .iter()
                .filter(|f| f.variant_type == vt)
                .map(|f| f.rate)
                .collect();
            mean(&xs)
        };
        BatchScore {
            batch_id: batch_id.into(),
            precision_snv: pr_mean(VariantType::Snv, true),
            precision_indel: pr_mean(VariantType::Indel, true),
            recall_snv: pr_mean(VariantType::Snv, false),
            recall_indel: pr_mean(VariantType::Indel, false),
            mendelian_snv: mcr_mean(VariantType::Snv),
            mendelian_indel: mcr_mean(VariantType::Indel),
        }
    }

    pub fn precision_beta(&self, beta_squared: f64) -> f64 {
        combine(self.precision_snv, self.precision_indel, beta_squared)
    }

    pub fn recall_beta(&self, beta_squared: f64) -> f64 {
        combine(self.recall_snv, self.recall_indel, beta_squared)
    }

    pub fn mendelian_beta(&self, beta_squared: f64) -> f64 {
        combine(self.mendelian_snv, self.mendelian_indel, beta_squared)
    }

    /// Mean of the three combined sub-scores.
    pub fn total(&self, beta_squared: f64) -> f64 {
        mean(&[
            self.precision_beta(beta_squared),
            self.recall_beta(beta_squared),
            self.mendelian_beta(beta_squared),
        ])
    }

    pub fn metric(&self, metric: QualityMetric, beta_squared: f64) -> f64 {
        match metric {
            QualityMetric::PrecisionSnv => self.precision_snv,
            QualityMetric::PrecisionIndel => self.precision_indel,
            QualityMetric::RecallSnv => self.recall_snv,
            QualityMetric::RecallIndel => self.recall_indel,
            QualityMetric::MendelianSnv => self.mendelian_snv,
            QualityMetric::MendelianIndel => self.mendelian_indel,
            QualityMetric::Total => self.total(beta_squared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use qc_types::{FamilyLabel, PrecisionRecall, QuartetSample};
    use strum::IntoEnumIterator;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_combine() {
        assert!(close(combine(0.9, 0.8, 0.5), 0.864));
        assert!(close(combine(0.7, 0.7, 0.5), 0.7));
        assert_eq!(combine(1.0, 1.0, DEFAULT_BETA_SQUARED), 1.0);
        assert_eq!(combine(0.0, 0.5, 0.5), 0.0);
        assert!(combine(0.0, 0.0, 0.5).is_nan());
        assert!(combine(f64::NAN, 0.5, 0.5).is_nan());
    }

    #[test]
    fn test_metric_names() {
        let names: Vec<String> = QualityMetric::iter().map(|m| m.to_string()).collect();
        assert_eq!(names[0], "Precision (SNV)");
        assert_eq!(names[5], "Mendelian Concordance Rate (INDEL)");
        assert_eq!(names[6], "Total Score");
        assert_eq!(QualityMetric::RecallIndel.key(), "recall_indel");
    }

    fn calls(q: QuartetSample, snv: (f64, f64), indel: (f64, f64)) -> SampleCalls {
        SampleCalls {
            sample_id: format!("{q}_1"),
            quartet: q,
            snv: PrecisionRecall {
                precision: snv.0,
                recall: snv.1,
                count: None,
            },
            indel: PrecisionRecall {
                precision: indel.0,
                recall: indel.1,
                count: None,
            },
        }
    }

    fn family(n: usize, variant_type: VariantType, rate: f64) -> FamilyConcordance {
        FamilyConcordance {
            family: FamilyLabel(n),
            variant_type,
            detected_variants: None,
            consistent_variants: None,
            rate,
        }
    }

    #[test]
    fn test_batch_score() {
        let samples = vec![
            calls(QuartetSample::D5, (0.99, 0.97), (0.90, 0.80)),
            calls(QuartetSample::D6, (0.97, 0.95), (0.90, 0.84)),
            calls(QuartetSample::F7, (0.99, 0.97), (0.94, 0.82)),
            calls(QuartetSample::M8, (0.97, 0.95), (0.94, 0.82)),
        ];
        let families = vec![
            family(1, VariantType::Snv, 0.98),
            family(1, VariantType::Indel, 0.90),
            family(2, VariantType::Snv, 0.96),
            family(2, VariantType::Indel, 0.92),
        ];
        let batch = BatchScore::from_observations("Queried_Data", &samples, &families);
        assert!(close(batch.precision_snv, 0.98));
        assert!(close(batch.precision_indel, 0.92));
        assert!(close(batch.recall_snv, 0.96));
        assert!(close(batch.recall_indel, 0.82));
        assert!(close(batch.mendelian_snv, 0.97));
        assert!(close(batch.mendelian_indel, 0.91));

        let expected = (combine(0.98, 0.92, 0.5)
            + combine(0.96, 0.82, 0.5)
            + combine(0.97, 0.91, 0.5))
            / 3.0;
        assert!((batch.total(0.5) - expected).abs() < 1e-12);
        assert_eq!(batch.metric(QualityMetric::Total, 0.5), batch.total(0.5));
        assert_eq!(batch.metric(QualityMetric::RecallIndel, 0.5), batch.recall_indel);
    }

    #[test]
    fn test_degenerate_batch_total_is_nan() {
        let samples = vec![calls(QuartetSample::D5, (0.0, 0.9), (0.0, 0.9))];
        let families = vec![
            family(1, VariantType::Snv, 0.9),
            family(1, VariantType::Indel, 0.9),
        ];
        let batch = BatchScore::from_observations("b", &samples, &families);
        assert!(batch.precision_beta(0.5).is_nan());
        assert!(batch.total(0.5).is_nan());

        // no Mendelian summary at all
        let batch = BatchScore::from_observations("b", &samples, &[]);
        assert!(batch.mendelian_snv.is_nan());
    }

    proptest! {
        #[test]
        fn prop_combine_is_bounded(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            prop_assume!(a + b > 0.0);
            let c = combine(a, b, DEFAULT_BETA_SQUARED);
            prop_assert!(c >= a.min(b) - 1e-12);
            prop_assert!(c <= a.max(b) + 1e-12);
        }

        #[test]
        fn prop_combine_identical(a in 1e-9f64..=1.0) {
            prop_assert!((combine(a, a, DEFAULT_BETA_SQUARED) - a).abs() < 1e-12);
        }
    }
}
