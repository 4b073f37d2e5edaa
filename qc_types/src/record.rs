use crate::{f1_score, FamilyLabel, QuartetSample, VariantType};
use serde::{Deserialize, Serialize};

/// Precision and recall of one variant type against the reference datasets.
/// Both are fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecall {
    pub precision: f64,
    pub recall: f64,
    /// Number of called variants, when the input table has it.
    pub count: Option<u64>,
}

impl PrecisionRecall {
    pub fn f1(&self) -> f64 {
        f1_score(self.precision, self.recall)
    }
}

/// One row of a `variants.calling.qc.txt` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleCalls {
    pub sample_id: String,
    pub quartet: QuartetSample,
    pub snv: PrecisionRecall,
    pub indel: PrecisionRecall,
}

impl SampleCalls {
    pub fn get(&self, variant_type: VariantType) -> &PrecisionRecall {
        match variant_type {
            VariantType::Snv => &self.snv,
            VariantType::Indel => &self.indel,
        }
    }
}

/// Mendelian concordance of one family for one variant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyConcordance {
    pub family: FamilyLabel,
    pub variant_type: VariantType,
    pub detected_variants: Option<u64>,
    pub consistent_variants: Option<u64>,
    /// Mendelian concordance rate, a fraction in [0, 1].
    pub rate: f64,
}

/// All three accuracy metrics of one sample and variant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub sample_id: String,
    pub variant_type: VariantType,
    pub precision: f64,
    pub recall: f64,
    pub mendelian_concordance: f64,
}

impl MetricRecord {
    /// Join a sample's precision/recall with the concordance rate of the family
    /// it belongs to.
    pub fn new(calls: &SampleCalls, variant_type: VariantType, mendelian_concordance: f64) -> Self {
        let pr = calls.get(variant_type);
        MetricRecord {
            sample_id: calls.sample_id.clone(),
            variant_type,
            precision: pr.precision,
            recall: pr.recall,
            mendelian_concordance,
        }
    }

    pub fn f1(&self) -> f64 {
        f1_score(self.precision, self.recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_record_from_calls() {
        let calls = SampleCalls {
            sample_id: "LCL5_1".to_string(),
            quartet: QuartetSample::D5,
            snv: PrecisionRecall {
                precision: 0.99,
                recall: 0.97,
                count: Some(3_500_000),
            },
            indel: PrecisionRecall {
                precision: 0.0,
                recall: 0.0,
                count: None,
            },
        };
        let snv = MetricRecord::new(&calls, VariantType::Snv, 0.98);
        assert_eq!(snv.sample_id, "LCL5_1");
        assert_eq!(snv.precision, 0.99);
        assert!((snv.f1() - 0.979_897_959_183_673_5).abs() < 1e-12);
        let indel = MetricRecord::new(&calls, VariantType::Indel, 0.9);
        assert!(indel.f1().is_nan());
        assert_eq!(indel.mendelian_concordance, 0.9);
    }
}
