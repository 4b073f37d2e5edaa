//! Shared types for the Quartet DNA-seq QC report.
//!
//! The Quartet reference material is a family of four: monozygotic twin daughters
//! D5 and D6, father F7 and mother M8. Variant calls on these samples are
//! benchmarked against reference datasets (precision and recall) and against the
//! family-dependent built-in genetic truth (Mendelian concordance).

mod labels;
mod record;

pub use labels::{FamilyLabel, Grade, QuartetSample, VariantType};
pub use record::{FamilyConcordance, MetricRecord, PrecisionRecall, SampleCalls};

/// F1-score of a precision/recall pair. NaN when both are zero.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    let denom = precision + recall;
    if denom == 0.0 {
        return f64::NAN;
    }
    2.0 * precision * recall / denom
}
