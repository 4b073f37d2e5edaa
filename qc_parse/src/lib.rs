//! Readers for the small tables the Quartet DNA-seq pipeline leaves behind,
//! and for the reference tables shipped with the report.
//!
//! Every ratio metric is returned as a fraction in [0, 1]. Non-numeric cells
//! are coerced to NaN with a warning; a table missing a required column is
//! rejected as a whole.

mod errors;
mod mendelian;
mod reference;
mod summary;
mod tsv;
mod variant_calls;

pub use errors::ExtractError;
pub use mendelian::{read_mendelian_summary, renumber_families, MendelianTable};
pub use reference::{read_history, read_quartet_reference, HistoryRecord, ReferenceRow};
pub use summary::{read_information, read_sample_summary, SampleSummary, SummaryRow};
pub use tsv::TsvParser;
pub use variant_calls::{read_variant_calls, VariantCallsTable};

use serde::{Deserialize, Serialize};

/// Unit in which a table reports its ratio metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioUnit {
    Fraction,
    #[default]
    Percent,
}

impl RatioUnit {
    pub fn to_fraction(self, value: f64) -> f64 {
        match self {
            RatioUnit::Fraction => value,
            RatioUnit::Percent => value / 100.0,
        }
    }
}
