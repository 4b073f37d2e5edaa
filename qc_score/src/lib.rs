//! Benchmark scoring of Quartet DNA-seq runs.
//!
//! A batch's SNV and INDEL metrics are combined into a single total score with a
//! weighted harmonic mean, and any metric can be placed within the distribution
//! of historical batches to obtain a rank, a grade and a score between 1 and 10.

mod composite;
mod ranker;

pub use composite::{combine, BatchScore, QualityMetric, DEFAULT_BETA_SQUARED};
pub use ranker::{Assessment, CutPoints, HistoricalDistribution, Rank, RankerConfig, ScoreScale};
