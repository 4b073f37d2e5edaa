use crate::{ExtractError, RatioUnit, TsvParser};
use log::warn;
use qc_types::{PrecisionRecall, QuartetSample, SampleCalls};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

const FILETYPE: &str = "variant calling QC";

const SAMPLE: &str = "Sample";
const SNV_NUMBER: &str = "SNV number";
const SNV_PRECISION: &str = "SNV precision";
const SNV_RECALL: &str = "SNV recall";
const INDEL_NUMBER: &str = "INDEL number";
const INDEL_PRECISION: &str = "INDEL precision";
const INDEL_RECALL: &str = "INDEL recall";

/// Precision and recall of every sample in one `variants.calling.qc.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCallsTable {
    pub path: PathBuf,
    /// Rows in input order. Replicates of the same Quartet member are kept.
    pub rows: Vec<SampleCalls>,
}

impl VariantCallsTable {
    /// Quartet members without any row in the table.
    pub fn missing_samples(&self) -> Vec<QuartetSample> {
        QuartetSample::iter()
            .filter(|s| !self.rows.iter().any(|r| r.quartet == *s))
            .collect()
    }

    /// One `MissingMetric` per absent Quartet member. The rows that are present
    /// remain usable.
    pub fn missing_metrics(&self) -> Vec<ExtractError> {
        self.missing_samples()
            .into_iter()
            .map(|sample| ExtractError::MissingMetric {
                sample,
                alias: sample.aliases()[1],
                path: self.path.clone(),
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_samples().is_empty()
    }
}

/// Read a precision/recall table. Rows whose sample name matches no Quartet
/// member are skipped with a warning.
pub fn read_variant_calls(path: &Path, unit: RatioUnit) -> Result<VariantCallsTable, ExtractError> {
    let mut parser = TsvParser::new(
        path,
        [SAMPLE, SNV_PRECISION, INDEL_PRECISION, SNV_RECALL, INDEL_RECALL],
        FILETYPE,
    )?;

    let mut rows = Vec::with_capacity(parser.len());
    for line in 0..parser.len() {
        parser.set_line(line);
        let sample_id = parser.get_string(SAMPLE);
        let Some(quartet) = QuartetSample::from_label(&sample_id) else {
            warn!(
                "{FILETYPE} file {path:?}, line {}: sample '{sample_id}' is not a Quartet sample, skipping it",
                parser.file_line()
            );
            continue;
        };
        rows.push(SampleCalls {
            sample_id,
            quartet,
            snv: PrecisionRecall {
                precision: parser.get_ratio(SNV_PRECISION, unit)?,
                recall: parser.get_ratio(SNV_RECALL, unit)?,
                count: parser.try_get_count(SNV_NUMBER),
            },
            indel: PrecisionRecall {
                precision: parser.get_ratio(INDEL_PRECISION, unit)?,
                recall: parser.get_ratio(INDEL_RECALL, unit)?,
                count: parser.try_get_count(INDEL_NUMBER),
            },
        });
    }

    Ok(VariantCallsTable {
        path: path.to_path_buf(),
        rows,
    })
}
