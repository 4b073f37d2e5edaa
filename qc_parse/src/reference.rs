use crate::{ExtractError, RatioUnit, TsvParser};
use log::warn;
use qc_types::{
    FamilyConcordance, FamilyLabel, PrecisionRecall, QuartetSample, SampleCalls, VariantType,
};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// One historical set of Quartet samples from `quartet_reference.txt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRow {
    pub sample: String,
    /// Library preparation group, e.g. `PCR` or `PCR-free`.
    pub group: String,
    pub batch: String,
    /// One entry per Quartet member, in family order.
    pub calls: Vec<SampleCalls>,
    pub snv_mendelian: f64,
    pub indel_mendelian: f64,
}

impl ReferenceRow {
    /// The row's Mendelian concordance as one family per variant type.
    pub fn families(&self) -> Vec<FamilyConcordance> {
        [
            (VariantType::Snv, self.snv_mendelian),
            (VariantType::Indel, self.indel_mendelian),
        ]
        .into_iter()
        .map(|(variant_type, rate)| FamilyConcordance {
            family: FamilyLabel(1),
            variant_type,
            detected_variants: None,
            consistent_variants: None,
            rate,
        })
        .collect()
    }
}

fn reference_column(variant_type: VariantType, sample: QuartetSample, metric: &str) -> String {
    format!("{}_{sample}-{metric}", variant_type.column_prefix())
}

fn mendelian_column(variant_type: VariantType) -> String {
    format!("{}_mendelian", variant_type.column_prefix())
}

/// Read the historical per-batch performance of the Quartet reference datasets.
/// All values are fractions.
pub fn read_quartet_reference(path: &Path) -> Result<Vec<ReferenceRow>, ExtractError> {
    const FILETYPE: &str = "Quartet reference";

    let mut required = vec!["sample".to_string(), "group".to_string(), "batch".to_string()];
    for variant_type in VariantType::iter() {
        for sample in QuartetSample::iter() {
            required.push(reference_column(variant_type, sample, "precision"));
            required.push(reference_column(variant_type, sample, "recall"));
        }
        required.push(mendelian_column(variant_type));
    }
    let mut parser = TsvParser::new(path, &required, FILETYPE)?;

    let pr = |parser: &TsvParser, vt, sample| -> Result<PrecisionRecall, ExtractError> {
        let col = |metric| reference_column(vt, sample, metric);
        Ok(PrecisionRecall {
            precision: parser.get_ratio(&col("precision"), RatioUnit::Fraction)?,
            recall: parser.get_ratio(&col("recall"), RatioUnit::Fraction)?,
            count: None,
        })
    };

    let mut rows = Vec::with_capacity(parser.len());
    for line in 0..parser.len() {
        parser.set_line(line);
        let sample_name = parser.get_string("sample");
        let calls = QuartetSample::iter()
            .map(|quartet| {
                Ok(SampleCalls {
                    sample_id: format!("{sample_name}_{quartet}"),
                    quartet,
                    snv: pr(&parser, VariantType::Snv, quartet)?,
                    indel: pr(&parser, VariantType::Indel, quartet)?,
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;
        rows.push(ReferenceRow {
            group: parser.get_string("group"),
            batch: parser.get_string("batch"),
            calls,
            snv_mendelian: parser
                .get_ratio(&mendelian_column(VariantType::Snv), RatioUnit::Fraction)?,
            indel_mendelian: parser
                .get_ratio(&mendelian_column(VariantType::Indel), RatioUnit::Fraction)?,
            sample: sample_name,
        });
    }
    Ok(rows)
}

/// F1-score and Mendelian concordance of one historical dataset, per variant type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub sample: String,
    pub mendelian: f64,
    pub f1: f64,
    pub variant_type: VariantType,
}

/// Read `history.txt`. Rows with an unknown `type` are skipped with a warning.
pub fn read_history(path: &Path) -> Result<Vec<HistoryRecord>, ExtractError> {
    const FILETYPE: &str = "history";

    let mut parser = TsvParser::new(path, ["sample", "mendelian", "f1", "type"], FILETYPE)?;
    let mut records = Vec::with_capacity(parser.len());
    for line in 0..parser.len() {
        parser.set_line(line);
        let type_label = parser.get_string("type");
        let Ok(variant_type) = VariantType::from_str(&type_label) else {
            warn!(
                "{FILETYPE} file {path:?}, line {}: unknown variant type '{type_label}', skipping it",
                parser.file_line()
            );
            continue;
        };
        records.push(HistoryRecord {
            sample: parser.get_string("sample"),
            mendelian: parser.get_ratio("mendelian", RatioUnit::Fraction)?,
            f1: parser.get_ratio("f1", RatioUnit::Fraction)?,
            variant_type,
        });
    }
    Ok(records)
}
