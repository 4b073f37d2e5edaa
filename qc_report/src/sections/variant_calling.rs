use super::{DataFile, ReportSection, SectionOutput};
use crate::inputs::ReportInputs;
use qc_parse::HistoryRecord;
use qc_score::HistoricalDistribution;
use qc_stats::{mean, std_dev};
use qc_types::{FamilyConcordance, MetricRecord, SampleCalls, VariantType};
use qc_websummary::plots::{scatter_chart, ScatterGroup};
use qc_websummary::{card_with_table, AlertSpec, Block, MeanSd, Ratio, MISSING};
use serde_json::{json, Map, Value};
use strum::IntoEnumIterator;

/// Samples per family in the precision/recall table.
const FAMILY_SIZE: usize = 4;

card_with_table!(
    table_name: VariantCallingSummaryTable,
    row_name: VariantCallingSummaryRow,
    title: "Assessment based on reference datasets",
    help_text: "Mean ± SD over the queried samples. The rank places the mean F1-score among the historical datasets.",
    columns: {
        variant_type: String : "Type",
        precision: MeanSd : "Precision",
        recall: MeanSd : "Recall",
        f1: MeanSd : "F1-score",
        rank: String : "Rank"
    }
);

card_with_table!(
    table_name: MendelianSummaryTable,
    row_name: MendelianSummaryRow,
    title: "Assessment based on Quartet family-dependent built-in genetic truth",
    help_text: "Mean ± SD over the queried families. The rank places the mean Mendelian concordance rate among the historical datasets.",
    columns: {
        variant_type: String : "Type",
        mendelian: MeanSd : "Mendelian Concordance Rate",
        rank: String : "Rank"
    }
);

card_with_table!(
    table_name: VariantCallingDetailTable,
    row_name: VariantCallingDetailRow,
    title: "Details of variant calling",
    help_text: "Number of variants, precision, recall and F1-score of every queried sample.",
    columns: {
        sample: String : "Sample",
        snv_number: Option<u64> : "SNV number",
        snv_precision: Ratio : "SNV precision",
        snv_recall: Ratio : "SNV recall",
        snv_f1: Ratio : "SNV F1-score",
        indel_number: Option<u64> : "INDEL number",
        indel_precision: Ratio : "INDEL precision",
        indel_recall: Ratio : "INDEL recall",
        indel_f1: Ratio : "INDEL F1-score"
    }
);

card_with_table!(
    table_name: MendelianDetailTable,
    row_name: MendelianDetailRow,
    title: "Details of Mendelian concordance",
    help_text: "Variants detected in every family and the number of them consistent with Mendelian inheritance.",
    columns: {
        family: String : "Family",
        snv_detected: Option<u64> : "SNV Detected Variants",
        snv_consistent: Option<u64> : "SNV Mendelian Consistent Variants",
        indel_detected: Option<u64> : "INDEL Detected Variants",
        indel_consistent: Option<u64> : "INDEL Mendelian Consistent Variants"
    }
);

fn mean_sd(values: &[f64]) -> MeanSd {
    MeanSd {
        mean: mean(values),
        sd: std_dev(values, 0),
        digits: 2,
    }
}

/// `p/n` among the history, or the missing placeholder without history.
fn rank_label(history: &HistoricalDistribution, query: f64) -> String {
    if history.is_empty() {
        MISSING.to_string()
    } else {
        history.rank(query).to_string()
    }
}

fn rates(families: &[FamilyConcordance], variant_type: VariantType) -> Vec<f64> {
    families
        .iter()
        .filter(|f| f.variant_type == variant_type)
        .map(|f| f.rate)
        .collect()
}

fn f1_scores(calls: &[SampleCalls], variant_type: VariantType) -> Vec<f64> {
    calls.iter().map(|c| c.get(variant_type).f1()).collect()
}

fn history_of(
    history: &[HistoryRecord],
    variant_type: VariantType,
    value: fn(&HistoryRecord) -> f64,
) -> HistoricalDistribution {
    history
        .iter()
        .filter(|h| h.variant_type == variant_type)
        .map(value)
        .collect()
}

/// One record per queried sample, joined with the concordance of the family
/// it belongs to. Families are consecutive groups of four rows; a sample
/// without a family gets a NaN rate.
fn metric_records(
    calls: &[SampleCalls],
    families: &[FamilyConcordance],
    variant_type: VariantType,
) -> Vec<MetricRecord> {
    let family_rates = rates(families, variant_type);
    calls
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let rate = family_rates.get(i / FAMILY_SIZE).copied().unwrap_or(f64::NAN);
            MetricRecord::new(c, variant_type, rate)
        })
        .collect()
}

/// F1-score against Mendelian concordance, historical batches next to the
/// queried samples.
fn performance_chart(
    variant_type: VariantType,
    records: &[MetricRecord],
    history: &[HistoryRecord],
) -> Block {
    let historical: Vec<&HistoryRecord> = history
        .iter()
        .filter(|h| h.variant_type == variant_type)
        .collect();
    let groups = vec![
        ScatterGroup {
            name: "Historical Datasets".to_string(),
            color: "#007dd4",
            highlight: false,
            x: historical.iter().map(|h| h.f1).collect(),
            y: historical.iter().map(|h| h.mendelian).collect(),
            labels: historical.iter().map(|h| h.sample.clone()).collect(),
        },
        ScatterGroup {
            name: "Your Datasets".to_string(),
            color: "#ed6f00",
            highlight: true,
            x: records.iter().map(MetricRecord::f1).collect(),
            y: records.iter().map(|r| r.mendelian_concordance).collect(),
            labels: records.iter().map(|r| r.sample_id.clone()).collect(),
        },
    ];
    let (id, title) = match variant_type {
        VariantType::Snv => ("variant_calling_snv_performance", "SNV Performance"),
        VariantType::Indel => ("variant_calling_indel_performance", "INDEL Performance"),
    };
    Block::Chart {
        id: id.to_string(),
        chart: scatter_chart(title, "", "F1-score", "Mendelian Concordance Rate", groups),
    }
}

fn detail_row(calls: &SampleCalls) -> VariantCallingDetailRow {
    VariantCallingDetailRow {
        sample: calls.sample_id.clone(),
        snv_number: calls.snv.count,
        snv_precision: Ratio(calls.snv.precision),
        snv_recall: Ratio(calls.snv.recall),
        snv_f1: Ratio(calls.snv.f1()),
        indel_number: calls.indel.count,
        indel_precision: Ratio(calls.indel.precision),
        indel_recall: Ratio(calls.indel.recall),
        indel_f1: Ratio(calls.indel.f1()),
    }
}

/// One row per family number, SNV and INDEL side by side.
fn mendelian_detail_rows(families: &[FamilyConcordance]) -> Vec<MendelianDetailRow> {
    let mut labels: Vec<_> = families.iter().map(|f| f.family).collect();
    labels.sort();
    labels.dedup();
    labels
        .into_iter()
        .map(|label| {
            let find = |vt| {
                families
                    .iter()
                    .find(|f| f.family == label && f.variant_type == vt)
            };
            let snv = find(VariantType::Snv);
            let indel = find(VariantType::Indel);
            MendelianDetailRow {
                family: label.to_string(),
                snv_detected: snv.and_then(|f| f.detected_variants),
                snv_consistent: snv.and_then(|f| f.consistent_variants),
                indel_detected: indel.and_then(|f| f.detected_variants),
                indel_consistent: indel.and_then(|f| f.consistent_variants),
            }
        })
        .collect()
}

pub(super) fn build(kind: ReportSection, inputs: &ReportInputs) -> Option<SectionOutput> {
    let calls = inputs.sample_calls();
    let families = &inputs.mendelian;
    if calls.is_empty() && families.is_empty() {
        return None;
    }

    let mut output = SectionOutput::new(kind.section(
        "Precision, recall and Mendelian concordance of the queried small variant calls, \
         compared with the historical Quartet datasets.",
    ));
    output.section.alerts.extend(inputs.warnings.iter().cloned());
    if inputs.history.is_empty() {
        output.section.alerts.push(AlertSpec::info(
            "No historical datasets",
            "Ranks among the historical Quartet datasets are not shown.",
        ));
    }
    let mut metrics = Map::new();

    if !calls.is_empty() {
        let mut rows = Vec::new();
        for vt in VariantType::iter() {
            let precision: Vec<f64> = calls.iter().map(|c| c.get(vt).precision).collect();
            let recall: Vec<f64> = calls.iter().map(|c| c.get(vt).recall).collect();
            let f1 = f1_scores(&calls, vt);
            let history = history_of(&inputs.history, vt, |h| h.f1);
            let query = mean(&f1);
            metrics.insert(
                format!("{}_f1", vt.column_prefix()),
                json!({ "mean": query, "rank": (!history.is_empty()).then(|| history.rank(query)) }),
            );
            rows.push(VariantCallingSummaryRow {
                variant_type: vt.to_string(),
                precision: mean_sd(&precision),
                recall: mean_sd(&recall),
                f1: mean_sd(&f1),
                rank: rank_label(&history, query),
            });
        }
        let table = VariantCallingSummaryTable(rows);
        output.data_files.push(DataFile::new(
            "variant_calling_qc_summary",
            VariantCallingSummaryTable::header(),
            table.csv_rows(),
        ));
        output.section.push(Block::Table(table.into()));
    }

    if !families.is_empty() {
        let mut rows = Vec::new();
        for vt in VariantType::iter() {
            let mcr = rates(families, vt);
            let history = history_of(&inputs.history, vt, |h| h.mendelian);
            let query = mean(&mcr);
            metrics.insert(
                format!("{}_mendelian", vt.column_prefix()),
                json!({ "mean": query, "rank": (!history.is_empty()).then(|| history.rank(query)) }),
            );
            rows.push(MendelianSummaryRow {
                variant_type: vt.to_string(),
                mendelian: mean_sd(&mcr),
                rank: rank_label(&history, query),
            });
        }
        let table = MendelianSummaryTable(rows);
        output.data_files.push(DataFile::new(
            "mendelian_summary",
            MendelianSummaryTable::header(),
            table.csv_rows(),
        ));
        output.section.push(Block::Table(table.into()));
    }

    if !calls.is_empty() {
        let mut records = Vec::new();
        for vt in VariantType::iter() {
            let joined = metric_records(&calls, families, vt);
            output
                .section
                .push(performance_chart(vt, &joined, &inputs.history));
            records.extend(joined);
        }
        metrics.insert("records".to_string(), json!(records));

        let table = VariantCallingDetailTable(calls.iter().map(detail_row).collect());
        output.data_files.push(DataFile::new(
            "variant_calling_qc_details",
            VariantCallingDetailTable::header(),
            table.csv_rows(),
        ));
        output.section.push(Block::Table(table.into()));
    }

    if !families.is_empty() {
        let table = MendelianDetailTable(mendelian_detail_rows(families));
        output.data_files.push(DataFile::new(
            "mendelian_details",
            MendelianDetailTable::header(),
            table.csv_rows(),
        ));
        output.section.push(Block::Table(table.into()));
    }

    output.metrics = Some(Value::Object(metrics));
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qc_parse::VariantCallsTable;
    use qc_types::{FamilyLabel, PrecisionRecall, QuartetSample};
    use qc_websummary::MakePretty;
    use std::path::PathBuf;

    fn sample(quartet: QuartetSample, snv: (f64, f64), indel: (f64, f64)) -> SampleCalls {
        SampleCalls {
            sample_id: format!("LCL{}_1", quartet as usize + 5),
            quartet,
            snv: PrecisionRecall {
                precision: snv.0,
                recall: snv.1,
                count: Some(3_500_000),
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
            detected_variants: Some(1000),
            consistent_variants: Some((rate * 1000.0).round() as u64),
            rate,
        }
    }

    fn history() -> Vec<HistoryRecord> {
        [(0.90, 0.95), (0.99, 0.99), (0.80, 0.85)]
            .into_iter()
            .enumerate()
            .map(|(i, (f1, mendelian))| HistoryRecord {
                sample: format!("batch{i}"),
                mendelian,
                f1,
                variant_type: VariantType::Snv,
            })
            .collect()
    }

    fn inputs() -> ReportInputs {
        ReportInputs {
            variant_calls: vec![VariantCallsTable {
                path: PathBuf::from("variants.calling.qc.txt"),
                rows: vec![
                    sample(QuartetSample::D5, (0.96, 0.94), (0.80, 0.70)),
                    sample(QuartetSample::D6, (0.98, 0.96), (0.84, 0.74)),
                    sample(QuartetSample::F7, (0.96, 0.94), (0.80, 0.70)),
                    sample(QuartetSample::M8, (0.98, 0.96), (0.84, 0.74)),
                ],
            }],
            mendelian: vec![
                family(1, VariantType::Snv, 0.97),
                family(1, VariantType::Indel, 0.80),
            ],
            history: history(),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_tables() {
        let output = build(ReportSection::VariantCallingQc, &inputs()).unwrap();
        let names: Vec<_> = output.data_files.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "variant_calling_qc_summary",
                "mendelian_summary",
                "variant_calling_qc_details",
                "mendelian_details"
            ]
        );

        let summary = &output.data_files[0];
        assert_eq!(summary.header, vec!["Type", "Precision", "Recall", "F1-score", "Rank"]);
        assert_eq!(summary.rows[0][0], "SNV");
        assert_eq!(summary.rows[0][1], "0.97 ± 0.01");
        // mean SNV F1 0.95 beats 0.90 and 0.80 but not 0.99
        assert_eq!(summary.rows[0][4], "2/4");
        // no INDEL history
        assert_eq!(summary.rows[1][4], MISSING);

        let mendelian = &output.data_files[1];
        assert_eq!(mendelian.rows[0], vec!["SNV", "0.97 ± 0.00", "2/4"]);

        let details = &output.data_files[2];
        assert_eq!(details.rows.len(), 4);
        assert_eq!(details.rows[0][0], "LCL5_1");
        assert_eq!(details.rows[0][1], "3500000");
        assert_eq!(details.rows[0][5], "");

        assert_eq!(
            output.data_files[3].rows,
            vec![vec!["Family 1", "1000", "970", "1000", "800"]]
        );

        let metrics = output.metrics.unwrap();
        assert_eq!(metrics["snv_f1"]["rank"]["position"], 2);
        assert!(metrics["indel_f1"]["rank"].is_null());
    }

    #[test]
    fn test_performance_chart_pairs_samples_with_families() {
        let inputs = inputs();
        let records = metric_records(&inputs.sample_calls(), &inputs.mendelian, VariantType::Snv);
        let Block::Chart { chart, .. } =
            performance_chart(VariantType::Snv, &records, &inputs.history)
        else {
            panic!("expected a chart");
        };
        let queried = &chart.plot.data[1];
        assert_eq!(queried["name"], "Your Datasets");
        assert_eq!(queried["y"].as_array().unwrap().len(), 4);
        assert_eq!(queried["y"][3], 0.97);
        assert_eq!(chart.plot.data[0]["x"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_metric_records_join_families() {
        let mut inputs = inputs();
        inputs.variant_calls[0].rows.push(sample(QuartetSample::D5, (0.9, 0.9), (0.8, 0.8)));
        let records =
            metric_records(&inputs.sample_calls(), &inputs.mendelian, VariantType::Indel);
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].sample_id, "LCL5_1");
        assert_eq!(records[0].variant_type, VariantType::Indel);
        assert_eq!(records[0].precision, 0.80);
        assert_eq!(records[3].mendelian_concordance, 0.80);
        // a fifth sample starts a second family that has no concordance rate
        assert!(records[4].mendelian_concordance.is_nan());

        let output = build(ReportSection::VariantCallingQc, &inputs).unwrap();
        let json_records = output.metrics.unwrap()["records"].as_array().unwrap().len();
        assert_eq!(json_records, 10);
    }

    #[test]
    fn test_mendelian_only() {
        let mut inputs = inputs();
        inputs.variant_calls.clear();
        let output = build(ReportSection::VariantCallingQc, &inputs).unwrap();
        let names: Vec<_> = output.data_files.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["mendelian_summary", "mendelian_details"]);
        assert!(output.section.alerts.is_empty());

        inputs.history.clear();
        let output = build(ReportSection::VariantCallingQc, &inputs).unwrap();
        assert_eq!(output.section.alerts[0].title, "No historical datasets");
    }

    #[test]
    fn test_mean_sd_uses_population_sd() {
        let m = mean_sd(&[0.9, 1.0]);
        assert_eq!(m.make_pretty(), "0.95 ± 0.05");
    }
}
