use super::{DataFile, ReportSection, SectionOutput};
use crate::config::ReportConfig;
use crate::inputs::ReportInputs;
use log::{debug, info, warn};
use qc_parse::ReferenceRow;
use qc_score::{Assessment, BatchScore, HistoricalDistribution, QualityMetric};
use qc_stats::mean;
use qc_types::{FamilyConcordance, Grade, SampleCalls, VariantType};
use qc_websummary::plots::{heatmap_chart, scatter_chart, ScatterGroup};
use qc_websummary::{card_with_table, Block, PrettyMetric, ScoreBar, MISSING};
use serde_json::json;
use strum::IntoEnumIterator;

/// Batch id of the run being assessed.
pub const QUERIED_BATCH: &str = "Queried_Data";

const QUERIED_GROUP: &str = "Queried";

card_with_table!(
    table_name: EvaluationTable,
    row_name: EvaluationRow,
    title: "Evaluation metrics",
    help_text: "The total score is an F0.5-measure of the SNV score and the INDEL score, which are the mean values of Precision, Recall, and MCR, respectively. For better comparison the total score is scaled to [1, 10], with the worst historical dataset scoring 1 and the best scoring 10. Bad is the bottom 20%, Fair lies between the bottom 20% and the median, Good between the median and the top 20%, Great is the top 20%.",
    columns: {
        metric: String : "Quality Metrics",
        value: String : "Value",
        historical: String : "Historical value (mean ± SD)",
        rank: String : "Rank",
        performance: String : "Performance"
    }
);

impl EvaluationRow {
    fn new(metric: QualityMetric, a: &Assessment) -> Self {
        EvaluationRow {
            metric: metric.to_string(),
            value: PrettyMetric::fixed(a.value, 3).0,
            historical: format!(
                "{} ± {}",
                PrettyMetric::fixed(a.historical_mean, 3),
                PrettyMetric::fixed(a.historical_sd, 3)
            ),
            rank: format!("{} / {}", a.rank.position, a.rank.out_of),
            performance: a
                .grade
                .map_or_else(|| MISSING.to_string(), |g| g.to_string()),
        }
    }
}

/// Score every reference batch. Rows sharing a batch id are pooled, batches
/// keep the order of their first row.
fn reference_batches(reference: &[ReferenceRow]) -> Vec<BatchScore> {
    let mut batches: Vec<(&str, Vec<SampleCalls>, Vec<FamilyConcordance>)> = Vec::new();
    for row in reference {
        let i = match batches.iter().position(|(b, _, _)| *b == row.batch) {
            Some(i) => i,
            None => {
                batches.push((row.batch.as_str(), Vec::new(), Vec::new()));
                batches.len() - 1
            }
        };
        batches[i].1.extend(row.calls.iter().cloned());
        batches[i].2.extend(row.families());
    }
    batches
        .into_iter()
        .map(|(batch, calls, families)| BatchScore::from_observations(batch, &calls, &families))
        .collect()
}

fn mean_f1(calls: &[SampleCalls], variant_type: VariantType) -> f64 {
    let f1: Vec<f64> = calls.iter().map(|c| c.get(variant_type).f1()).collect();
    mean(&f1)
}

fn group_color(group: &str) -> &'static str {
    match group {
        "PCR" => "#2f5c85",
        "PCR-free" => "#7ba1c7",
        QUERIED_GROUP => "#bb1616",
        _ => "#999999",
    }
}

/// F1-score against Mendelian concordance of every reference row and of the
/// queried run, one trace per library group.
fn performance_chart(
    variant_type: VariantType,
    reference: &[ReferenceRow],
    queried_calls: &[SampleCalls],
    queried_families: &[FamilyConcordance],
) -> Block {
    let mut groups: Vec<ScatterGroup> = Vec::new();
    for row in reference {
        let mcr = match variant_type {
            VariantType::Snv => row.snv_mendelian,
            VariantType::Indel => row.indel_mendelian,
        };
        let i = match groups.iter().position(|g| g.name == row.group) {
            Some(i) => i,
            None => {
                groups.push(ScatterGroup {
                    name: row.group.clone(),
                    color: group_color(&row.group),
                    highlight: false,
                    x: Vec::new(),
                    y: Vec::new(),
                    labels: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[i].x.push(mcr);
        groups[i].y.push(mean_f1(&row.calls, variant_type));
        groups[i].labels.push(row.batch.clone());
    }

    let queried_mcr: Vec<f64> = queried_families
        .iter()
        .filter(|f| f.variant_type == variant_type)
        .map(|f| f.rate)
        .collect();
    groups.push(ScatterGroup {
        name: QUERIED_GROUP.to_string(),
        color: group_color(QUERIED_GROUP),
        highlight: true,
        x: vec![mean(&queried_mcr)],
        y: vec![mean_f1(queried_calls, variant_type)],
        labels: vec![QUERIED_BATCH.to_string()],
    });

    let (id, title, help) = match variant_type {
        VariantType::Snv => (
            "snv_performance",
            "SNV Performance",
            "Due to the apparent differences between SNV and INDEL, the performance of the two \
             types of small variants of the evaluated data compared to the Quartet historical \
             batches is shown separately. Each data point represents a set of Quartet samples, \
             i.e., one each of D5, D6, F7, and M8.",
        ),
        VariantType::Indel => ("indel_performance", "INDEL Performance", ""),
    };
    Block::Chart {
        id: id.to_string(),
        chart: scatter_chart(title, help, "Mendelian Concordance Rate", "F1-score", groups),
    }
}

pub(super) fn build(
    kind: ReportSection,
    inputs: &ReportInputs,
    config: &ReportConfig,
) -> Option<SectionOutput> {
    if inputs.variant_calls.is_empty() || inputs.mendelian.is_empty() {
        debug!("No file matched: conclusion needs both variants.calling.qc.txt and *.summary.txt");
        return None;
    }
    if inputs.reference.is_empty() {
        warn!("no Quartet reference datasets available, skipping the assessment summary");
        return None;
    }
    let beta = config.beta_squared;

    let queried_calls = inputs.sample_calls();
    let queried = BatchScore::from_observations(QUERIED_BATCH, &queried_calls, &inputs.mendelian);
    let historical = reference_batches(&inputs.reference);

    let assessments: Vec<(QualityMetric, Assessment)> = QualityMetric::iter()
        .map(|metric| {
            let history: HistoricalDistribution =
                historical.iter().map(|b| b.metric(metric, beta)).collect();
            (metric, history.assess(queried.metric(metric, beta), &config.ranker))
        })
        .collect();
    let (_, total) = assessments.iter().find(|(m, _)| *m == QualityMetric::Total)?;
    info!(
        "total score {:.5} ({}), rank {} among {} historical batches",
        total.value,
        total.grade.map_or_else(|| MISSING.to_string(), |g| g.to_string()),
        total.rank,
        historical.len()
    );

    let mut output = SectionOutput::new(kind.section(
        "The performance of the submitted data is graded as Bad, Fair, Good, or Great based on \
         the ranking of its total score among the historical datasets. The total score is an \
         F0.5-measure of the SNV score and the INDEL score, which are the mean values of \
         Precision, Recall, and MCR, respectively.",
    ));

    let grades = [Grade::Bad, Grade::Fair, Grade::Good, Grade::Great];
    output.section.push(Block::Legend(
        grades
            .iter()
            .map(|g| (g.to_string(), g.color().to_string()))
            .collect(),
    ));
    let scaled = total
        .scaled_cut_points
        .map_or([f64::NAN; 3], |c| [c.q1, c.q2, c.q3]);
    output.section.push(Block::ScoreBar(ScoreBar::new(
        total.score,
        total.marker_percent(),
        [
            ("Bad", Grade::Bad.color()),
            ("Fair", Grade::Fair.color()),
            ("Good", Grade::Good.color()),
            ("Great", Grade::Great.color()),
        ],
        config.ranker.score_range,
        scaled,
    )));

    let table = EvaluationTable(
        assessments
            .iter()
            .map(|(m, a)| EvaluationRow::new(*m, a))
            .collect(),
    );
    output.data_files.push(DataFile::new(
        "conclusion_evaluation_metrics",
        EvaluationTable::header(),
        table.csv_rows(),
    ));
    output.section.push(Block::Table(table.into()));

    output.section.push(performance_chart(
        VariantType::Snv,
        &inputs.reference,
        &queried_calls,
        &inputs.mendelian,
    ));
    output.section.push(performance_chart(
        VariantType::Indel,
        &inputs.reference,
        &queried_calls,
        &inputs.mendelian,
    ));

    // worst batch first
    let mut all_batches: Vec<&BatchScore> = historical.iter().chain([&queried]).collect();
    all_batches.sort_by(|a, b| a.total(beta).total_cmp(&b.total(beta)));
    let metrics: Vec<QualityMetric> = QualityMetric::iter().collect();
    output.section.push(Block::Chart {
        id: "historical_scores".to_string(),
        chart: heatmap_chart(
            "Historical scores",
            "Scores of evaluation metrics for the current batch and all historical batches \
             assessed. The name of your data is Queried_Data.",
            "Performance of batches gradually increases from left to right",
            "Evaluation metrics",
            all_batches.iter().map(|b| b.batch_id.clone()).collect(),
            metrics.iter().map(ToString::to_string).collect(),
            metrics
                .iter()
                .map(|&m| all_batches.iter().map(|b| b.metric(m, beta)).collect())
                .collect(),
        ),
    });
    output.data_files.push(DataFile::new(
        "historical_scores",
        std::iter::once("batch")
            .chain(metrics.iter().map(|m| m.key()))
            .map(String::from)
            .collect(),
        all_batches
            .iter()
            .map(|b| {
                std::iter::once(b.batch_id.clone())
                    .chain(metrics.iter().map(|&m| b.metric(m, beta).to_string()))
                    .collect()
            })
            .collect(),
    ));

    output.metrics = Some(json!({
        "beta_squared": beta,
        "queried": queried,
        "total_score": total.value,
        "assessments": assessments
            .iter()
            .map(|(m, a)| (m.key().to_string(), json!(a)))
            .collect::<serde_json::Map<_, _>>(),
    }));
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qc_parse::VariantCallsTable;
    use qc_types::{FamilyLabel, PrecisionRecall, QuartetSample};
    use std::path::PathBuf;

    fn calls(prefix: &str, snv: f64, indel: f64) -> Vec<SampleCalls> {
        QuartetSample::iter()
            .map(|quartet| SampleCalls {
                sample_id: format!("{prefix}_{quartet}"),
                quartet,
                snv: PrecisionRecall {
                    precision: snv,
                    recall: snv,
                    count: None,
                },
                indel: PrecisionRecall {
                    precision: indel,
                    recall: indel,
                    count: None,
                },
            })
            .collect()
    }

    fn reference_row(batch: &str, group: &str, v: f64) -> ReferenceRow {
        ReferenceRow {
            sample: format!("{batch}_1"),
            group: group.to_string(),
            batch: batch.to_string(),
            calls: calls(batch, v, v),
            snv_mendelian: v,
            indel_mendelian: v,
        }
    }

    fn inputs() -> ReportInputs {
        let family = |variant_type, rate| FamilyConcordance {
            family: FamilyLabel(1),
            variant_type,
            detected_variants: None,
            consistent_variants: None,
            rate,
        };
        ReportInputs {
            variant_calls: vec![VariantCallsTable {
                path: PathBuf::from("variants.calling.qc.txt"),
                rows: calls("query", 0.75, 0.75),
            }],
            mendelian: vec![family(VariantType::Snv, 0.75), family(VariantType::Indel, 0.75)],
            reference: vec![
                reference_row("b1", "PCR", 0.5),
                reference_row("b2", "PCR", 0.6),
                reference_row("b3", "PCR-free", 0.7),
                reference_row("b4", "PCR-free", 0.8),
                reference_row("b5", "PCR-free", 0.9),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_batches_pool_rows() {
        let mut reference = inputs().reference;
        reference.push(reference_row("b1", "PCR", 0.7));
        let batches = reference_batches(&reference);
        assert_eq!(batches.len(), 5);
        assert_eq!(batches[0].batch_id, "b1");
        assert!((batches[0].precision_snv - 0.6).abs() < 1e-12);
        assert!((batches[0].mendelian_indel - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_conclusion() {
        let output = build(ReportSection::Conclusion, &inputs(), &ReportConfig::default()).unwrap();
        assert_eq!(output.section.name, "Assessment Summary");

        let table = output
            .data_files
            .iter()
            .find(|d| d.name == "conclusion_evaluation_metrics")
            .unwrap();
        assert_eq!(table.header[0], "Quality Metrics");
        // combine(x, x) == x, so every metric of a uniform batch equals x
        let total = table.rows.last().unwrap();
        assert_eq!(
            total,
            &vec!["Total Score", "0.750", "0.708 ± 0.143", "3 / 6", "Good"]
        );

        let Some(Block::ScoreBar(bar)) = output
            .section
            .blocks
            .iter()
            .find(|b| matches!(b, Block::ScoreBar(_)))
        else {
            panic!("no score bar");
        };
        assert!((bar.score - 6.625).abs() < 1e-9);
        assert_eq!(bar.ticks[1].label, "2.80");
        assert!((bar.marker_percent - 100.0 * (3.0 * 2.0 / 6.0 + 1.0 / 6.0)).abs() < 1e-9);

        let scores = output
            .data_files
            .iter()
            .find(|d| d.name == "historical_scores")
            .unwrap();
        let order: Vec<&str> = scores.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(order, vec!["b1", "b2", "b3", QUERIED_BATCH, "b4", "b5"]);

        let metrics = output.metrics.unwrap();
        assert_eq!(metrics["assessments"]["total"]["rank"]["position"], 3);
        assert_eq!(metrics["assessments"]["total"]["grade"], "Good");
    }

    #[test]
    fn test_performance_chart_groups() {
        let inputs = inputs();
        let Block::Chart { id, chart } = performance_chart(
            VariantType::Snv,
            &inputs.reference,
            &inputs.sample_calls(),
            &inputs.mendelian,
        ) else {
            panic!("expected a chart");
        };
        assert_eq!(id, "snv_performance");
        let names: Vec<_> = chart.plot.data.iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, vec!["PCR", "PCR-free", "Queried"]);
        assert_eq!(chart.plot.data[1]["x"].as_array().unwrap().len(), 3);
        assert_eq!(chart.plot.data[2]["marker"]["color"], "#bb1616");
    }

    #[test]
    fn test_conclusion_needs_reference() {
        let mut inputs = inputs();
        inputs.reference.clear();
        assert!(build(ReportSection::Conclusion, &inputs, &ReportConfig::default()).is_none());
    }
}
