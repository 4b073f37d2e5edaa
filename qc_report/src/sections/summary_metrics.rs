use super::{DataFile, ReportSection, SectionOutput};
use crate::inputs::ReportInputs;
use log::warn;
use qc_parse::SampleSummary;
use qc_websummary::{
    AlertSpec, Block, CardWithTable, GenericTable, PrettyMetric, TableRow, TitleWithHelp,
};

const PRE_ALIGNMENT_COLUMNS: &[&str] = &[
    "%Dup",
    "%GC",
    "Total Sequences (million)",
    "%Human",
    "%EColi",
    "%Adapter",
    "%Vector",
    "%rRNA",
    "%Virus",
    "%Yeast",
    "%Mitoch",
    "%No hits",
];

const POST_ALIGNMENT_COLUMNS: &[&str] = &[
    "%Mapping",
    "%Mismatch Rate",
    "Mendelian Insert Size",
    "% Q20",
    "% Q30",
    "Mean Coverage",
    "Median Coverage",
    "PCT_1X",
    "PCT_5X",
    "PCT_10X",
    "PCT_20X",
    "PCT_30X",
    "PCT_50X",
];

pub(super) fn build_pre_alignment(
    kind: ReportSection,
    inputs: &ReportInputs,
) -> Option<SectionOutput> {
    let summary = inputs.pre_alignment.as_ref()?;
    Some(build(
        kind,
        summary,
        PRE_ALIGNMENT_COLUMNS,
        "Pre-alignment QC Table Summary",
        "Read quality, duplication and contamination screening of the raw reads.",
    ))
}

pub(super) fn build_post_alignment(
    kind: ReportSection,
    inputs: &ReportInputs,
) -> Option<SectionOutput> {
    let summary = inputs.post_alignment.as_ref()?;
    Some(build(
        kind,
        summary,
        POST_ALIGNMENT_COLUMNS,
        "Post-alignment QC Table Summary",
        "Mapping rate, base quality, insert size and coverage of the aligned reads.",
    ))
}

/// Table of the expected columns that are present, one row per sample.
fn build(
    kind: ReportSection,
    summary: &SampleSummary,
    expected: &[&str],
    title: &str,
    description: &str,
) -> SectionOutput {
    let mut output = SectionOutput::new(kind.section(description));

    let (present, missing): (Vec<&str>, Vec<&str>) = expected
        .iter()
        .copied()
        .partition(|c| summary.column_index(c).is_some());
    if !missing.is_empty() {
        warn!("{:?} lacks the column(s) {}", summary.path, missing.join(", "));
        output.section.alerts.push(AlertSpec::warn(
            "Missing metrics",
            format!("Not reported: {}", missing.join(", ")),
        ));
    }
    let indices: Vec<usize> = present
        .iter()
        .filter_map(|c| summary.column_index(c))
        .collect();

    let header: Vec<String> = std::iter::once("Sample")
        .chain(present.iter().copied())
        .map(String::from)
        .collect();
    let pick = |format: fn(f64) -> String| -> Vec<Vec<String>> {
        summary
            .rows
            .iter()
            .map(|row| {
                std::iter::once(row.sample.clone())
                    .chain(indices.iter().map(|&i| format(row.values[i])))
                    .collect()
            })
            .collect()
    };

    output.section.push(Block::Table(CardWithTable {
        table: GenericTable {
            header: Some(header.clone()),
            rows: pick(|v| PrettyMetric::decimal(v).0)
                .into_iter()
                .map(TableRow)
                .collect(),
        },
        help: TitleWithHelp {
            title: title.to_string(),
            help: String::new(),
        },
    }));
    output.data_files.push(DataFile::new(
        format!("{}_summary", kind.anchor()),
        header,
        pick(|v| if v.is_nan() { String::new() } else { v.to_string() }),
    ));
    output
}
