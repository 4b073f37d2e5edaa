//! qc_report
//!
//! Builds the Quartet DNA-seq QC report from the files a pipeline run leaves
//! in its result directory: an HTML web summary, the tables behind it as
//! tab-delimited files, and a JSON dump of every section.

pub mod config;
mod discover;
mod inputs;
pub mod sections;

pub use config::{FilePatterns, ReportConfig};
pub use discover::{discover_inputs, DiscoveredFiles};
pub use inputs::ReportInputs;
pub use sections::{DataFile, ReportSection, SectionOutput, QUERIED_BATCH};

use anyhow::{Context, Result};
use log::info;
use qc_websummary::WebSummary;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub const REPORT_HTML: &str = "quartet_dnaseq_report.html";
pub const REPORT_DATA_DIR: &str = "quartet_dnaseq_report_data";
pub const REPORT_JSON: &str = "report.json";

/// Paths of everything [`run_report`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutputs {
    pub html: PathBuf,
    pub json: PathBuf,
    pub data_files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    summary: &'a WebSummary,
    metrics: Map<String, Value>,
}

/// Run every section builder in order over the loaded inputs.
pub fn build_sections(inputs: &ReportInputs, config: &ReportConfig) -> Vec<SectionOutput> {
    ReportSection::iter()
        .filter_map(|section| section.build(inputs, config))
        .collect()
}

/// Discover and load the inputs under `result_dir`, build the report and
/// write it to `output_dir`.
pub fn run_report(
    result_dir: &Path,
    output_dir: &Path,
    config: &ReportConfig,
) -> Result<ReportOutputs> {
    config.validate()?;
    let files = discover_inputs(result_dir, &config.files)?;
    let inputs = ReportInputs::load(&files, config);
    let outputs = build_sections(&inputs, config);
    info!("built {} report section(s)", outputs.len());
    write_report(output_dir, config, outputs)
}

/// Write the HTML, the JSON and one TSV per data file.
pub fn write_report(
    output_dir: &Path,
    config: &ReportConfig,
    outputs: Vec<SectionOutput>,
) -> Result<ReportOutputs> {
    let data_dir = output_dir.join(REPORT_DATA_DIR);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Unable to create {}", data_dir.display()))?;

    let mut summary = WebSummary::new(&config.title, "");
    summary.plotly_js = config.plotly_js.clone();
    let mut metrics = Map::new();
    let mut data_files = Vec::new();
    for output in outputs {
        for data in &output.data_files {
            data_files.push(write_data_file(&data_dir, data)?);
        }
        if let Some(m) = output.metrics {
            metrics.insert(output.section.anchor.clone(), m);
        }
        summary.sections.push(output.section);
    }

    let html = output_dir.join(REPORT_HTML);
    std::fs::write(&html, summary.to_html()?)
        .with_context(|| format!("Unable to write {}", html.display()))?;

    let json = data_dir.join(REPORT_JSON);
    let contents = serde_json::to_string_pretty(&ReportJson {
        summary: &summary,
        metrics,
    })?;
    std::fs::write(&json, contents).with_context(|| format!("Unable to write {}", json.display()))?;

    info!("report written to {}", html.display());
    Ok(ReportOutputs {
        html,
        json,
        data_files,
    })
}

fn write_data_file(data_dir: &Path, data: &DataFile) -> Result<PathBuf> {
    let path = data_dir.join(format!("{}.tsv", data.name));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    writer.write_record(&data.header)?;
    for row in &data.rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Unable to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataFile::new(
            "mendelian_summary",
            vec!["Type".to_string(), "Rank".to_string()],
            vec![vec!["SNV".to_string(), "2/4".to_string()]],
        );
        let path = write_data_file(dir.path(), &data).unwrap();
        assert_eq!(path, dir.path().join("mendelian_summary.tsv"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Type\tRank\nSNV\t2/4\n"
        );
    }

    #[test]
    fn test_write_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = write_report(dir.path(), &ReportConfig::default(), Vec::new()).unwrap();
        assert!(outputs.html.exists());
        assert!(outputs.data_files.is_empty());
        let json: Value = serde_json::from_str(&std::fs::read_to_string(outputs.json).unwrap())
            .unwrap();
        assert_eq!(json["summary"]["title"], "Quartet DNA-seq Report");
    }
}
