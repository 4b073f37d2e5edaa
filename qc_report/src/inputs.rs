use crate::config::ReportConfig;
use crate::discover::DiscoveredFiles;
use log::{info, warn};
use qc_parse::{
    read_history, read_information, read_mendelian_summary, read_quartet_reference,
    read_sample_summary, read_variant_calls, renumber_families, ExtractError, HistoryRecord,
    MendelianTable, ReferenceRow, SampleSummary, VariantCallsTable,
};
use qc_types::{FamilyConcordance, SampleCalls};
use qc_websummary::AlertSpec;
use std::path::Path;

/// Everything the section builders read, loaded once per report.
///
/// A file that fails to load is logged and left out; the sections that need it
/// are skipped.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub information: Option<Vec<(String, String)>>,
    pub variant_calls: Vec<VariantCallsTable>,
    /// Families of every Mendelian summary, renumbered per variant type.
    pub mendelian: Vec<FamilyConcordance>,
    pub pre_alignment: Option<SampleSummary>,
    pub post_alignment: Option<SampleSummary>,
    pub reference: Vec<ReferenceRow>,
    pub history: Vec<HistoryRecord>,
    /// Problems that leave a table usable but incomplete.
    pub warnings: Vec<AlertSpec>,
}

impl ReportInputs {
    pub fn load(files: &DiscoveredFiles, config: &ReportConfig) -> ReportInputs {
        let mut inputs = ReportInputs {
            information: first(&files.information, "information").and_then(|p| {
                loaded(read_information(p))
            }),
            pre_alignment: first(&files.pre_alignment, "pre-alignment summary")
                .and_then(|p| loaded(read_sample_summary(p, "pre-alignment summary"))),
            post_alignment: first(&files.post_alignment, "post-alignment summary")
                .and_then(|p| loaded(read_sample_summary(p, "post-alignment summary"))),
            ..Default::default()
        };

        for path in &files.variant_calls {
            if let Some(table) = loaded(read_variant_calls(path, config.precision_recall_unit)) {
                for err in table.missing_metrics() {
                    warn!("{err}");
                    inputs
                        .warnings
                        .push(AlertSpec::warn("Incomplete variant calling QC", err.to_string()));
                }
                inputs.variant_calls.push(table);
            }
        }

        let tables: Vec<MendelianTable> = files
            .mendelian
            .iter()
            .filter_map(|p| loaded(read_mendelian_summary(p)))
            .collect();
        inputs.mendelian = tables.into_iter().flat_map(|t| t.rows).collect();
        renumber_families(&mut inputs.mendelian);

        if let Some(path) = config.reference_file() {
            inputs.reference = loaded(read_quartet_reference(&path)).unwrap_or_default();
        } else {
            warn!("no reference directory configured, historical comparisons are skipped");
        }
        if let Some(path) = config.history_file() {
            inputs.history = loaded(read_history(&path)).unwrap_or_default();
        }

        info!(
            "loaded {} variant calling table(s), {} Mendelian families, {} reference rows, {} history rows",
            inputs.variant_calls.len(),
            inputs.mendelian.len(),
            inputs.reference.len(),
            inputs.history.len()
        );
        inputs
    }

    /// Rows of every variant calling table, in file order.
    pub fn sample_calls(&self) -> Vec<SampleCalls> {
        self.variant_calls
            .iter()
            .flat_map(|t| t.rows.iter().cloned())
            .collect()
    }
}

fn first<'a>(paths: &'a [std::path::PathBuf], kind: &str) -> Option<&'a Path> {
    if paths.len() > 1 {
        warn!(
            "found {} {kind} files, using {}",
            paths.len(),
            paths[0].display()
        );
    }
    paths.first().map(|p| p.as_path())
}

fn loaded<T>(result: Result<T, ExtractError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(err) => {
            warn!("{err}, skipping it");
            None
        }
    }
}
