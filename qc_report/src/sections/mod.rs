//! The report sections, built one after another from the loaded inputs.

mod conclusion;
mod general_information;
mod summary_metrics;
mod supplementary;
mod variant_calling;

pub use conclusion::QUERIED_BATCH;

use crate::config::ReportConfig;
use crate::inputs::ReportInputs;
use log::debug;
use qc_websummary::Section;
use serde::Serialize;
use serde_json::Value;
use strum_macros::{Display, EnumIter};

/// A tab-delimited table written next to the HTML report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFile {
    /// File stem; the file is written as `<name>.tsv`.
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataFile {
    pub fn new(name: impl ToString, header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        DataFile {
            name: name.to_string(),
            header,
            rows,
        }
    }
}

/// What one section builder produces.
#[derive(Debug, Clone)]
pub struct SectionOutput {
    pub section: Section,
    pub data_files: Vec<DataFile>,
    /// Machine readable results, added to `report.json` under the section anchor.
    pub metrics: Option<Value>,
}

impl SectionOutput {
    fn new(section: Section) -> Self {
        SectionOutput {
            section,
            data_files: Vec::new(),
            metrics: None,
        }
    }
}

/// Report sections in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum ReportSection {
    #[strum(to_string = "Data Generation Information")]
    GeneralInformation,
    #[strum(to_string = "Assessment Summary")]
    Conclusion,
    #[strum(to_string = "Pre-alignment Quality Control")]
    PreAlignmentQc,
    #[strum(to_string = "Post-alignment Quality Control")]
    PostAlignmentQc,
    #[strum(to_string = "Variant Calling Quality Control")]
    VariantCallingQc,
    #[strum(to_string = "Supplementary")]
    Supplementary,
}

impl ReportSection {
    pub fn anchor(self) -> &'static str {
        match self {
            ReportSection::GeneralInformation => "general_information",
            ReportSection::Conclusion => "conclusion",
            ReportSection::PreAlignmentQc => "pre_alignment_qc",
            ReportSection::PostAlignmentQc => "post_alignment_qc",
            ReportSection::VariantCallingQc => "variant_calling_qc",
            ReportSection::Supplementary => "supplementary",
        }
    }

    fn section(self, description: &str) -> Section {
        Section::new(self.anchor(), self, description)
    }

    /// Build the section, or `None` when its inputs are absent.
    pub fn build(self, inputs: &ReportInputs, config: &ReportConfig) -> Option<SectionOutput> {
        let output = match self {
            ReportSection::GeneralInformation => general_information::build(self, inputs),
            ReportSection::Conclusion => conclusion::build(self, inputs, config),
            ReportSection::PreAlignmentQc => summary_metrics::build_pre_alignment(self, inputs),
            ReportSection::PostAlignmentQc => summary_metrics::build_post_alignment(self, inputs),
            ReportSection::VariantCallingQc => variant_calling::build(self, inputs),
            ReportSection::Supplementary => Some(supplementary::build(self, config)),
        };
        if output.is_none() {
            debug!("skipping section '{self}': no input");
        }
        output
    }
}
