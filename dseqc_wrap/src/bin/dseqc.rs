//! dseqc
#![deny(missing_docs)]

use anyhow::{Context, Result};
use clap::{self, Parser};
use dseqc_wrap::logging::init_log;
use dseqc_wrap::utils::{
    report_error, validate_dir, validate_file, validate_r1_fastq, validate_r2_fastq,
    validate_vcf, InputPath,
};
use dseqc_wrap::workflow::{Assay, Platform, SharedInputs, WorkflowConfig, WorkflowInputs};
use dseqc_wrap::execute;
use qc_report::{run_report, ReportConfig};
use std::path::PathBuf;
use std::process::ExitCode;

const CMD: &str = "dseqc";

/// Quality control of Quartet DNA-seq (WGS/WES) data
#[derive(Parser, Debug)]
#[clap(name = CMD, version)]
struct Dseqc {
    #[clap(subcommand)]
    subcmd: SubCommand,
}

#[derive(Parser, Debug)]
enum SubCommand {
    /// Run the pipeline for DNA-Seq (WGS/WES) data starting from FASTQs.
    ///
    /// You need to specify the --bed-file argument if you want to analyze WES data.
    #[clap(name = "fq-workflow")]
    FqWorkflow(FqWorkflow),

    /// Run the pipeline for DNA-Seq (WGS/WES) data starting from VCFs.
    #[clap(name = "vcf-workflow")]
    VcfWorkflow(VcfWorkflow),

    /// Build the QC report for the results of a DNA-Seq pipeline run.
    #[clap(name = "report")]
    Report(Report),
}

/// Options shared by both workflows.
#[derive(Parser, Debug, Clone)]
struct WorkflowArgs {
    /// Which sequencing platform produced the data.
    #[clap(long, short = 'p', value_enum, default_value_t = Platform::Illumina)]
    platform: Platform,

    /// A bed file for your WES data.
    #[clap(long, short = 'b', value_name = "BED", value_parser = validate_file)]
    bed_file: Option<InputPath>,

    /// A directory which contains reference datasets for benchmarking.
    #[clap(long, short = 'B', value_name = "PATH", value_parser = validate_dir)]
    benchmarking_dir: InputPath,

    /// A directory which contains reference data files.
    #[clap(long, short = 'R', value_name = "PATH", value_parser = validate_dir)]
    reference_data_dir: InputPath,

    /// The output directory.
    #[clap(long, value_name = "PATH", value_parser = validate_dir)]
    output_dir: InputPath,

    /// TOML file locating Cromwell and the workflow templates.
    #[clap(long, value_name = "TOML", value_parser = validate_file)]
    workflow_config: Option<InputPath>,

    /// Render the workflow and print the Cromwell command without running it.
    #[clap(long)]
    dry: bool,
}

impl WorkflowArgs {
    fn shared(&self) -> SharedInputs<'_> {
        SharedInputs {
            platform: self.platform,
            bed_file: self.bed_file.as_deref(),
            benchmarking_dir: &self.benchmarking_dir,
            reference_data_dir: &self.reference_data_dir,
        }
    }

    fn execute(&self, inputs: &WorkflowInputs) -> Result<ExitCode> {
        let config = match &self.workflow_config {
            Some(path) => WorkflowConfig::from_toml_file(path)?,
            None => WorkflowConfig::default(),
        };
        let assay = Assay::from_bed_file(self.bed_file.as_deref());
        execute(&config, assay, inputs, &self.output_dir, self.dry)
    }
}

#[derive(Parser, Debug, Clone)]
struct FqWorkflow {
    /// D5 Read1 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r1_fastq)]
    d5_r1: InputPath,

    /// D5 Read2 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r2_fastq)]
    d5_r2: InputPath,

    /// D6 Read1 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r1_fastq)]
    d6_r1: InputPath,

    /// D6 Read2 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r2_fastq)]
    d6_r2: InputPath,

    /// F7 Read1 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r1_fastq)]
    f7_r1: InputPath,

    /// F7 Read2 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r2_fastq)]
    f7_r2: InputPath,

    /// M8 Read1 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r1_fastq)]
    m8_r1: InputPath,

    /// M8 Read2 File.
    #[clap(long, value_name = "FASTQ", value_parser = validate_r2_fastq)]
    m8_r2: InputPath,

    /// A directory which contains fastq_screen reference files.
    #[clap(long, short = 'F', value_name = "PATH", value_parser = validate_dir)]
    fastq_screen_dir: InputPath,

    /// A url for the Sentieon license server.
    #[clap(long, short = 'S', value_name = "URL")]
    sentieon_server: String,

    #[clap(flatten)]
    workflow: WorkflowArgs,
}

impl FqWorkflow {
    fn reads(&self) -> [(PathBuf, PathBuf); 4] {
        let pair = |r1: &InputPath, r2: &InputPath| (r1.to_path_buf(), r2.to_path_buf());
        [
            pair(&self.d5_r1, &self.d5_r2),
            pair(&self.d6_r1, &self.d6_r2),
            pair(&self.f7_r1, &self.f7_r2),
            pair(&self.m8_r1, &self.m8_r2),
        ]
    }
}

#[derive(Parser, Debug, Clone)]
struct VcfWorkflow {
    /// D5 VCF File.
    #[clap(long, value_name = "VCF", value_parser = validate_vcf)]
    vcf_d5: InputPath,

    /// D6 VCF File.
    #[clap(long, value_name = "VCF", value_parser = validate_vcf)]
    vcf_d6: InputPath,

    /// F7 VCF File.
    #[clap(long, value_name = "VCF", value_parser = validate_vcf)]
    vcf_f7: InputPath,

    /// M8 VCF File.
    #[clap(long, value_name = "VCF", value_parser = validate_vcf)]
    vcf_m8: InputPath,

    #[clap(flatten)]
    workflow: WorkflowArgs,
}

#[derive(Parser, Debug, Clone)]
struct Report {
    /// A directory which contains a series of results from the DNA-Seq pipeline.
    #[clap(long, short = 'd', value_name = "PATH", value_parser = validate_dir)]
    result_dir: InputPath,

    /// A directory which will store the output report.
    #[clap(long, short = 'o', value_name = "PATH")]
    output_dir: PathBuf,

    /// A directory with the Quartet reference datasets and historical
    /// batches. Overrides `reference_dir` of the config.
    #[clap(long, short = 'r', value_name = "PATH", value_parser = validate_dir)]
    reference_dir: Option<InputPath>,

    /// TOML file with report settings.
    #[clap(long, short = 'c', value_name = "TOML", value_parser = validate_file)]
    config: Option<InputPath>,
}

impl Report {
    fn config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_toml_file(path)?,
            None => ReportConfig::default(),
        };
        if let Some(dir) = &self.reference_dir {
            config.reference_dir = Some(dir.to_path_buf());
        }
        Ok(config)
    }

    fn execute(&self) -> Result<ExitCode> {
        let config = self.config()?;
        let outputs = run_report(&self.result_dir, &self.output_dir, &config).with_context(|| {
            format!(
                "building the report for {} in {}",
                self.result_dir,
                self.output_dir.display()
            )
        })?;
        println!("Report written to {}", outputs.html.display());
        Ok(ExitCode::SUCCESS)
    }
}

fn inner_main() -> Result<ExitCode> {
    init_log();
    let opts = Dseqc::parse();

    match opts.subcmd {
        SubCommand::FqWorkflow(c) => {
            let inputs = WorkflowInputs::fastq(
                &c.workflow.shared(),
                &c.reads(),
                &c.fastq_screen_dir,
                &c.sentieon_server,
            );
            c.workflow.execute(&inputs)
        }
        SubCommand::VcfWorkflow(c) => {
            let vcfs = [&c.vcf_d5, &c.vcf_d6, &c.vcf_f7, &c.vcf_m8].map(|p| p.to_path_buf());
            let inputs = WorkflowInputs::vcf(&c.workflow.shared(), &vcfs);
            c.workflow.execute(&inputs)
        }
        SubCommand::Report(r) => r.execute(),
    }
}

fn main() -> ExitCode {
    match inner_main() {
        Ok(exit_code) => exit_code,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli() {
        Dseqc::command().debug_assert();
    }

    #[test]
    fn test_report_config_override() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let opts = Dseqc::try_parse_from([
            CMD,
            "report",
            "-d",
            dir_str,
            "-o",
            dir_str,
            "--reference-dir",
            dir_str,
        ])
        .unwrap();
        let SubCommand::Report(report) = opts.subcmd else {
            panic!("expected the report subcommand");
        };
        let config = report.config().unwrap();
        assert_eq!(
            config.reference_dir.as_deref(),
            Some(Path::new(dir_str).canonicalize().unwrap().as_path())
        );
    }

    #[test]
    fn test_bad_fastq_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let fq = dir.path().join("D5.fastq.gz");
        std::fs::write(&fq, b"").unwrap();
        let err = Dseqc::try_parse_from([
            CMD,
            "fq-workflow",
            "--d5-r1",
            fq.to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("_R1.fastq.gz or _R1.fq.gz"));
    }
}
