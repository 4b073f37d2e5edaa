//! Rendering of the Quartet WGS/WES workflow templates.
//!
//! A template directory holds an `inputs` file with `{{ key }}`
//! placeholders, the top-level `workflow.wdl` and a `tasks/` directory of
//! imported WDL files. Rendering fills the placeholders, copies the workflow
//! and packs `tasks/` into the `tasks.zip` Cromwell expects as `-p`.

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use itertools::Itertools;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use strum_macros::Display;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Rendered workflows are written to `<output>/dseqc`.
pub const PROJECT_NAME: &str = "dseqc";
pub const INPUTS_FILE: &str = "inputs";
pub const WORKFLOW_FILE: &str = "workflow.wdl";
pub const TASKS_DIR: &str = "tasks";
pub const TASKS_ZIP: &str = "tasks.zip";

const BENCHMARKING_REGION: &str = "Quartet.high.confidence.region.v202103.bed";
const REFERENCE_DICT: &str = "GRCh38.d1.vd1.dict";

/// The four Quartet samples, in the order the CLI takes them.
pub const SAMPLES: [&str; 4] = ["D5", "D6", "F7", "M8"];

/// Where the workflow engine and the templates are installed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    pub java: PathBuf,
    pub cromwell_jar: PathBuf,
    pub cromwell_config: PathBuf,
    pub wgs_template: PathBuf,
    pub wes_template: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            java: PathBuf::from("java"),
            cromwell_jar: PathBuf::from("/venv/share/cromwell/cromwell.jar"),
            cromwell_config: PathBuf::from("/venv/cromwell-local.conf"),
            wgs_template: PathBuf::from("/venv/wgs-workflow"),
            wes_template: PathBuf::from("/venv/wes-workflow"),
        }
    }
}

impl WorkflowConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Unable to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid workflow config {}", path.display()))
    }

    pub fn template_dir(&self, assay: Assay) -> &Path {
        match assay {
            Assay::Wgs => &self.wgs_template,
            Assay::Wes => &self.wes_template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Assay {
    #[strum(serialize = "WGS")]
    Wgs,
    #[strum(serialize = "WES")]
    Wes,
}

impl Assay {
    /// WES when a capture region is given.
    pub fn from_bed_file(bed_file: Option<&Path>) -> Self {
        if bed_file.is_some() {
            Assay::Wes
        } else {
            Assay::Wgs
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum Platform {
    #[value(name = "BGI")]
    #[strum(serialize = "BGI")]
    Bgi,
    #[default]
    #[value(name = "ILLUMINA")]
    #[strum(serialize = "ILLUMINA")]
    Illumina,
}

/// Options shared by the FASTQ and VCF entry points.
#[derive(Debug, Clone)]
pub struct SharedInputs<'a> {
    pub platform: Platform,
    pub bed_file: Option<&'a Path>,
    pub benchmarking_dir: &'a Path,
    pub reference_data_dir: &'a Path,
}

/// Values substituted into a template's `inputs` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowInputs(BTreeMap<String, String>);

impl WorkflowInputs {
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn shared(fastq_or_vcf: &str, shared: &SharedInputs<'_>) -> Self {
        let mut inputs = WorkflowInputs::default();
        inputs.insert("project_name", PROJECT_NAME);
        inputs.insert("fastq_or_vcf", fastq_or_vcf);
        inputs.insert("benchmarking_dir", shared.benchmarking_dir.display());
        inputs.insert(
            "benchmarking_region",
            shared.benchmarking_dir.join(BENCHMARKING_REGION).display(),
        );
        for key in ["dbsnp_dir", "dbmills_dir", "ref_dir"] {
            inputs.insert(key, shared.reference_data_dir.display());
        }
        inputs.insert(
            "reference_bed_dict",
            shared.reference_data_dir.join(REFERENCE_DICT).display(),
        );
        if let Some(bed) = shared.bed_file {
            inputs.insert("bed", bed.display());
        }
        inputs
    }

    /// Inputs of the workflow starting from paired-end reads, one
    /// (read 1, read 2) pair per sample in [`SAMPLES`] order.
    pub fn fastq(
        shared: &SharedInputs<'_>,
        reads: &[(PathBuf, PathBuf); 4],
        fastq_screen_dir: &Path,
        sentieon_server: &str,
    ) -> Self {
        let mut inputs = Self::shared("fastq", shared);
        inputs.insert("pl", shared.platform);
        inputs.insert("screen_ref_dir", fastq_screen_dir.display());
        inputs.insert("SENTIEON_LICENSE", sentieon_server);
        for (sample, (r1, r2)) in SAMPLES.iter().zip(reads) {
            inputs.insert(format!("fastq_1_{sample}"), r1.display());
            inputs.insert(format!("fastq_2_{sample}"), r2.display());
        }
        inputs
    }

    /// Inputs of the workflow starting from variant calls, one VCF per
    /// sample in [`SAMPLES`] order.
    pub fn vcf(shared: &SharedInputs<'_>, vcfs: &[PathBuf; 4]) -> Self {
        let mut inputs = Self::shared("vcf", shared);
        inputs.insert("platform", shared.platform);
        for (sample, vcf) in SAMPLES.iter().zip(vcfs) {
            inputs.insert(format!("vcf_{sample}"), vcf.display());
        }
        inputs
    }

    /// Replace every `{{ key }}` in `template`. Values are escaped for use
    /// inside a JSON string. A placeholder without a value is an error.
    pub fn render(&self, template: &str) -> Result<String> {
        let placeholder = Regex::new(r"\{\{[ \t]*([A-Za-z0-9_]+)[ \t]*\}\}")?;
        let missing = placeholder
            .captures_iter(template)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .filter(|key| !self.0.contains_key(*key))
            .unique()
            .collect_vec();
        ensure!(
            missing.is_empty(),
            "no value for the placeholder(s) {}",
            missing.join(", ")
        );

        let escaped: BTreeMap<&str, String> = self
            .0
            .iter()
            .map(|(k, v)| Ok((k.as_str(), json_escape(v)?)))
            .collect::<Result<_>>()?;
        Ok(placeholder
            .replace_all(template, |caps: &regex::Captures<'_>| {
                escaped.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned())
    }
}

fn json_escape(value: &str) -> Result<String> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}

/// Paths of a workflow rendered by [`render_workflow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWorkflow {
    pub dir: PathBuf,
    pub inputs: PathBuf,
    pub workflow: PathBuf,
    pub tasks: PathBuf,
}

/// Render `template_dir` into `<output_dir>/dseqc`.
pub fn render_workflow(
    template_dir: &Path,
    output_dir: &Path,
    inputs: &WorkflowInputs,
) -> Result<RenderedWorkflow> {
    ensure!(
        template_dir.is_dir(),
        "Cannot find the workflow {}, please contact the administrator.",
        template_dir.display()
    );
    let dir = output_dir.join(PROJECT_NAME);
    fs::create_dir_all(&dir).with_context(|| format!("Unable to create {}", dir.display()))?;

    let template_path = template_dir.join(INPUTS_FILE);
    let template = fs::read_to_string(&template_path)
        .with_context(|| format!("Unable to read {}", template_path.display()))?;
    let rendered = inputs
        .render(&template)
        .with_context(|| format!("rendering {}", template_path.display()))?;
    let inputs_path = dir.join(INPUTS_FILE);
    fs::write(&inputs_path, rendered)
        .with_context(|| format!("Unable to write {}", inputs_path.display()))?;

    let workflow = dir.join(WORKFLOW_FILE);
    fs::copy(template_dir.join(WORKFLOW_FILE), &workflow).with_context(|| {
        format!(
            "Unable to copy {}",
            template_dir.join(WORKFLOW_FILE).display()
        )
    })?;

    let tasks = dir.join(TASKS_ZIP);
    zip_tasks(template_dir, &tasks)?;

    Ok(RenderedWorkflow {
        dir,
        inputs: inputs_path,
        workflow,
        tasks,
    })
}

/// Pack `<template_dir>/tasks` into `dest`, entries named relative to the
/// template directory so that `import "tasks/x.wdl"` resolves.
fn zip_tasks(template_dir: &Path, dest: &Path) -> Result<()> {
    let tasks_dir = template_dir.join(TASKS_DIR);
    ensure!(
        tasks_dir.is_dir(),
        "The workflow template has no {} directory: {}",
        TASKS_DIR,
        template_dir.display()
    );
    let pattern = format!("{}/**/*", tasks_dir.display());
    let files: Vec<PathBuf> = glob::glob(&pattern)?.try_collect()?;

    let mut zip = ZipWriter::new(
        File::create(dest).with_context(|| format!("Unable to create {}", dest.display()))?,
    );
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for file in files.into_iter().filter(|p| p.is_file()).sorted() {
        let name = file
            .strip_prefix(template_dir)?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .join("/");
        debug!("adding {name} to {}", dest.display());
        zip.start_file(name, options)?;
        let mut reader =
            File::open(&file).with_context(|| format!("Unable to read {}", file.display()))?;
        std::io::copy(&mut reader, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}
