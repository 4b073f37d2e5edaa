// Warning groups (as of rust 1.55)
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]

pub mod cromwell;
pub mod logging;
pub mod utils;
pub mod workflow;

use anyhow::Result;
use log::info;
use std::path::Path;
use std::process::{ExitCode, ExitStatus};
use workflow::{render_workflow, Assay, WorkflowConfig, WorkflowInputs};

/// Convert something to an ExitCode.
trait IntoExitCode {
    fn into_exit_code(self) -> ExitCode;
}

impl IntoExitCode for ExitStatus {
    /// Convert an ExitStatus to an ExitCode.
    fn into_exit_code(self) -> ExitCode {
        self.code()
            .map_or(ExitCode::FAILURE, |x| ExitCode::from(x as u8))
    }
}

/// Render the WGS or WES workflow into `output_dir` and hand it to Cromwell.
/// Args:
///  - `assay`: selects the workflow template.
///  - `inputs`: the values substituted into the template's `inputs` file.
///  - `output_dir`: receives the rendered workflow and serves as the workflow root.
///  - `dry_run`: render and print the Cromwell command but don't run it.
pub fn execute(
    config: &WorkflowConfig,
    assay: Assay,
    inputs: &WorkflowInputs,
    output_dir: &Path,
    dry_run: bool,
) -> Result<ExitCode> {
    let template_dir = config.template_dir(assay);
    info!("rendering the {assay} workflow from {}", template_dir.display());
    let rendered = render_workflow(template_dir, output_dir, inputs)?;
    cromwell::run(config, &rendered, output_dir, dry_run)
}
