use crate::workflow::{RenderedWorkflow, WorkflowConfig};
use crate::IntoExitCode;
use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitCode};

/// The `java -jar cromwell.jar run` invocation for a rendered workflow.
pub fn command(config: &WorkflowConfig, workflow: &RenderedWorkflow, workflow_root: &Path) -> Command {
    let mut cmd = Command::new(&config.java);
    cmd.arg(format!("-Dconfig.file={}", config.cromwell_config.display()))
        .arg("-jar")
        .arg(&config.cromwell_jar)
        .arg("run")
        .arg(&workflow.workflow)
        .arg("-i")
        .arg(&workflow.inputs)
        .arg("-p")
        .arg(&workflow.tasks)
        .arg("--workflow-root")
        .arg(workflow_root);
    cmd
}

/// The command as it would be typed in a shell.
pub fn command_line(cmd: &Command) -> String {
    let quote = |s: &OsStr| shell_escape::escape(Cow::Owned(s.to_string_lossy().into_owned()));
    std::iter::once(quote(cmd.get_program()))
        .chain(cmd.get_args().map(quote))
        .join(" ")
}

/// Run Cromwell on a rendered workflow and pass its exit code through.
pub fn run(
    config: &WorkflowConfig,
    workflow: &RenderedWorkflow,
    workflow_root: &Path,
    dry_run: bool,
) -> Result<ExitCode> {
    let mut cmd = command(config, workflow, workflow_root);
    let line = command_line(&cmd);

    if dry_run {
        println!("Dry Run Mode");
        println!();
        println!("cromwell command: {line}");
        println!("workflow directory: {:?}", workflow.dir);
        return Ok(ExitCode::SUCCESS);
    }

    info!(
        "Run workflow and output results to {}",
        workflow_root.display()
    );
    Ok(cmd
        .status()
        .with_context(|| format!("running {line}"))?
        .into_exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn rendered() -> RenderedWorkflow {
        let dir = PathBuf::from("/out/dseqc");
        RenderedWorkflow {
            inputs: dir.join("inputs"),
            workflow: dir.join("workflow.wdl"),
            tasks: dir.join("tasks.zip"),
            dir,
        }
    }

    #[test]
    fn test_command_line() {
        let cmd = command(&WorkflowConfig::default(), &rendered(), Path::new("/out"));
        assert_eq!(
            command_line(&cmd),
            "java -Dconfig.file=/venv/cromwell-local.conf -jar /venv/share/cromwell/cromwell.jar \
             run /out/dseqc/workflow.wdl -i /out/dseqc/inputs -p /out/dseqc/tasks.zip \
             --workflow-root /out"
        );
    }

    #[test]
    fn test_command_line_quotes() {
        let config = WorkflowConfig {
            cromwell_jar: PathBuf::from("/opt/my tools/cromwell.jar"),
            ..Default::default()
        };
        let line = command_line(&command(&config, &rendered(), Path::new("/out")));
        assert!(line.contains("-jar '/opt/my tools/cromwell.jar' run"));
    }

    #[test]
    fn test_dry_run_does_not_launch() {
        let config = WorkflowConfig {
            java: PathBuf::from("/nonexistent/java"),
            ..Default::default()
        };
        assert!(run(&config, &rendered(), Path::new("/out"), true).is_ok());
        assert!(run(&config, &rendered(), Path::new("/out"), false).is_err());
    }
}
