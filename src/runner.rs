//! Blocking runner for external tools.
//!
//! Every invocation appends the full command line to the stage log, then
//! runs the tool with stderr merged into stdout and both appended to the
//! same log. The pipeline is a linear chain, so the runner deliberately
//! blocks until the child exits; any parallelism lives inside the tools
//! themselves via their thread-count flags.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{PipelineError, Result};

/// Extra settings for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct CmdOptions {
    /// Working directory for the child process.
    pub current_dir: Option<PathBuf>,
}

/// Run `tokens` (executable followed by its arguments), appending the
/// command line and all output to `log_path`. Nonzero exit and launch
/// failure both abort the run with the captured output attached.
pub fn run_cmd<S: AsRef<str>>(tokens: &[S], log_path: &Path, options: &CmdOptions) -> Result<()> {
    let command_line = tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    let mut log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    log::info!("executing \"{}\"", command_line);
    writeln!(log_file, "executing \"{}\"", command_line)?;

    let mut command = Command::new(tokens[0].as_ref());
    command
        .args(tokens[1..].iter().map(|t| t.as_ref()))
        .stdout(Stdio::from(log_file.try_clone()?))
        .stderr(Stdio::from(log_file));

    if let Some(dir) = &options.current_dir {
        command.current_dir(dir);
    }

    let status = command
        .status()
        .map_err(|source| PipelineError::CommandLaunch {
            command: command_line.clone(),
            source,
        })?;

    if !status.success() {
        let output = std::fs::read_to_string(log_path).unwrap_or_default();
        return Err(PipelineError::CommandFailed {
            command: command_line,
            status,
            output,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn logs_command_and_output() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("log");

        run_cmd(&["sh", "-c", "echo hello"], &log_path, &CmdOptions::default()).unwrap();

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("executing \"sh -c echo hello\""));
        assert!(log.contains("hello"));
    }

    #[test]
    fn appends_across_invocations() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("log");

        run_cmd(&["sh", "-c", "echo one"], &log_path, &CmdOptions::default()).unwrap();
        run_cmd(&["sh", "-c", "echo two"], &log_path, &CmdOptions::default()).unwrap();

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("one"));
        assert!(log.contains("two"));
    }

    #[test]
    fn nonzero_exit_carries_output() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("log");

        let err = run_cmd(
            &["sh", "-c", "echo broken >&2; exit 3"],
            &log_path,
            &CmdOptions::default(),
        )
        .unwrap_err();

        match err {
            PipelineError::CommandFailed {
                command, output, ..
            } => {
                assert!(command.starts_with("sh -c"));
                assert!(output.contains("broken"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn launch_failure_is_typed() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("log");

        let err = run_cmd(
            &["definitely-not-a-real-executable"],
            &log_path,
            &CmdOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::CommandLaunch { .. }));
    }
}
