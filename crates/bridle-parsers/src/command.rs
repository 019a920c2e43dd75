//! External tool invocation for scheduler backends.

use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Error type for tool invocation.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The tool could not be spawned at all.
    #[error("failed to execute {command}: {error}")]
    Execution { command: String, error: String },
    /// The tool ran and exited non-zero; carries its stderr.
    #[error("{command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

/// Resolves scheduler tool paths from a configured installation root.
///
/// Resolution happens once, at adapter construction. An empty root leaves
/// tool names bare so the default search path applies.
#[derive(Debug, Clone)]
pub struct Toolchain {
    root: Utf8PathBuf,
}

impl Toolchain {
    pub fn new(install_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: install_root.into(),
        }
    }

    /// Path used to spawn `tool`.
    pub fn resolve(&self, tool: &str) -> Utf8PathBuf {
        if self.root.as_str().is_empty() {
            Utf8PathBuf::from(tool)
        } else {
            self.root.join("bin").join(tool)
        }
    }
}

/// Per-invocation settings beyond the argument list.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Extra environment entries layered over the inherited environment.
    pub env: Vec<(String, String)>,
    /// Text piped to the tool's stdin (job scripts). `None` closes stdin.
    pub stdin: Option<String>,
    pub working_dir: Option<Utf8PathBuf>,
}

/// Captured result of a completed invocation, success or not.
#[derive(Debug)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run a tool to completion and return its captured streams regardless of
/// exit status.
///
/// Some tools signal ordinary outcomes through a non-zero exit (an
/// accounting query for an id it has no record of); callers of this
/// variant inspect the captured streams themselves.
pub async fn invoke_raw(
    program: &Utf8Path,
    args: &[&str],
    options: &Invocation,
) -> Result<RawOutput, CommandError> {
    let mut cmd = Command::new(program.as_std_path());
    cmd.args(args);
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir.as_std_path());
    }
    cmd.stdin(if options.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| CommandError::Execution {
        command: program.to_string(),
        error: e.to_string(),
    })?;

    if let Some(input) = &options.stdin {
        // Dropping the pipe after the write is what delivers EOF.
        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(input.as_bytes())
                .await
                .map_err(|e| CommandError::Execution {
                    command: program.to_string(),
                    error: e.to_string(),
                })?;
        }
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| CommandError::Execution {
            command: program.to_string(),
            error: e.to_string(),
        })?;

    Ok(RawOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    })
}

/// Run a tool to completion and return its stdout.
///
/// Non-zero exit never yields stdout: the captured stderr is carried in
/// [`CommandError::Failed`] instead. No timeout or retry is applied here,
/// so a hung tool blocks the awaiting caller; bounding latency is a
/// caller-side concern.
pub async fn invoke(
    program: &Utf8Path,
    args: &[&str],
    options: &Invocation,
) -> Result<String, CommandError> {
    let output = invoke_raw(program, args, options).await?;
    if !output.success {
        return Err(CommandError::Failed {
            command: program.to_string(),
            stderr: output.stderr,
        });
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invoke_captures_stdout() {
        let result = invoke(
            Utf8Path::new("echo"),
            &["hello"],
            &Invocation::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.trim(), "hello");
    }

    #[tokio::test]
    async fn test_invoke_nonzero_exit_carries_stderr() {
        let result = invoke(
            Utf8Path::new("sh"),
            &["-c", "echo broken >&2; exit 3"],
            &Invocation::default(),
        )
        .await;
        match result {
            Err(CommandError::Failed { stderr, .. }) => {
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_missing_binary() {
        let result = invoke(
            Utf8Path::new("nonexistent_tool_5150"),
            &[],
            &Invocation::default(),
        )
        .await;
        assert!(matches!(result, Err(CommandError::Execution { .. })));
    }

    #[tokio::test]
    async fn test_invoke_pipes_stdin() {
        let options = Invocation {
            stdin: Some("#!/bin/sh\nsleep 1\n".to_string()),
            ..Invocation::default()
        };
        let result = invoke(Utf8Path::new("cat"), &[], &options).await.unwrap();
        assert_eq!(result, "#!/bin/sh\nsleep 1\n");
    }

    #[tokio::test]
    async fn test_invoke_applies_env() {
        let options = Invocation {
            env: vec![("BRIDLE_TEST_CELL".to_string(), "hpc-a".to_string())],
            ..Invocation::default()
        };
        let result = invoke(
            Utf8Path::new("sh"),
            &["-c", "printf %s \"$BRIDLE_TEST_CELL\""],
            &options,
        )
        .await
        .unwrap();
        assert_eq!(result, "hpc-a");
    }

    #[tokio::test]
    async fn test_invoke_applies_working_dir() {
        let options = Invocation {
            working_dir: Some(Utf8PathBuf::from("/tmp")),
            ..Invocation::default()
        };
        let result = invoke(Utf8Path::new("pwd"), &[], &options).await.unwrap();
        assert_eq!(result.trim(), "/tmp");
    }

    #[tokio::test]
    async fn test_invoke_raw_reports_failure_without_error() {
        let output = invoke_raw(
            Utf8Path::new("sh"),
            &["-c", "echo partial; exit 1"],
            &Invocation::default(),
        )
        .await
        .unwrap();
        assert!(!output.success);
        assert_eq!(output.stdout.trim(), "partial");
    }

    #[test]
    fn test_toolchain_resolution() {
        let bare = Toolchain::new("");
        assert_eq!(bare.resolve("qstat"), Utf8PathBuf::from("qstat"));

        let rooted = Toolchain::new("/opt/sge");
        assert_eq!(
            rooted.resolve("qstat"),
            Utf8PathBuf::from("/opt/sge/bin/qstat")
        );
    }
}
