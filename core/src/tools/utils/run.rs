//! Subprocess execution utilities

use crate::error::Result;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration, Instant};
use tracing::debug;

/// Command execution options
#[derive(Debug, Clone)]
pub struct CommandOptions {
    pub timeout_seconds: Option<u64>,
    pub working_directory: Option<PathBuf>,
    pub environment: HashMap<String, String>,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            working_directory: None,
            environment: HashMap::new(),
        }
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
    pub timed_out: bool,
}

impl CommandResult {
    /// Whether the process ran to completion with exit code zero
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

/// Run `program` with `args` and capture its output.
///
/// Arguments are passed straight to the process, never through a shell.
/// Without a timeout the call waits for the process however long it takes.
pub async fn execute_command<I, S>(
    program: &str,
    args: I,
    options: CommandOptions,
) -> Result<CommandResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start_time = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    // Set working directory
    if let Some(working_dir) = &options.working_directory {
        cmd.current_dir(working_dir);
    }

    // Set environment variables
    for (key, value) in &options.environment {
        cmd.env(key, value);
    }

    // Configure stdio
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    cmd.kill_on_drop(true);

    debug!("Spawning {:?}", cmd.as_std());
    let mut child = cmd.spawn()?;

    let result = match options.timeout_seconds {
        Some(seconds) => {
            let timeout_duration = Duration::from_secs(seconds);
            match timeout(timeout_duration, execute_child(&mut child)).await {
                Ok(result) => result,
                Err(_) => {
                    // Kill the process if it's still running
                    let _ = child.kill().await;

                    return Ok(CommandResult {
                        exit_code: -1,
                        stdout: String::new(),
                        stderr: format!("Command timed out after {} seconds", seconds),
                        duration_ms: start_time.elapsed().as_millis() as u64,
                        timed_out: true,
                    });
                }
            }
        }
        None => execute_child(&mut child).await,
    };

    let (exit_code, stdout, stderr) = result?;
    let duration_ms = start_time.elapsed().as_millis() as u64;
    debug!("{} exited with code {} in {}ms", program, exit_code, duration_ms);

    Ok(CommandResult {
        exit_code,
        stdout,
        stderr,
        duration_ms,
        timed_out: false,
    })
}

/// Drain both pipes, then wait for the child to exit
async fn execute_child(child: &mut Child) -> Result<(i32, String, String)> {
    let stdout = child.stdout.take().ok_or("Failed to capture stdout")?;
    let stderr = child.stderr.take();

    let (stdout_result, stderr_result) = tokio::join!(read_all(Some(stdout)), read_all(stderr));
    let stdout_output = stdout_result?;
    let stderr_output = stderr_result?;

    let status = child.wait().await?;
    let exit_code = status.code().unwrap_or(-1);

    Ok((exit_code, stdout_output, stderr_output))
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buffer).await?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_command() {
        let result = execute_command("echo", ["Hello, World!"], CommandOptions::default())
            .await
            .unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "Hello, World!\n");
        assert!(result.success());
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let result = execute_command("echo", ["$HOME; rm -rf /"], CommandOptions::default())
            .await
            .unwrap();

        assert_eq!(result.stdout.trim(), "$HOME; rm -rf /");
    }

    #[tokio::test]
    async fn test_nonzero_exit_and_stderr() {
        let result = execute_command(
            "sh",
            ["-c", "echo broken >&2; exit 3"],
            CommandOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr.trim(), "broken");
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_command_timeout() {
        let options = CommandOptions {
            timeout_seconds: Some(1),
            ..Default::default()
        };

        let result = execute_command("sleep", ["5"], options).await.unwrap();

        assert!(result.timed_out);
        assert_eq!(result.exit_code, -1);
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_environment_and_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut environment = HashMap::new();
        environment.insert("PDFX_GREETING".to_string(), "hi".to_string());
        let options = CommandOptions {
            working_directory: Some(dir.path().to_path_buf()),
            environment,
            ..Default::default()
        };

        let result = execute_command("sh", ["-c", "echo $PDFX_GREETING; pwd"], options)
            .await
            .unwrap();

        let mut lines = result.stdout.lines();
        assert_eq!(lines.next(), Some("hi"));
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(
            pwd.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_spawn() {
        let result = execute_command(
            "pdfx-definitely-not-a-program",
            Vec::<String>::new(),
            CommandOptions::default(),
        )
        .await;

        assert!(result.is_err());
    }
}
