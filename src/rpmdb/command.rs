// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Runs external commands (`oc`, `rpm`) with a timeout and captured output.

use std::io::Read;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use wait_timeout::ChildExt;

/// Default timeout for a single `oc`/`rpm` invocation (5 minutes).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Command not found: {command}")]
    NotFound { command: String },
    #[error("Command failed to start: {command}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command timed out after {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },
    #[error("Command terminated by signal {signal}: {command}")]
    Signal { command: String, signal: i32 },
    #[error("I/O error while running command: {command}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run a command to completion, capturing stdout and stderr.
///
/// Both pipes are drained on reader threads so a chatty child cannot block on a
/// full pipe while we wait for it. If the timeout is reached, the process is killed.
/// The timeout also covers collecting the output: a background process that inherited
/// the pipes and keeps them open past the deadline is reported as a timeout.
///
/// # Errors
/// Returns an error if the command cannot be spawned, times out, is killed by a
/// signal, or its output cannot be read. A non-zero exit status is *not* an error;
/// callers inspect `Output::status`.
pub fn run_with_timeout(command: &mut Command, timeout: Duration) -> Result<Output, CommandError> {
    let start = Instant::now();
    let name = command.get_program().to_string_lossy().to_string();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CommandError::NotFound {
                    command: name.clone(),
                }
            } else {
                CommandError::SpawnFailed {
                    command: name.clone(),
                    source: e,
                }
            }
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = wait_with_timeout(&mut child, timeout, &name)?;

    let deadline = start + timeout;
    Ok(Output {
        status,
        stdout: collect(stdout, deadline, timeout, &name)?,
        stderr: collect(stderr, deadline, timeout, &name)?,
    })
}

/// Wait for a child process to complete with a timeout.
///
/// # Returns
/// - `Ok(ExitStatus)` if the process exited normally within the timeout
/// - `Err(CommandError::Timeout)` if the process timed out (it is killed)
/// - `Err(CommandError::Signal)` if the process was terminated by a signal
pub(crate) fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    command: &str,
) -> Result<ExitStatus, CommandError> {
    let waited = child.wait_timeout(timeout).map_err(|e| CommandError::Io {
        command: command.to_string(),
        source: e,
    })?;

    let Some(status) = waited else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(CommandError::Timeout {
            command: command.to_string(),
            timeout,
        });
    };

    match (status.code(), status.signal()) {
        (Some(_), _) => Ok(status),
        (None, Some(signal)) => Err(CommandError::Signal {
            command: command.to_string(),
            signal,
        }),
        (None, None) => Err(CommandError::Io {
            command: command.to_string(),
            source: std::io::Error::other("Unknown process termination"),
        }),
    }
}

type Reader = Option<Receiver<std::io::Result<Vec<u8>>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Reader {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = pipe.read_to_end(&mut buf).map(|_| buf);
            // The receiver is gone if the command already timed out.
            let _ = tx.send(result);
        });
        rx
    })
}

/// Wait for a reader thread until `deadline`.
fn collect(
    reader: Reader,
    deadline: Instant,
    timeout: Duration,
    command: &str,
) -> Result<Vec<u8>, CommandError> {
    let Some(rx) = reader else {
        return Ok(Vec::new());
    };
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(result) => result.map_err(|e| CommandError::Io {
            command: command.to_string(),
            source: e,
        }),
        Err(RecvTimeoutError::Timeout) => Err(CommandError::Timeout {
            command: command.to_string(),
            timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(CommandError::Io {
            command: command.to_string(),
            source: std::io::Error::other("output reader panicked"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let output = run_with_timeout(
            Command::new("sh").args(["-c", "echo hello"]),
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
    }

    #[test]
    fn test_non_zero_exit_is_not_an_error() {
        let output = run_with_timeout(
            Command::new("sh").args(["-c", "echo oops >&2; exit 3"]),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&output.stderr), "oops\n");
    }

    #[test]
    fn test_missing_command() {
        let result = run_with_timeout(
            &mut Command::new("rpm-verifier-no-such-command"),
            Duration::from_secs(10),
        );
        assert!(matches!(result, Err(CommandError::NotFound { .. })));
    }

    #[test]
    fn test_timeout_kills_process() {
        let result = run_with_timeout(Command::new("sleep").arg("5"), Duration::from_millis(100));
        match result {
            Err(CommandError::Timeout { command, timeout }) => {
                assert_eq!(command, "sleep");
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("Expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_output_held_open_by_background_process_times_out() {
        // `sh` exits at once, but `sleep` inherits stdout and keeps the pipe open.
        let start = Instant::now();
        let result = run_with_timeout(
            Command::new("sh").args(["-c", "sleep 5 & echo started"]),
            Duration::from_millis(500),
        );
        assert!(
            matches!(result, Err(CommandError::Timeout { .. })),
            "Expected timeout, got {result:?}"
        );
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
