//! `tokio::process` implementation of [`ProcessProvider`]
//!
//! Commands are full shell lines (`sh -c` / `cmd /C`). Stdout and stderr are
//! drained concurrently so a child blocked on a prompt written to either
//! stream can still be answered through stdin.

use super::{ExecOptions, OutputResponder, ProcessProvider};
use crate::error::{DevCertError, ExecError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::sync::mpsc;
use zeroize::Zeroize;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessProvider;

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

async fn forward<R>(mut reader: R, stream: Stream, tx: mpsc::UnboundedSender<(Stream, String)>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send((stream, chunk)).is_err() {
                    break;
                }
            }
        }
    }
}

async fn respond(
    responder: &Arc<dyn OutputResponder>,
    stdin: Option<&mut ChildStdin>,
    chunk: &str,
) -> Result<()> {
    let Some(mut reply) = responder.on_output(chunk).await? else {
        return Ok(());
    };

    let line_ending: &[u8] = if cfg!(windows) { b"\r\n" } else { b"\n" };
    let written = match stdin {
        Some(stdin) => {
            let result = async {
                stdin.write_all(reply.as_bytes()).await?;
                stdin.write_all(line_ending).await?;
                stdin.flush().await
            }
            .await;
            result.map_err(DevCertError::Io)
        }
        None => Ok(()),
    };

    reply.zeroize();
    written
}

#[async_trait]
impl ProcessProvider for TokioProcessProvider {
    async fn execute(&self, command: &str, options: ExecOptions) -> Result<String> {
        let mut cmd = shell_command(command);

        let stdin_mode = if options.responder.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = cmd
            .stdin(stdin_mode)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DevCertError::MissingDependency(format!(
                        "Shell not found while running `{command}`: {e}"
                    ))
                } else {
                    DevCertError::Io(e)
                }
            })?;

        let mut stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("stdout of `{command}` was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("stderr of `{command}` was not captured"))?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let stdout_task = tokio::spawn(forward(stdout, Stream::Stdout, tx.clone()));
        let stderr_task = tokio::spawn(forward(stderr, Stream::Stderr, tx));

        let mut captured_out = String::new();
        let mut captured_err = String::new();

        while let Some((stream, chunk)) = rx.recv().await {
            match stream {
                Stream::Stdout => captured_out.push_str(&chunk),
                Stream::Stderr => captured_err.push_str(&chunk),
            }

            if let Some(responder) = &options.responder {
                // Dropping `child` on error kills the process
                respond(responder, stdin.as_mut(), &chunk).await?;
            }
        }

        let _ = stdout_task.await;
        let _ = stderr_task.await;
        drop(stdin);

        let status = child.wait().await?;
        if status.success() {
            return Ok(captured_out);
        }

        let output = if captured_err.trim().is_empty() {
            captured_out
        } else {
            captured_err
        };
        Err(ExecError::new(command, status.code(), output).into())
    }
}
