//! Terminal-host implementation of [`UserInteraction`]

use super::UserInteraction;
use crate::error::{DevCertError, Result};
use crate::prompts::prompt_yes_no;
use async_trait::async_trait;
use dialoguer::Password;
use dialoguer::theme::ColorfulTheme;
use std::io::Write;
use std::process::Stdio;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Prompts on the controlling terminal.
///
/// Blocking stdin reads are moved onto the blocking pool. "Opening a terminal"
/// hands the current terminal to the child process until it exits.
#[derive(Debug, Clone, Default)]
pub struct ConsoleInteraction {
    /// Answer every confirmation with "yes" without reading stdin
    pub assume_yes: bool,
}

#[async_trait]
impl UserInteraction for ConsoleInteraction {
    async fn confirm(&self, message: &str, action: &str) -> Result<bool> {
        let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = writeln!(&mut buffer, "\n{message}");
        let _ = buffer.reset();
        let _ = bufwtr.print(&buffer);

        if self.assume_yes {
            return Ok(true);
        }

        let question = format!("{action}?");
        tokio::task::spawn_blocking(move || prompt_yes_no(&question))
            .await
            .map_err(|e| DevCertError::Other(e.into()))?
    }

    async fn input_password(&self, prompt: &str) -> Result<Option<String>> {
        let prompt = prompt.to_string();
        let password = tokio::task::spawn_blocking(move || {
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
        })
        .await
        .map_err(|e| DevCertError::Other(e.into()))?;

        match password {
            Ok(value) => Ok(Some(value)),
            // Ctrl+C / closed terminal
            Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn run_in_terminal(&self, title: &str, command: &str) -> Result<()> {
        let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let _ = writeln!(&mut buffer, "\n{}", "━".repeat(60));
        let _ = buffer.set_color(ColorSpec::new().set_bold(true));
        let _ = writeln!(&mut buffer, "{title}");
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, "$ {command}");
        let _ = writeln!(&mut buffer, "{}", "━".repeat(60));
        let _ = bufwtr.print(&buffer);

        let mut cmd = if cfg!(windows) {
            let mut cmd = tokio::process::Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = tokio::process::Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        // Dropping the wait (timeout) kills the child with it
        let mut child = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;
        let status = child.wait().await?;

        // The terminal closing is the completion signal; its outcome is not
        if !status.success() {
            crate::warn!("Terminal command exited with {status}");
        }
        Ok(())
    }
}
