//! Collaborator ports consumed by the dotnet façade
//!
//! # Module Organization
//!
//! - `process` - `tokio::process` backed [`ProcessProvider`]
//! - `fs` - `tokio::fs` backed [`FileSystemProvider`]
//! - `os` - compile-time [`OsProvider`]
//! - `console` - terminal-host [`UserInteraction`]
//!
//! The workflow only sees the traits, so hosts with their own UI (an editor,
//! a daemon) plug in their own implementations.

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub mod console;
pub mod fs;
pub mod os;
pub mod process;

pub use console::ConsoleInteraction;
pub use fs::LocalFileSystem;
pub use os::SystemOs;
pub use process::TokioProcessProvider;

/// Reacts to output from a running process.
///
/// Every stdout/stderr chunk is passed in as it arrives. Returning `Some(line)`
/// writes `line` plus the platform line terminator to the child's stdin.
#[async_trait]
pub trait OutputResponder: Send + Sync {
    async fn on_output(&self, chunk: &str) -> Result<Option<String>>;
}

/// Per-invocation process options
#[derive(Clone, Default)]
pub struct ExecOptions {
    pub responder: Option<Arc<dyn OutputResponder>>,
}

impl ExecOptions {
    #[must_use]
    pub fn with_responder(responder: Arc<dyn OutputResponder>) -> Self {
        Self {
            responder: Some(responder),
        }
    }
}

impl std::fmt::Debug for ExecOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecOptions")
            .field("responder", &self.responder.is_some())
            .finish()
    }
}

/// Runs shell command lines
#[async_trait]
pub trait ProcessProvider: Send + Sync {
    /// Run `command` to completion and return its stdout.
    ///
    /// A non-zero exit yields [`crate::error::DevCertError::Exec`].
    async fn execute(&self, command: &str, options: ExecOptions) -> Result<String>;
}

#[async_trait]
pub trait FileSystemProvider: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<String>;
    async fn file_exists(&self, path: &Path) -> Result<bool>;
    async fn delete_file(&self, path: &Path) -> Result<()>;
}

/// Discrete host operating system category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Mac,
    Linux,
}

impl HostOs {
    /// Only Windows and macOS have a central store `dev-certs` can trust into
    #[must_use]
    pub fn has_trust_store(self) -> bool {
        matches!(self, Self::Windows | Self::Mac)
    }

    #[must_use]
    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

pub trait OsProvider: Send + Sync {
    fn os(&self) -> HostOs;
}

/// Host UI used by the trust workflow
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Modal prompt offering `action`; `true` when the user picks it
    async fn confirm(&self, message: &str, action: &str) -> Result<bool>;

    /// Masked input; `None` when the user dismisses the prompt
    async fn input_password(&self, prompt: &str) -> Result<Option<String>>;

    /// Run `command` in an interactive terminal, resolving once it closes
    async fn run_in_terminal(&self, title: &str, command: &str) -> Result<()>;
}

/// The full set of collaborators
#[derive(Clone)]
pub struct Providers {
    pub process: Arc<dyn ProcessProvider>,
    pub fs: Arc<dyn FileSystemProvider>,
    pub os: Arc<dyn OsProvider>,
    pub ui: Arc<dyn UserInteraction>,
}

impl Providers {
    /// Real process, filesystem, OS and console implementations
    #[must_use]
    pub fn system() -> Self {
        Self {
            process: Arc::new(TokioProcessProvider),
            fs: Arc::new(LocalFileSystem),
            os: Arc::new(SystemOs),
            ui: Arc::new(ConsoleInteraction::default()),
        }
    }
}
