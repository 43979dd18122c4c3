#![allow(dead_code)]

use async_trait::async_trait;
use dotnet_devcert::error::{DevCertError, ExecError, Result};
use dotnet_devcert::providers::{
    ExecOptions, FileSystemProvider, HostOs, OsProvider, ProcessProvider, Providers,
    UserInteraction,
};
use dotnet_devcert::{DevCertConfig, DotnetSdk, HostSecretsFolders};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const PROJECT: &str = "/src/web/web.csproj";
pub const CERT_DIR: &str = "/home/dev/.aspnet/https";
pub const PLAIN_PROJECT: &str = "<Project Sdk=\"Microsoft.NET.Sdk.Web\"></Project>";
pub const PROJECT_WITH_SECRETS: &str = "<Project Sdk=\"Microsoft.NET.Sdk.Web\">\
    <PropertyGroup><UserSecretsId>4f1c</UserSecretsId></PropertyGroup></Project>";

/// Ordered record of everything the fakes observed
#[derive(Clone, Default)]
pub struct Events(Arc<Mutex<Vec<String>>>);

impl Events {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, needle: &str) -> Option<usize> {
        self.all().iter().position(|e| e.contains(needle))
    }
}

#[derive(Clone)]
pub enum Scripted {
    Ok(String),
    Fail(i32),
    /// Feed each chunk to the responder, then succeed
    Prompts(Vec<String>),
    /// Create `path` in the fake filesystem, then fail
    PartialWriteThenFail { path: PathBuf, code: i32 },
}

pub struct FakeProcess {
    events: Events,
    fs: Arc<FakeFs>,
    rules: Mutex<Vec<(String, Scripted)>>,
    calls: Mutex<Vec<String>>,
    stdin: Mutex<Vec<String>>,
}

impl FakeProcess {
    /// Commands matching no rule succeed with empty output
    pub fn on(&self, needle: &str, response: Scripted) {
        self.rules.lock().unwrap().insert(0, (needle.to_string(), response));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_containing(&self, needle: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(needle))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn stdin_writes(&self) -> Vec<String> {
        self.stdin.lock().unwrap().clone()
    }

    fn script_for(&self, command: &str) -> Scripted {
        self.rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| command.contains(needle.as_str()))
            .map(|(_, s)| s.clone())
            .unwrap_or(Scripted::Ok(String::new()))
    }
}

#[async_trait]
impl ProcessProvider for FakeProcess {
    async fn execute(&self, command: &str, options: ExecOptions) -> Result<String> {
        self.calls.lock().unwrap().push(command.to_string());
        self.events.push(format!("exec {command}"));

        match self.script_for(command) {
            Scripted::Ok(output) => Ok(output),
            Scripted::Fail(code) => Err(ExecError::new(command, Some(code), "failed").into()),
            Scripted::Prompts(chunks) => {
                let responder = options.responder.expect("command expects a responder");
                for chunk in chunks {
                    if let Some(reply) = responder.on_output(&chunk).await? {
                        self.stdin.lock().unwrap().push(format!("{reply}\n"));
                    }
                }
                Ok(String::new())
            }
            Scripted::PartialWriteThenFail { path, code } => {
                self.fs.insert(&path, "partial");
                Err(ExecError::new(command, Some(code), "export failed").into())
            }
        }
    }
}

#[derive(Default)]
pub struct FakeFs {
    files: Mutex<HashMap<PathBuf, String>>,
    reads: Mutex<usize>,
    deleted: Mutex<Vec<PathBuf>>,
}

impl FakeFs {
    pub fn insert(&self, path: impl AsRef<Path>, contents: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), contents.to_string());
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.lock().unwrap().contains_key(path.as_ref())
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    pub fn deleted(&self) -> Vec<PathBuf> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSystemProvider for FakeFs {
    async fn read_file(&self, path: &Path) -> Result<String> {
        *self.reads.lock().unwrap() += 1;
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            DevCertError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                path.display().to_string(),
            ))
        })
    }

    async fn file_exists(&self, path: &Path) -> Result<bool> {
        Ok(self.contains(path))
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        self.files.lock().unwrap().remove(path);
        self.deleted.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub struct FakeOs(pub HostOs);

impl OsProvider for FakeOs {
    fn os(&self) -> HostOs {
        self.0
    }
}

pub enum TerminalBehavior {
    CloseImmediately,
    /// Stay open until `FakeUi::close_terminal` is called
    WaitForClose,
}

pub struct FakeUi {
    events: Events,
    accept_trust: Mutex<bool>,
    passwords: Mutex<VecDeque<Option<String>>>,
    confirmations: Mutex<usize>,
    password_prompts: Mutex<Vec<String>>,
    terminal_commands: Mutex<Vec<String>>,
    terminal: Mutex<TerminalBehavior>,
    closed: Notify,
}

impl FakeUi {
    pub fn accept_trust(&self, accept: bool) {
        *self.accept_trust.lock().unwrap() = accept;
    }

    pub fn queue_password(&self, password: Option<&str>) {
        self.passwords
            .lock()
            .unwrap()
            .push_back(password.map(str::to_string));
    }

    pub fn set_terminal(&self, behavior: TerminalBehavior) {
        *self.terminal.lock().unwrap() = behavior;
    }

    pub fn close_terminal(&self) {
        self.closed.notify_one();
    }

    pub fn confirmations(&self) -> usize {
        *self.confirmations.lock().unwrap()
    }

    pub fn password_prompts(&self) -> Vec<String> {
        self.password_prompts.lock().unwrap().clone()
    }

    pub fn terminal_commands(&self) -> Vec<String> {
        self.terminal_commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserInteraction for FakeUi {
    async fn confirm(&self, _message: &str, action: &str) -> Result<bool> {
        *self.confirmations.lock().unwrap() += 1;
        self.events.push(format!("confirm {action}"));
        Ok(*self.accept_trust.lock().unwrap())
    }

    async fn input_password(&self, prompt: &str) -> Result<Option<String>> {
        self.password_prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.passwords.lock().unwrap().pop_front().flatten())
    }

    async fn run_in_terminal(&self, _title: &str, command: &str) -> Result<()> {
        self.terminal_commands.lock().unwrap().push(command.to_string());
        self.events.push("terminal opened");

        let wait = matches!(*self.terminal.lock().unwrap(), TerminalBehavior::WaitForClose);
        if wait {
            self.closed.notified().await;
        }

        self.events.push("terminal closed");
        Ok(())
    }
}

pub struct Harness {
    pub events: Events,
    pub process: Arc<FakeProcess>,
    pub fs: Arc<FakeFs>,
    pub ui: Arc<FakeUi>,
    os: HostOs,
}

impl Harness {
    /// Fakes for `os` with a plain project file and SDK 8.0.100
    pub fn new(os: HostOs) -> Self {
        let events = Events::default();
        let fs = Arc::new(FakeFs::default());
        fs.insert(PROJECT, PLAIN_PROJECT);

        let process = Arc::new(FakeProcess {
            events: events.clone(),
            fs: Arc::clone(&fs),
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            stdin: Mutex::new(Vec::new()),
        });
        process.on("--version", Scripted::Ok("8.0.100\n".to_string()));

        let ui = Arc::new(FakeUi {
            events: events.clone(),
            accept_trust: Mutex::new(true),
            passwords: Mutex::new(VecDeque::new()),
            confirmations: Mutex::new(0),
            password_prompts: Mutex::new(Vec::new()),
            terminal_commands: Mutex::new(Vec::new()),
            terminal: Mutex::new(TerminalBehavior::CloseImmediately),
            closed: Notify::new(),
        });

        Self {
            events,
            process,
            fs,
            ui,
            os,
        }
    }

    pub fn sdk(&self) -> DotnetSdk {
        self.sdk_with(DevCertConfig::default())
    }

    pub fn sdk_with(&self, config: DevCertConfig) -> DotnetSdk {
        let providers = Providers {
            process: self.process.clone(),
            fs: self.fs.clone(),
            os: Arc::new(FakeOs(self.os)),
            ui: self.ui.clone(),
        };
        let folders = HostSecretsFolders::for_os(self.os, None, Path::new("/home/dev"));
        DotnetSdk::new(config, folders, providers)
    }

    pub fn project() -> PathBuf {
        PathBuf::from(PROJECT)
    }

    pub fn export_path() -> PathBuf {
        PathBuf::from(CERT_DIR).join("web.pfx")
    }
}
