use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use dotnet_devcert::providers::ConsoleInteraction;
use dotnet_devcert::{
    BuildOptions, DevCertConfig, DevCertSession, DotnetSdk, Providers, SecretsInit,
    TrustPromptMode, locate_tool,
};

// ============================================================================
// ERROR HANDLING STRATEGY
// ============================================================================
//
// CRITICAL I/O - Errors propagated with `?` operator:
//   • dotnet invocations, project file reads, config file reads
//   • User input: confirmation and password prompts
//
// DECORATIVE I/O - Errors ignored with `let _ =`:
//   • Terminal coloring and status lines written through termcolor
//
// A closed or redirected stdout must not abort a certificate workflow that
// has already modified the trust store.
// ============================================================================

#[derive(Parser)]
#[command(name = "dotnet-devcert")]
#[command(version, about = "Provision a trusted ASP.NET Core development certificate")]
struct Cli {
    /// Path to config file (TOML)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// dotnet executable (overrides the config file)
    #[arg(long, global = true)]
    tool: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run `dotnet msbuild` on a project
    Build {
        project: PathBuf,

        /// MSBuild target
        #[arg(long, short = 't')]
        target: Option<String>,

        /// MSBuild property as KEY=VALUE (repeatable)
        #[arg(long = "property", short = 'p', value_parser = parse_property)]
        properties: Vec<(String, String)>,

        /// Print the command line instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the installed .NET SDK version
    Version,

    /// Create a user-secrets store for a project if it has none
    InitSecrets { project: PathBuf },

    /// Trust and export the development certificate for one or more projects
    Trust {
        #[arg(required = true)]
        projects: Vec<PathBuf>,

        /// Run the trust command in this terminal instead of relaying a password
        #[arg(long)]
        terminal: bool,

        /// Export even when a .pfx already exists
        #[arg(long)]
        force_export: bool,

        /// Trust without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Print host folders holding exported certificates and user secrets
    Folders,

    /// Show the effective configuration
    ShowConfig,
}

fn parse_property(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DevCertConfig::load(path).await?,
        None => DevCertConfig::default(),
    };
    if let Some(tool) = cli.tool {
        config.tool = tool;
    }

    let mut providers = Providers::system();

    match cli.command {
        Commands::Build {
            project,
            target,
            properties,
            dry_run,
        } => {
            let options = BuildOptions {
                target,
                properties: properties.into_iter().collect(),
            };
            let sdk = DotnetSdk::from_config(config, providers)?;
            if dry_run {
                println!("{}", sdk.build_command(&project, &options));
                return Ok(());
            }
            locate_tool(sdk.command().tool())?;
            let output = sdk.build(&project, &options).await?;
            print!("{output}");
            Ok(())
        }
        Commands::Version => {
            let sdk = DotnetSdk::from_config(config, providers)?;
            match sdk.version().await {
                Some(version) => {
                    println!("{version}");
                    Ok(())
                }
                None => anyhow::bail!("Could not determine the .NET SDK version"),
            }
        }
        Commands::InitSecrets { project } => {
            let sdk = DotnetSdk::from_config(config, providers)?;
            locate_tool(sdk.command().tool())?;
            match sdk.init_user_secrets(&project).await? {
                SecretsInit::AlreadyConfigured => {
                    dotnet_devcert::success!("{} already has a user-secrets id", project.display())
                }
                SecretsInit::Initialized(id) => {
                    dotnet_devcert::success!("User secrets initialized with id {id}")
                }
                SecretsInit::UnsupportedSdk(_) => {}
            }
            Ok(())
        }
        Commands::Trust {
            projects,
            terminal,
            force_export,
            yes,
        } => {
            if terminal {
                config.trust_prompt = TrustPromptMode::Terminal;
            }
            config.always_export |= force_export;
            providers.ui = std::sync::Arc::new(ConsoleInteraction { assume_yes: yes });

            let sdk = DotnetSdk::from_config(config, providers)?;
            locate_tool(sdk.command().tool())?;
            run_trust(&sdk, &projects).await
        }
        Commands::Folders => {
            let sdk = DotnetSdk::from_config(config, providers)?;
            let folders = sdk.folders();
            println!("certificates:  {}", folders.certificate_folder.display());
            println!("user secrets:  {}", folders.user_secrets_folder.display());
            Ok(())
        }
        Commands::ShowConfig => {
            let sdk = DotnetSdk::from_config(config, providers)?;
            show_config(&sdk);
            Ok(())
        }
    }
}

async fn run_trust(sdk: &DotnetSdk, projects: &[PathBuf]) -> Result<()> {
    let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
    let mut buffer = bufwtr.buffer();
    let _ = writeln!(&mut buffer, "{}", "=".repeat(60));
    let _ = writeln!(&mut buffer, "🔐 ASP.NET Core development certificate");
    let _ = writeln!(&mut buffer, "Platform: {}", std::env::consts::OS);
    let _ = writeln!(
        &mut buffer,
        "Trust mode: {}",
        sdk.config().trust_prompt.display_name()
    );
    let _ = writeln!(&mut buffer, "{}", "=".repeat(60));
    let _ = bufwtr.print(&buffer);

    let mut session = DevCertSession::new();
    let mut configured = 0usize;
    for project in projects {
        if session.is_configured(project) {
            dotnet_devcert::info!("{} listed twice, skipping", project.display());
            continue;
        }
        dotnet_devcert::info!("Configuring {}", project.display());
        if let Err(e) = sdk.trust_and_export(&mut session, project).await {
            dotnet_devcert::error!("Failed to configure {}", project.display());
            return Err(e.into());
        }
        configured += 1;
    }

    let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
    let mut buffer = bufwtr.buffer();
    let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = writeln!(&mut buffer, "\n✅ {configured} project(s) configured");
    let _ = buffer.reset();
    let _ = writeln!(
        &mut buffer,
        "   Mount {} into containers to use the exported certificates",
        sdk.folders().certificate_folder.display()
    );
    let _ = bufwtr.print(&buffer);
    Ok(())
}

fn show_config(sdk: &DotnetSdk) {
    let config = sdk.config();
    let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
    let mut buffer = bufwtr.buffer();
    let _ = writeln!(&mut buffer, "📋 Current Configuration\n");
    let _ = writeln!(&mut buffer, "tool:                  {}", config.tool);
    let resolved = locate_tool(&config.tool)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "not found in PATH".to_string());
    let _ = writeln!(&mut buffer, "resolved tool:         {resolved}");
    let _ = writeln!(
        &mut buffer,
        "trust prompt:          {}",
        config.trust_prompt.display_name()
    );
    let timeout = config
        .terminal_timeout_secs
        .map_or_else(|| "none".to_string(), |s| format!("{s}s"));
    let _ = writeln!(&mut buffer, "terminal timeout:      {timeout}");
    let _ = writeln!(
        &mut buffer,
        "certificate folder:    {}",
        sdk.folders().certificate_folder.display()
    );
    let _ = writeln!(&mut buffer, "always export:         {}", config.always_export);
    let _ = bufwtr.print(&buffer);
}
