//! fish CLI - Scaffold projects from template packages and publish them

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use fish_core::registry::update_advisory;
use fish_core::{
    CliConfig, FishError, PackageRegistry, ProductConfig, PublishOptions, RegistryClient,
    RegistryRoot,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// fish product configuration
#[derive(Clone)]
pub struct FishConfig;

impl ProductConfig for FishConfig {
    fn name(&self) -> &'static str {
        "fish"
    }

    fn display_name(&self) -> &'static str {
        "fish-cli-dev"
    }

    fn home_dir_name(&self) -> &'static str {
        ".fish-cli-dev"
    }

    fn command_package(&self, command: &str) -> Option<&'static str> {
        match command {
            "init" => Some("@fish-cli-dev/init"),
            _ => None,
        }
    }

    fn package_name(&self) -> &'static str {
        "@fish-cli-dev/core"
    }

    fn upgrade_command(&self) -> &'static str {
        "npm install -g @fish-cli-dev/core"
    }
}

#[derive(Parser, Debug)]
#[command(name = "fish")]
#[command(about = "CLI for scaffolding projects from template packages and publishing them")]
#[command(version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// CLI home directory (defaults to ~/.fish-cli-dev)
    #[arg(long, env = "FISH_CLI_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Local package directory to run instead of the cached one (for development use)
    #[arg(long = "target-path", env = "FISH_CLI_TARGET_PATH", global = true)]
    pub target_path: Option<PathBuf>,

    /// Query the upstream npm registry instead of the mirror
    #[arg(long = "original-registry", global = true)]
    pub original_registry: bool,

    /// Custom registry URL
    #[arg(long, global = true, conflicts_with = "original_registry")]
    pub registry: Option<Url>,

    /// Skip the newer version check
    #[arg(long = "skip-update-check", global = true)]
    pub skip_update_check: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project from the init template package
    Init(InitArgs),
    /// Create the remote repository and push the first commit
    Publish(PublishArgs),
}

#[derive(ClapArgs, Debug)]
pub struct InitArgs {
    /// Project name
    pub project_name: Option<String>,

    /// Initialize even if the directory is not empty
    #[arg(short, long)]
    pub force: bool,
}

#[derive(ClapArgs, Debug)]
pub struct PublishArgs {
    /// Select the hosting platform again
    #[arg(long = "refresh-server")]
    pub refresh_server: bool,

    /// Enter the API token again
    #[arg(long = "refresh-token")]
    pub refresh_token: bool,

    /// Select the repository owner again
    #[arg(long = "refresh-owner")]
    pub refresh_owner: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'D', long)]
    pub dir: Option<PathBuf>,
}

impl From<&PublishArgs> for PublishOptions {
    fn from(args: &PublishArgs) -> Self {
        PublishOptions {
            refresh_provider: args.refresh_server,
            refresh_token: args.refresh_token,
            refresh_owner: args.refresh_owner,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let result = run().await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(code) => ExitCode::from(exit_status(code)),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  {} {}", "caused by:".dimmed(), cause);
            }
            if let Some(hint) = e.downcast_ref::<FishError>().and_then(FishError::hint) {
                eprintln!("{} {}", "Hint:".yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<i32> {
    let args = Args::parse();
    let product = FishConfig;

    let level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "{name}={level},fish_core={level}",
            name = product.name()
        )))
        .with_target(false)
        .without_time()
        .init();

    let config = build_config(&product, &args)?;
    debug!(?config, "configuration");

    if !args.skip_update_check {
        check_for_update(&product, &config).await;
    }

    match &args.command {
        Command::Init(init) => {
            let payload = serde_json::json!([init.project_name, { "force": init.force }]);
            let cwd = std::env::current_dir().context("reading current directory")?;
            fish_core::run_command(&product, &config, "init", &payload, &cwd).await
        }
        Command::Publish(publish) => {
            let dir = match &publish.dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().context("reading current directory")?,
            };
            fish_core::run_publish(&product, &config, &dir, publish.into()).await?;
            Ok(0)
        }
    }
}

fn build_config<C: ProductConfig>(product: &C, args: &Args) -> Result<CliConfig> {
    let home = match &args.home {
        Some(home) => home.clone(),
        None => {
            let user_home = dirs::home_dir()
                .filter(|dir| dir.is_dir())
                .ok_or_else(|| FishError::Configuration {
                    path: PathBuf::from("~"),
                    reason: "user home directory does not exist".to_string(),
                })?;
            user_home.join(product.home_dir_name())
        }
    };

    let registry = match &args.registry {
        Some(url) => RegistryRoot::Custom(url.clone()),
        None => RegistryRoot::select(args.original_registry),
    };

    Ok(CliConfig::new(home)
        .with_target_path(args.target_path.clone())
        .with_registry(registry))
}

/// Print an advisory when a newer compatible release is published
async fn check_for_update<C: ProductConfig>(product: &C, config: &CliConfig) {
    let registry = RegistryClient::from_root(&config.registry, product.user_agent());
    match registry
        .newer_compatible_version(CLI_VERSION, product.package_name())
        .await
    {
        Ok(Some(newer)) => {
            let advisory = update_advisory(
                product.package_name(),
                CLI_VERSION,
                &newer,
                product.upgrade_command(),
            );
            eprintln!("{} {}", "Warning:".yellow().bold(), advisory);
        }
        Ok(None) => debug!("{} is up to date", product.package_name()),
        Err(e) => debug!(error = %e, "update check failed"),
    }
}

/// Child exit codes outside 0..=255 still report failure
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
