//! Charm-style CLI prompts using cliclack

use crate::config::CliConfig;
use crate::credentials::CredentialStore;
use crate::error::{FishError, FishResult};
use crate::exec::Executor;
use crate::hosting::HttpProviderFactory;
use crate::package::NpmInstaller;
use crate::product::ProductConfig;
use crate::prompt::{Choice, Prompter};
use crate::publish::{ProjectInfo, PublishOptions, PublishWorkflow};
use crate::registry::RegistryClient;
use crate::runtime::TokioProcessRunner;
use crate::vcs::GitCli;
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// `Prompter` rendered with cliclack
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackPrompter;

impl Prompter for ClackPrompter {
    fn select(
        &mut self,
        message: &str,
        choices: &[Choice],
        default: Option<&str>,
    ) -> FishResult<String> {
        let mut select = cliclack::select(message);
        for choice in choices {
            select = select.item(choice.value.clone(), &choice.label, "");
        }
        if let Some(default) = default {
            select = select.initial_value(default.to_string());
        }
        select.interact().map_err(FishError::Prompt)
    }

    fn input(&mut self, message: &str) -> FishResult<String> {
        cliclack::input(message)
            .required(false)
            .interact()
            .map_err(FishError::Prompt)
    }

    fn password(&mut self, message: &str) -> FishResult<String> {
        cliclack::password(message)
            .mask('▪')
            .interact()
            .map_err(FishError::Prompt)
    }

    fn confirm(&mut self, message: &str, default: bool) -> FishResult<bool> {
        cliclack::confirm(message)
            .initial_value(default)
            .interact()
            .map_err(FishError::Prompt)
    }

    fn info(&mut self, message: &str) -> FishResult<()> {
        cliclack::log::info(message).map_err(FishError::Prompt)
    }

    fn warning(&mut self, message: &str) -> FishResult<()> {
        cliclack::log::warning(message).map_err(FishError::Prompt)
    }

    fn success(&mut self, message: &str) -> FishResult<()> {
        cliclack::log::success(message).map_err(FishError::Prompt)
    }
}

/// Publish the project in `dir` interactively
pub async fn run_publish<C: ProductConfig>(
    product: &C,
    config: &CliConfig,
    dir: &Path,
    options: PublishOptions,
) -> Result<()> {
    cliclack::intro(format!("{} publish", product.display_name()))?;

    let project = ProjectInfo::from_dir(dir)?;
    cliclack::log::info(format!(
        "Project: {} {} ({})",
        project.name,
        project.version,
        dir.display()
    ))?;

    let store = CredentialStore::new(config.credentials_dir());
    let vcs = GitCli::new(dir);
    let providers = HttpProviderFactory::new(product.user_agent());
    let mut prompter = ClackPrompter;

    let outcome = PublishWorkflow::new(project, options, store, &mut prompter, &vcs, &providers)
        .run()
        .await?;

    if let Some(message) = &outcome.commit {
        cliclack::log::info(format!("Commit: {}", message))?;
    }
    cliclack::outro(format!(
        "{} repository ready: {}",
        outcome.provider, outcome.remote_url
    ))?;

    Ok(())
}

/// Prepare the package behind `command` and run it. Returns the child's exit code.
pub async fn run_command<C: ProductConfig>(
    product: &C,
    config: &CliConfig,
    command: &str,
    payload: &Value,
    cwd: &Path,
) -> Result<i32> {
    let package = product
        .command_package(command)
        .ok_or_else(|| anyhow::anyhow!("No package is registered for command '{}'", command))?;

    match &config.target_path {
        Some(path) => cliclack::log::info(format!("Using local package at {}", path.display()))?,
        None => cliclack::log::info(format!("Using registry {}", config.registry.url()))?,
    }

    let executor = Executor::new(
        config.clone(),
        Arc::new(RegistryClient::from_root(&config.registry, product.user_agent())),
        Arc::new(NpmInstaller),
        Arc::new(TokioProcessRunner),
    );

    let spinner = cliclack::spinner();
    spinner.start(format!("Preparing {}...", package));

    let prepared = match executor.prepare(package).await {
        Ok(prepared) => prepared,
        Err(e) => {
            spinner.stop(format!("Failed to prepare {}", package));
            return Err(e.into());
        }
    };

    spinner.stop(match &prepared.version {
        Some(version) => format!("{}@{}", prepared.name, version),
        None => format!("{} (local)", prepared.name),
    });

    Ok(executor.run(&prepared, payload, cwd).await?)
}
