use crate::{
    deploy::{
        errors::RunError, precondition, DeployMode, Deployer, DeploymentRun, FailurePolicy,
        RunConfig,
    },
    docker_actions::DockerPusher,
    faas_client::FxClient,
    stack::defs::Stack,
};
use anyhow::{anyhow, Error as AnyError, Ok, Result as AnyResult};
use std::path::{Path, PathBuf};

pub struct DeployOptions {
    pub config_file: PathBuf,
    pub gateway: Option<String>,
    pub registry: Option<String>,
    pub mode: DeployMode,
    pub verbose: bool,
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
}

/// Text printed for a failed command. Every error already includes its cause in
/// its own message, so only the outermost one is rendered.
pub fn error_message(error: &AnyError) -> String {
    error.to_string()
}

/// The token file wins over the token given directly.
pub async fn resolve_token(token: Option<String>, token_file: Option<&Path>) -> AnyResult<String> {
    if let Some(token_file) = token_file {
        let token = tokio::fs::read_to_string(token_file)
            .await
            .map_err(|error| {
                anyhow!("Failed to read token file {}: {}", token_file.display(), error)
            })?;
        return Ok(token.trim().to_string());
    }

    Ok(token.unwrap_or_default())
}

async fn load_run(
    config_file: &Path,
    gateway: Option<&str>,
    registry: Option<&str>,
    config: RunConfig,
) -> AnyResult<DeploymentRun> {
    let mut stack = Stack::load(config_file).await?;

    if let Some(registry) = registry.filter(|registry| !registry.is_empty()) {
        stack.override_registry(registry);
    }

    let gateway = stack.resolve_gateway(gateway);

    Ok(DeploymentRun {
        functions: stack.functions,
        config: RunConfig { gateway, ..config },
    })
}

pub async fn deploy(options: DeployOptions) -> AnyResult<()> {
    let config = RunConfig {
        mode: options.mode,
        min_replicas: options.min_replicas,
        max_replicas: options.max_replicas,
        failure_policy: options.failure_policy,
        ..RunConfig::default()
    };

    let run = load_run(
        &options.config_file,
        options.gateway.as_deref(),
        options.registry.as_deref(),
        config,
    )
    .await?;

    precondition::validate(&run).map_err(RunError::from)?;

    let token = resolve_token(options.token, options.token_file.as_deref()).await?;
    if token.is_empty() {
        tracing::warn!("No access token set");
    }

    let working_dir = std::env::current_dir()
        .map_err(|error| anyhow!("Failed to get current directory: {}", error))?;
    let deployer = Deployer::new(
        DockerPusher::new(working_dir, options.verbose),
        FxClient::new(),
        token,
    );

    tracing::info!(gateway = %run.config.gateway, functions = run.functions.len(), "Running with current config.");

    let report = deployer.run(&run).await?;

    tracing::info!(deployed = report.outcomes.len(), "All functions deployed.");

    Ok(())
}

pub async fn validate(
    config_file: PathBuf,
    gateway: Option<String>,
    mode: DeployMode,
    min_replicas: u32,
    max_replicas: u32,
) -> AnyResult<()> {
    let config = RunConfig {
        mode,
        min_replicas,
        max_replicas,
        ..RunConfig::default()
    };

    let run = load_run(&config_file, gateway.as_deref(), None, config).await?;

    precondition::validate(&run).map_err(RunError::from)?;

    for function in &run.functions {
        println!(
            "{}\t{}\t{}",
            function.name,
            function.image,
            crate::deploy::invocation_url(&run.config.gateway, &function.name)
        );
    }

    Ok(())
}
