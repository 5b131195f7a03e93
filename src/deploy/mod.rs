pub mod environment;
pub mod errors;
pub mod precondition;
pub mod request;

use crate::{
    consts::{
        DEFAULT_MAX_REPLICAS, DEFAULT_MIN_REPLICAS, GATEWAY_DEFAULT, INVOKE_PATH,
        REGISTRY_CREDENTIAL_SECRET,
    },
    docker_actions::PushError,
    faas_client::DeployError,
    request::functions::DeployRequest,
    stack::defs::FunctionSpec,
    util::gateway_host,
};
use errors::{FunctionError, RunError, StepError};
use std::fmt;
use tracing::{info_span, Instrument};

/// Pushes a function's image to its registry.
#[allow(async_fn_in_trait)]
pub trait ImagePusher {
    async fn push(&self, image: &str) -> Result<(), PushError>;
}

/// Submits a deploy request to the remote deployment service.
#[allow(async_fn_in_trait)]
pub trait FunctionSubmitter {
    async fn submit(&self, request: &DeployRequest, token: &str) -> Result<(), DeployError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeployMode {
    /// Roll forward existing instances
    pub update: bool,
    /// Remove and re-create existing instances
    pub replace: bool,
}

/// What to do with the remaining functions once one of them fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Stop at the first failing function. Already deployed functions stay deployed.
    #[default]
    Abort,
    /// Deploy every function and report each outcome.
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

/// Settings shared by every function of a run. Read-only once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub gateway: String,
    pub mode: DeployMode,
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub credential_secret: String,
    pub failure_policy: FailurePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gateway: String::from(GATEWAY_DEFAULT),
            mode: DeployMode::default(),
            min_replicas: DEFAULT_MIN_REPLICAS,
            max_replicas: DEFAULT_MAX_REPLICAS,
            credential_secret: String::from(REGISTRY_CREDENTIAL_SECRET),
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeploymentRun {
    /// Functions in declaration order
    pub functions: Vec<FunctionSpec>,
    pub config: RunConfig,
}

#[derive(Debug)]
pub enum FunctionOutcome {
    Deployed { function: String, endpoint: String },
    Failed(FunctionError),
}

/// Per-function outcomes of a run, in the order the functions were processed.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<FunctionOutcome>,
}

impl RunReport {
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FunctionOutcome::Deployed { endpoint, .. } => Some(endpoint.as_str()),
            FunctionOutcome::Failed(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = &FunctionError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FunctionOutcome::Failed(error) => Some(error),
            FunctionOutcome::Deployed { .. } => None,
        })
    }
}

/// `http://<gateway>/function/<name>`, with any configured scheme dropped from the gateway.
pub fn invocation_url(gateway: &str, function_name: &str) -> String {
    format!("http://{}{}/{}", gateway_host(gateway), INVOKE_PATH, function_name)
}

/// Pushes and deploys the functions of a run one after the other.
pub struct Deployer<P, S> {
    pusher: P,
    submitter: S,
    token: String,
}

impl<P: ImagePusher, S: FunctionSubmitter> Deployer<P, S> {
    pub fn new(pusher: P, submitter: S, token: String) -> Self {
        Self {
            pusher,
            submitter,
            token,
        }
    }

    pub async fn run(&self, run: &DeploymentRun) -> Result<RunReport, RunError> {
        precondition::validate(run)?;

        let config = &run.config;
        let mut report = RunReport::default();

        tracing::debug!(
            gateway = %config.gateway,
            functions = run.functions.len(),
            policy = %config.failure_policy,
            "Starting run."
        );

        for function in &run.functions {
            let span = info_span!("Function", function = %function.name);

            match self.deploy(function, config).instrument(span).await {
                Ok(endpoint) => report.outcomes.push(FunctionOutcome::Deployed {
                    function: function.name.clone(),
                    endpoint,
                }),
                Err(error) => {
                    let error = FunctionError {
                        function: function.name.clone(),
                        error,
                    };

                    match config.failure_policy {
                        FailurePolicy::Abort => return Err(RunError::Function(error)),
                        FailurePolicy::Continue => {
                            tracing::error!(%error, "Deployment failed. Continuing.");
                            report.outcomes.push(FunctionOutcome::Failed(error));
                        }
                    }
                }
            }
        }

        if report.failed().next().is_some() {
            return Err(RunError::Incomplete(report));
        }

        Ok(report)
    }

    /// Push, resolve environment, build, submit. Returns the invocation endpoint.
    async fn deploy(&self, function: &FunctionSpec, config: &RunConfig) -> Result<String, StepError> {
        tracing::info!(
            image = %function.image,
            registry = %function.registry_url,
            "Pushing: {} ...",
            function.name
        );

        self.pusher
            .push(&function.image)
            .await
            .map_err(|error| StepError::Push {
                image: function.image.clone(),
                error,
            })?;

        let resolved_env =
            environment::resolve_environment(&function.environment, &function.environment_files)
                .await
                .map_err(StepError::Environment)?;

        let request = DeployRequest::build(function, resolved_env, config);

        tracing::info!("Deploying: {} ...", function.name);

        self.submitter
            .submit(&request, &self.token)
            .await
            .map_err(StepError::Deploy)?;

        let endpoint = invocation_url(&config.gateway, &function.name);
        tracing::info!("http trigger url: {}", endpoint);

        Ok(endpoint)
    }
}
