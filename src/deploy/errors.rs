use super::RunReport;
use crate::{docker_actions::PushError, faas_client::DeployError};
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Rejected before any push or deploy is attempted.
#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum PreconditionError {
    #[error(r#"One of "--update" or "--replace" must be false"#)]
    ConflictingModes,
    #[error("No functions to deploy")]
    NoFunctions,
    #[error("Minimum replicas must be at least 1")]
    ZeroMinReplicas,
    #[error("Minimum replicas ({min}) exceed maximum replicas ({max})")]
    ReplicaBounds { min: u32, max: u32 },
}

#[derive(ThisError, Debug)]
pub enum EnvironmentError {
    #[error("Failed to read environment file {path}: {error}")]
    Read {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("Failed to parse environment file {path}: {error}")]
    Parse {
        path: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },
}

#[derive(ThisError, Debug)]
pub enum StepError {
    #[error("Failed to push image {image}: {error}")]
    Push {
        image: String,
        #[source]
        error: PushError,
    },
    #[error("Failed to resolve environment: {0}")]
    Environment(#[source] EnvironmentError),
    #[error("Failed to deploy: {0}")]
    Deploy(#[source] DeployError),
}

#[derive(ThisError, Debug)]
#[error("Function {function} failed: {error}")]
pub struct FunctionError {
    pub function: String,
    #[source]
    pub error: StepError,
}

#[derive(ThisError, Debug)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Precondition(
        #[source]
        #[from]
        PreconditionError,
    ),
    #[error(transparent)]
    Function(#[from] FunctionError),
    #[error("{}", display_incomplete(.0))]
    Incomplete(RunReport),
}

fn display_incomplete(report: &RunReport) -> String {
    let failed: Vec<&str> = report
        .failed()
        .map(|error| error.function.as_str())
        .collect();

    format!(
        "{} of {} functions failed: {}",
        failed.len(),
        report.outcomes.len(),
        failed.join(", ")
    )
}
