use super::{errors::PreconditionError, DeploymentRun};

/// Checks the run as a whole before anything is pushed or deployed.
pub fn validate(run: &DeploymentRun) -> Result<(), PreconditionError> {
    let config = &run.config;

    if config.mode.update && config.mode.replace {
        return Err(PreconditionError::ConflictingModes);
    }

    if run.functions.is_empty() {
        return Err(PreconditionError::NoFunctions);
    }

    if config.min_replicas == 0 {
        return Err(PreconditionError::ZeroMinReplicas);
    }

    if config.min_replicas > config.max_replicas {
        return Err(PreconditionError::ReplicaBounds {
            min: config.min_replicas,
            max: config.max_replicas,
        });
    }

    Ok(())
}
