use super::{environment::ResolvedEnvironment, RunConfig};
use crate::{request::functions::DeployRequest, stack::defs::FunctionSpec};
use std::collections::BTreeMap;

pub const MAINTAINER_ANNOTATION: &str = "maintainer";
pub const DESCRIPTION_ANNOTATION: &str = "desc";

impl FunctionSpec {
    fn to_labels(&self) -> BTreeMap<String, String> {
        self.labels.clone().unwrap_or_default()
    }

    fn to_annotations(&self) -> BTreeMap<String, String> {
        let mut annotations = BTreeMap::new();

        if !self.maintainer.is_empty() {
            annotations.insert(String::from(MAINTAINER_ANNOTATION), self.maintainer.clone());
        }
        if !self.description.is_empty() {
            annotations.insert(String::from(DESCRIPTION_ANNOTATION), self.description.clone());
        }

        annotations
    }

    /// Declared secrets plus the registry credential, appended even if already declared.
    fn to_secrets(&self, credential_secret: &str) -> Vec<String> {
        let mut secrets = self.secrets.clone();
        secrets.push(credential_secret.to_string());
        secrets
    }
}

impl DeployRequest {
    /// Replica bounds and mode flags come from the run, everything else from the function.
    pub fn build(
        function: &FunctionSpec,
        resolved_env: ResolvedEnvironment,
        config: &RunConfig,
    ) -> Self {
        Self {
            gateway: config.gateway.clone(),
            function_name: function.name.clone(),
            image: function.image.clone(),
            env_vars: resolved_env,
            labels: function.to_labels(),
            annotations: function.to_annotations(),
            constraints: function.constraints.clone(),
            secrets: function.to_secrets(&config.credential_secret),
            limits: function.limits.clone(),
            requests: function.requests.clone(),
            registry_url: function.registry_url.clone(),
            min_replicas: config.min_replicas,
            max_replicas: config.max_replicas,
            update: config.mode.update,
            replace: config.mode.replace,
        }
    }
}
