use crate::stack::defs::FunctionResources;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body submitted to the gateway for a single function.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// gateway is the address the request is submitted to, e.g. 10.0.0.180:31113
    pub gateway: String,

    /// function_name is the name of the function deployment
    pub function_name: String,

    /// image is a fully-qualified container image
    pub image: String,

    /// env_vars are the merged environment variables for the function runtime.
    pub env_vars: BTreeMap<String, String>,

    /// labels are metadata for functions which may be used by the gateway.
    /// Always present, possibly empty.
    pub labels: BTreeMap<String, String>,

    /// annotations are synthesized from the maintainer and description
    pub annotations: BTreeMap<String, String>,

    /// constraints are specific to the cluster.
    pub constraints: Vec<String>,

    /// secrets list of secrets to be made available to function
    pub secrets: Vec<String>,

    /// limits for function
    pub limits: Option<FunctionResources>,

    /// requests of resources requested by function
    pub requests: Option<FunctionResources>,

    pub registry_url: String,

    pub min_replicas: u32,
    pub max_replicas: u32,

    /// update performs a rolling update of an existing function
    pub update: bool,
    /// replace removes and re-creates an existing function
    pub replace: bool,
}
