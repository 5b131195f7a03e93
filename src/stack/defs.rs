use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// A named function as declared in the stack file.
#[derive(Deserialize, Debug, PartialEq, Clone, Default)]
pub struct FunctionSpec {
    /// name of the function, taken from its key in the `functions` mapping
    #[serde(skip)]
    pub name: String,

    /// image is a fully-qualified container image
    pub image: String,

    /// environment variables declared inline
    #[serde(default, deserialize_with = "deserialize_environment")]
    pub environment: BTreeMap<String, String>,

    /// environment files, merged in order before the inline declarations
    #[serde(default, rename = "environment_file")]
    pub environment_files: Vec<PathBuf>,

    /// labels are metadata for functions which may be used by the gateway
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub maintainer: String,

    #[serde(default, rename = "desc")]
    pub description: String,

    /// placement constraints, specific to the cluster
    #[serde(default)]
    pub constraints: Vec<String>,

    /// secrets to be made available to the function
    #[serde(default)]
    pub secrets: Vec<String>,

    #[serde(default)]
    pub limits: Option<FunctionResources>,

    #[serde(default)]
    pub requests: Option<FunctionResources>,

    /// registry the image is pushed to
    #[serde(default, rename = "docker_registry")]
    pub registry_url: String,
}

/// Reads a variable mapping whose values may be any YAML scalar.
/// Numbers and booleans keep their YAML spelling, e.g. `PORT: 8080` is `"8080"`.
pub fn deserialize_environment<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, serde_yaml::Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                serde_yaml::Value::String(value) => value,
                serde_yaml::Value::Number(value) => value.to_string(),
                serde_yaml::Value::Bool(value) => value.to_string(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "environment variable {} must be a string, number or boolean",
                        name
                    )))
                }
            };
            Ok((name, value))
        })
        .collect()
}

/// FunctionResources Memory, CPU and GPU
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct FunctionResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
}

/// The `openfx` section of the stack file.
#[derive(Deserialize, Debug, PartialEq, Clone, Default)]
pub struct OpenFxSection {
    #[serde(default)]
    pub gateway: String,
}

/// Raw stack file. `functions` stays a mapping so the declaration order survives.
#[derive(Deserialize, Debug, Default)]
pub(super) struct StackFile {
    #[serde(default)]
    pub openfx: Option<OpenFxSection>,
    #[serde(default)]
    pub functions: Option<serde_yaml::Mapping>,
}

/// A loaded stack file: the configured gateway and the functions in declaration order.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Stack {
    pub gateway: Option<String>,
    pub functions: Vec<FunctionSpec>,
}

#[derive(ThisError, Debug)]
pub enum StackError {
    #[error("Failed to read stack file {path}: {error}")]
    Read {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("Failed to parse stack file: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("Function names must be strings, found: {0:?}")]
    FunctionName(serde_yaml::Value),
    #[error("Invalid function {name}: {error}")]
    Function {
        name: String,
        #[source]
        error: serde_yaml::Error,
    },
}
