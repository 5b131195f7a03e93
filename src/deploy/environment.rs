use super::errors::EnvironmentError;
use crate::stack::defs::deserialize_environment;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type ResolvedEnvironment = BTreeMap<String, String>;

/// Contents of an environment file.
#[derive(Deserialize, Debug, Default)]
struct EnvironmentFile {
    #[serde(default, deserialize_with = "deserialize_environment")]
    environment: BTreeMap<String, String>,
}

pub async fn read_environment_file(path: &Path) -> Result<BTreeMap<String, String>, EnvironmentError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|error| EnvironmentError::Read {
            path: path.to_path_buf(),
            error,
        })?;

    // An empty document is a file with no variables.
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let file: EnvironmentFile =
        serde_yaml::from_str(&contents).map_err(|error| EnvironmentError::Parse {
            path: path.to_path_buf(),
            error,
        })?;

    Ok(file.environment)
}

/// Merges the environment files in order, then the inline declarations.
///
/// Later files overwrite earlier ones and inline values overwrite every file.
pub async fn resolve_environment(
    inline_env: &BTreeMap<String, String>,
    file_paths: &[PathBuf],
) -> Result<ResolvedEnvironment, EnvironmentError> {
    let mut resolved = ResolvedEnvironment::new();

    for path in file_paths {
        let file_env = read_environment_file(path).await?;
        tracing::debug!(path = %path.display(), variables = file_env.len(), "Loaded environment file.");
        resolved.extend(file_env);
    }

    resolved.extend(
        inline_env
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    Ok(resolved)
}
