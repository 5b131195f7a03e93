pub mod defs;

use crate::{consts::GATEWAY_DEFAULT, util::normalize_gateway};
use defs::{FunctionSpec, Stack, StackError, StackFile};
use std::path::Path;

impl Stack {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, StackError> {
        let file: StackFile = serde_yaml::from_str(yaml).map_err(StackError::Parse)?;

        let gateway = file
            .openfx
            .map(|openfx| openfx.gateway)
            .filter(|gateway| !gateway.trim().is_empty());

        let functions = file
            .functions
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| {
                let name = match key {
                    serde_yaml::Value::String(name) => name,
                    key => return Err(StackError::FunctionName(key)),
                };

                let mut function: FunctionSpec =
                    serde_yaml::from_value(value).map_err(|error| StackError::Function {
                        name: name.clone(),
                        error,
                    })?;
                function.name = name;

                Ok(function)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { gateway, functions })
    }

    pub async fn load(path: &Path) -> Result<Self, StackError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| StackError::Read {
                path: path.to_path_buf(),
                error,
            })?;

        Self::from_yaml_str(&yaml)
    }

    /// Gateway to deploy to: the flag if set, then the stack file, then the default.
    /// A configured scheme is kept.
    pub fn resolve_gateway(&self, flag: Option<&str>) -> String {
        let gateway = flag
            .filter(|gateway| !gateway.trim().is_empty())
            .or(self.gateway.as_deref())
            .unwrap_or(GATEWAY_DEFAULT);

        normalize_gateway(gateway)
    }

    /// Points every function at `registry` for this run.
    pub fn override_registry(&mut self, registry: &str) {
        for function in self.functions.iter_mut() {
            function.registry_url = registry.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    const STACK: &str = r#"
openfx:
  gateway: 10.0.0.180:31113
functions:
  zeta:
    image: 10.0.0.180:5000/zeta
    docker_registry: 10.0.0.180:5000
    maintainer: alice
    desc: first declared
    environment:
      X: "1"
    environment_file:
      - ./env.yml
    labels:
      tier: web
    constraints:
      - node=edge
    secrets:
      - db
    limits:
      memory: 128Mi
      cpu: 100m
  alpha:
    image: 10.0.0.180:5000/alpha
"#;

    #[test]
    fn preserves_declaration_order() {
        let stack = Stack::from_yaml_str(STACK).unwrap();

        let names: Vec<_> = stack.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(stack.gateway.as_deref(), Some("10.0.0.180:31113"));
    }

    #[test]
    fn parses_function_fields() {
        let stack = Stack::from_yaml_str(STACK).unwrap();
        let zeta = &stack.functions[0];

        assert_eq!(zeta.image, "10.0.0.180:5000/zeta");
        assert_eq!(zeta.registry_url, "10.0.0.180:5000");
        assert_eq!(zeta.maintainer, "alice");
        assert_eq!(zeta.description, "first declared");
        assert_eq!(zeta.environment, BTreeMap::from([("X".into(), "1".into())]));
        assert_eq!(zeta.environment_files, vec![PathBuf::from("./env.yml")]);
        assert_eq!(
            zeta.labels,
            Some(BTreeMap::from([("tier".into(), "web".into())]))
        );
        assert_eq!(zeta.constraints, vec!["node=edge"]);
        assert_eq!(zeta.secrets, vec!["db"]);
        let limits = zeta.limits.as_ref().unwrap();
        assert_eq!(limits.memory.as_deref(), Some("128Mi"));
        assert_eq!(limits.gpu, None);

        let alpha = &stack.functions[1];
        assert_eq!(alpha.labels, None);
        assert!(alpha.environment.is_empty());
        assert!(alpha.maintainer.is_empty());
    }

    #[test]
    fn empty_functions_section_loads_as_empty() {
        let stack = Stack::from_yaml_str("functions:\n").unwrap();
        assert!(stack.functions.is_empty());
        assert_eq!(stack.gateway, None);
    }

    #[test]
    fn rejects_function_without_image() {
        let error = Stack::from_yaml_str("functions:\n  broken:\n    maintainer: bob\n").unwrap_err();
        assert!(matches!(error, StackError::Function { ref name, .. } if name == "broken"));
    }

    #[test]
    fn rejects_non_string_function_name() {
        let error = Stack::from_yaml_str("functions:\n  42:\n    image: x\n").unwrap_err();
        assert!(matches!(error, StackError::FunctionName(_)));
    }

    #[test]
    fn gateway_flag_wins_over_stack_file() {
        let stack = Stack::from_yaml_str(STACK).unwrap();

        assert_eq!(stack.resolve_gateway(Some("https://gw:8080/")), "https://gw:8080");
        assert_eq!(stack.resolve_gateway(Some("")), "10.0.0.180:31113");
        assert_eq!(stack.resolve_gateway(None), "10.0.0.180:31113");
        assert_eq!(Stack::default().resolve_gateway(None), GATEWAY_DEFAULT);
    }

    #[test]
    fn registry_override_applies_to_all_functions() {
        let mut stack = Stack::from_yaml_str(STACK).unwrap();
        stack.override_registry("127.0.0.1:5000");

        assert!(stack
            .functions
            .iter()
            .all(|f| f.registry_url == "127.0.0.1:5000"));
    }

    #[tokio::test]
    async fn missing_stack_file_is_a_read_error() {
        let error = Stack::load(Path::new("/nonexistent/stack.yml"))
            .await
            .unwrap_err();
        assert!(matches!(error, StackError::Read { .. }));
    }

    #[test]
    fn inline_environment_accepts_numbers_and_booleans() {
        let stack = Stack::from_yaml_str(
            "functions:\n  echo:\n    image: r/echo\n    environment:\n      PORT: 8080\n      DEBUG: false\n",
        )
        .unwrap();

        assert_eq!(
            stack.functions[0].environment,
            BTreeMap::from([
                ("DEBUG".to_string(), "false".to_string()),
                ("PORT".to_string(), "8080".to_string())
            ])
        );
    }
}
