use openfx_deploy::{
    deploy::{
        errors::{RunError, StepError},
        DeployMode, Deployer, DeploymentRun, FunctionSubmitter, ImagePusher, RunConfig,
    },
    docker_actions::PushError,
    faas_client::DeployError,
    request::functions::DeployRequest,
    stack::defs::Stack,
};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingPusher {
    pushed: Mutex<Vec<String>>,
    fail: bool,
}

impl ImagePusher for &RecordingPusher {
    async fn push(&self, image: &str) -> Result<(), PushError> {
        self.pushed.lock().unwrap().push(image.to_string());
        if self.fail {
            return Err(PushError::Status {
                code: Some(1),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSubmitter {
    submitted: Mutex<Vec<DeployRequest>>,
}

impl FunctionSubmitter for &RecordingSubmitter {
    async fn submit(&self, request: &DeployRequest, _token: &str) -> Result<(), DeployError> {
        self.submitted.lock().unwrap().push(request.clone());
        Ok(())
    }
}

fn run_from(yaml: &str) -> DeploymentRun {
    let stack = Stack::from_yaml_str(yaml).unwrap();
    let gateway = stack.resolve_gateway(None);

    DeploymentRun {
        functions: stack.functions,
        config: RunConfig {
            gateway,
            mode: DeployMode {
                update: true,
                replace: false,
            },
            ..RunConfig::default()
        },
    }
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn stack_file_to_deploy_requests() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("base.yml");
    let prod = dir.path().join("prod.yml");
    std::fs::write(&base, "environment:\n  K: a\n  LEVEL: debug\n").unwrap();
    std::fs::write(&prod, "environment:\n  K: b\n  LEVEL: info\n").unwrap();

    let yaml = format!(
        r#"
openfx:
  gateway: 10.0.0.180:31113
functions:
  echo:
    image: 10.0.0.180:5000/echo
    maintainer: Alice
    environment:
      K: c
    environment_file:
      - {}
      - {}
  plain:
    image: 10.0.0.180:5000/plain
    environment:
      X: "1"
"#,
        base.display(),
        prod.display()
    );

    let pusher = RecordingPusher::default();
    let submitter = RecordingSubmitter::default();
    let deployer = Deployer::new(&pusher, &submitter, String::from("token"));

    let report = deployer.run(&run_from(&yaml)).await.unwrap();

    assert_eq!(
        report.endpoints().collect::<Vec<_>>(),
        vec![
            "http://10.0.0.180:31113/function/echo",
            "http://10.0.0.180:31113/function/plain"
        ]
    );

    let submitted = submitter.submitted.lock().unwrap();
    let echo = &submitted[0];
    assert_eq!(echo.env_vars, map(&[("K", "c"), ("LEVEL", "info")]));
    assert_eq!(echo.annotations, map(&[("maintainer", "Alice")]));
    assert_eq!(echo.labels, BTreeMap::new());

    let plain = &submitted[1];
    assert_eq!(plain.env_vars, map(&[("X", "1")]));
    assert_eq!(plain.labels, BTreeMap::new());
    assert!(plain.annotations.is_empty());
    assert_eq!(plain.secrets, vec!["regcred"]);
    assert_eq!((plain.min_replicas, plain.max_replicas), (1, 1));
}

#[tokio::test]
async fn push_failure_on_first_function_leaves_second_untouched() {
    let yaml = "functions:\n  first:\n    image: r/first\n  second:\n    image: r/second\n";

    let pusher = RecordingPusher {
        fail: true,
        ..RecordingPusher::default()
    };
    let submitter = RecordingSubmitter::default();
    let deployer = Deployer::new(&pusher, &submitter, String::new());

    let error = deployer.run(&run_from(yaml)).await.unwrap_err();

    assert!(error.to_string().starts_with("Function first failed"));
    assert!(matches!(
        error,
        RunError::Function(ref error) if matches!(error.error, StepError::Push { .. })
    ));
    assert_eq!(*pusher.pushed.lock().unwrap(), vec!["r/first"]);
    assert!(submitter.submitted.lock().unwrap().is_empty());
}
