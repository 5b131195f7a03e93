use const_format::concatcp;

pub const GATEWAY_ENV_VAR: &str = "OPENFX_GATEWAY";
pub const GATEWAY_DEFAULT: &str = "127.0.0.1:31113";

pub const TOKEN_ENV_VAR: &str = "OPENFX_TOKEN";

/// Registry pull secret appended to every function's secret list.
pub const REGISTRY_CREDENTIAL_SECRET: &str = "regcred";

pub const DEFAULT_MIN_REPLICAS: u32 = 1;
pub const DEFAULT_MAX_REPLICAS: u32 = 1;

pub const FUNCTIONS_ENDPOINT: &str = "/system/functions";
pub const INVOKE_PATH: &str = "/function";

pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

pub const DEFAULT_LOG_FILTER: &str = concatcp!(PKG_NAME, "=info");
