use crate::{
    consts::FUNCTIONS_ENDPOINT, deploy::FunctionSubmitter, request::functions::DeployRequest,
    util::gateway_base_url,
};
use reqwest::{Error as ReqwestError, StatusCode};
use serde_json::Error as SerdeJsonError;
use thiserror::Error as ThisError;
use url::{ParseError as UrlParseError, Url};

pub type FaasResult = Result<(), DeployError>;

#[derive(ThisError, Debug)]
pub enum DeployError {
    #[error("Invalid gateway address {gateway}: {error}")]
    Gateway {
        gateway: String,
        #[source]
        error: UrlParseError,
    },
    #[error("Serializing error: {0}")]
    SerializingError(
        #[source]
        #[from]
        SerdeJsonError,
    ),
    #[error("HTTP build error: {0}")]
    HttpBuilderError(#[source] ReqwestError),
    #[error("HTTP error: {0}")]
    HttpError(#[source] ReqwestError),
    #[error("Gateway: bad request{}", display_message(.0))]
    BadRequest(String),
    #[error("Gateway: unauthorized, check the access token")]
    Unauthorized,
    #[error("Gateway: not found")]
    NotFound,
    #[error("Gateway: conflict{}", display_message(.0))]
    Conflict(String),
    #[error("Gateway: internal server error{}", display_message(.0))]
    InternalServerError(String),
    #[error("Gateway: unknown status code: {0}")]
    UnknownStatusCode(u16),
}

fn display_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

impl DeployError {
    fn from_status(status_code: StatusCode, message: String) -> Self {
        match status_code {
            StatusCode::BAD_REQUEST => DeployError::BadRequest(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DeployError::Unauthorized,
            StatusCode::NOT_FOUND => DeployError::NotFound,
            StatusCode::CONFLICT => DeployError::Conflict(message),
            StatusCode::INTERNAL_SERVER_ERROR => DeployError::InternalServerError(message),
            _ => DeployError::UnknownStatusCode(status_code.as_u16()),
        }
    }
}

/// Submits deploy requests to the gateway named in each request.
#[derive(Default)]
pub struct FxClient {
    client: reqwest::Client,
}

impl FxClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// e.g. `10.0.0.180:31113` becomes `http://10.0.0.180:31113/system/functions`.
    /// A configured `https://` scheme is kept.
    pub fn functions_url(gateway: &str) -> Result<Url, DeployError> {
        let gateway = gateway_base_url(gateway);
        Url::parse(&format!("{}{}", gateway, FUNCTIONS_ENDPOINT))
            .map_err(|error| DeployError::Gateway { gateway, error })
    }

    fn status_code_into_faas_result(status_code: StatusCode, message: String) -> FaasResult {
        match status_code {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(()),
            status_code => Err(DeployError::from_status(status_code, message)),
        }
    }

    pub async fn deploy_function(&self, request: &DeployRequest, token: &str) -> FaasResult {
        let url = Self::functions_url(&request.gateway)?;

        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");

        if !token.is_empty() {
            builder = builder.bearer_auth(token);
        }

        let body = serde_json::to_string(request)?;

        let req = builder
            .body(body)
            .build()
            .map_err(DeployError::HttpBuilderError)?;

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(DeployError::HttpError)?;

        let status = resp.status();
        if status.is_success() {
            return Self::status_code_into_faas_result(status, String::new());
        }

        let message = resp.text().await.unwrap_or_default().trim().to_string();
        Self::status_code_into_faas_result(status, message)
    }
}

impl FunctionSubmitter for FxClient {
    async fn submit(&self, request: &DeployRequest, token: &str) -> Result<(), DeployError> {
        self.deploy_function(request, token).await
    }
}
