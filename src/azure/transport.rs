//! Ways of sending requests to the management endpoint.
//!
//! - [`AzCliTransport`] - shells out to `az rest`, using the CLI's login
//! - [`HttpTransport`] - calls the endpoint directly with a token from `azure_identity`

use super::arm::{classify_cli_error, classify_http_error, MANAGEMENT_SCOPE};
use super::cli::{self, CliError};
use crate::error::ProviderError;
use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;
use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Sends one request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<String, ProviderError>;
}

/// Request transport backed by `az rest`.
#[derive(Debug, Default, Clone)]
pub struct AzCliTransport;

impl AzCliTransport {
    pub fn new() -> Self {
        AzCliTransport
    }

    /// Default subscription of the logged in CLI account.
    pub async fn default_subscription(&self) -> Result<String, Box<dyn Error>> {
        let out = cli::run("az account show --query id --output tsv").await?;
        let id = out.trim();
        if id.is_empty() {
            return Err("az account show returned no subscription id".into());
        }
        Ok(id.to_string())
    }
}

#[async_trait]
impl Transport for AzCliTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<String, ProviderError> {
        // Bodies go through a file, a full rule set is larger than one argv entry may be.
        let body_file = body.map(write_body).transpose()?;
        let args = rest_args(&method, url, body_file.as_ref().map(|f| f.path()));

        match cli::run_args(&args).await {
            Ok(out) => Ok(out),
            Err(CliError::Failed { stderr, .. }) => Err(classify_cli_error(&stderr)),
            Err(e) => Err(ProviderError::Cloud(e.to_string())),
        }
    }
}

/// Write a request body to a temporary file, removed when the handle drops.
fn write_body(body: &Value) -> Result<NamedTempFile, ProviderError> {
    let write = || -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("nsg-body-")
            .suffix(".json")
            .tempfile()?;
        serde_json::to_writer(&mut file, body)?;
        file.flush()?;
        Ok(file)
    };
    write().map_err(|e| ProviderError::Cloud(format!("unable to write request body: {e}")))
}

/// Arguments of an `az rest` call, the body read from `body_path` when given.
fn rest_args(method: &Method, url: &str, body_path: Option<&Path>) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "az".to_string(),
        "rest".to_string(),
        "--method".to_string(),
        method.as_str().to_lowercase(),
        "--url".to_string(),
        url.to_string(),
    ];
    if let Some(path) = body_path {
        args.push("--body".to_string());
        args.push(format!("@{}", path.display()));
    }
    args.push("--output".to_string());
    args.push("json".to_string());
    args
}

/// Request transport calling the management endpoint over HTTPS.
pub struct HttpTransport {
    client: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
}

impl HttpTransport {
    /// Build a transport from the default credential chain
    /// (environment, managed identity, `az` login).
    pub fn new() -> Self {
        let credential: Arc<dyn TokenCredential> =
            Arc::new(azure_identity::DefaultAzureCredentialBuilder::new().build());
        Self::with_credential(credential)
    }

    pub fn with_credential(credential: Arc<dyn TokenCredential>) -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
            credential,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<String, ProviderError> {
        let token = self
            .credential
            .get_token(&[MANAGEMENT_SCOPE])
            .await
            .map_err(|e| ProviderError::Cloud(format!("unable to get management token: {e}")))?;

        log::debug!("{method} {url}");
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(token.token.secret());
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Cloud(format!("request to {url} failed: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Cloud(format!("reading response from {url}: {e}")))?;

        if status.is_success() {
            Ok(text)
        } else {
            log::debug!("{url} returned {status}");
            Err(classify_http_error(status.as_u16(), &text))
        }
    }
}
