//! Azure Resource Manager paths and error payloads.

use crate::error::ProviderError;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Public cloud management endpoint.
pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
/// Token scope for the management endpoint.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";
/// Microsoft.Network API version used for every request.
pub const NETWORK_API_VERSION: &str = "2023-09-01";

/// Matches the different ways a 404 shows up in `az` output and ARM error bodies.
static NOT_FOUND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_not_found_regex() -> &'static Regex {
    NOT_FOUND_REGEX.get_or_init(|| {
        Regex::new(r#"Not Found\(|\((?:Resource)?NotFound\)|"code"\s*:\s*"(?:Resource)?NotFound""#)
            .expect("Invalid Regex")
    })
}

fn resource_group_path(subscription_id: &str, resource_group: &str) -> String {
    format!(
        "{MANAGEMENT_ENDPOINT}/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Network"
    )
}

fn with_api_version(path: String) -> String {
    format!("{path}?api-version={NETWORK_API_VERSION}")
}

pub fn nsgs_url(subscription_id: &str, resource_group: &str) -> String {
    with_api_version(format!(
        "{}/networkSecurityGroups",
        resource_group_path(subscription_id, resource_group)
    ))
}

pub fn nsg_url(subscription_id: &str, resource_group: &str, name: &str) -> String {
    with_api_version(format!(
        "{}/networkSecurityGroups/{name}",
        resource_group_path(subscription_id, resource_group)
    ))
}

pub fn nic_url(subscription_id: &str, resource_group: &str, name: &str) -> String {
    with_api_version(format!(
        "{}/networkInterfaces/{name}",
        resource_group_path(subscription_id, resource_group)
    ))
}

pub fn vnet_url(subscription_id: &str, resource_group: &str, name: &str) -> String {
    with_api_version(format!(
        "{}/virtualNetworks/{name}",
        resource_group_path(subscription_id, resource_group)
    ))
}

pub fn subnet_url(
    subscription_id: &str,
    resource_group: &str,
    vnet_name: &str,
    subnet_name: &str,
) -> String {
    with_api_version(format!(
        "{}/virtualNetworks/{vnet_name}/subnets/{subnet_name}",
        resource_group_path(subscription_id, resource_group)
    ))
}

#[derive(Deserialize, Debug)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Classify a failed `az rest` invocation by its stderr.
pub fn classify_cli_error(stderr: &str) -> ProviderError {
    if get_not_found_regex().is_match(stderr) {
        ProviderError::NotFound(stderr.to_string())
    } else {
        ProviderError::Cloud(stderr.to_string())
    }
}

/// Classify a non-success HTTP response from the management endpoint.
pub fn classify_http_error(status: u16, body: &str) -> ProviderError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) => format!("({}) {}", resp.error.code, resp.error.message),
        Err(_) if body.is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {body}"),
    };
    if status == 404 || get_not_found_regex().is_match(body) {
        ProviderError::NotFound(message)
    } else {
        ProviderError::Cloud(message)
    }
}
