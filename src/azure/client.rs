//! Network management client.
//!
//! [`NetworkClient`] is the seam between the NSG operations and the provider.
//! Every provider failure comes back as a [`ProviderError`] value.

use super::arm;
use super::transport::Transport;
use crate::error::ProviderError;
use crate::models::{NetworkInterface, NetworkSecurityGroup, Subnet, VirtualNetwork};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;

/// Network management operations used by the NSG manager.
///
/// The `begin_*` calls return once the provider accepted the request,
/// they do not wait for the long running operation to finish.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    async fn get_nsg(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<NetworkSecurityGroup, ProviderError>;

    async fn list_nsgs(
        &self,
        resource_group: &str,
    ) -> Result<Vec<NetworkSecurityGroup>, ProviderError>;

    async fn begin_create_or_update_nsg(
        &self,
        resource_group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<(), ProviderError>;

    async fn begin_delete_nsg(&self, resource_group: &str, name: &str)
        -> Result<(), ProviderError>;

    async fn begin_create_or_update_nic(
        &self,
        resource_group: &str,
        nic: &NetworkInterface,
    ) -> Result<(), ProviderError>;

    async fn begin_create_or_update_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        subnet: &Subnet,
    ) -> Result<(), ProviderError>;
}

/// One page of an ARM list response.
#[derive(Deserialize, Debug)]
struct Page<T> {
    value: Vec<T>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// [`NetworkClient`] speaking ARM REST through a [`Transport`].
pub struct ArmNetworkClient {
    transport: Box<dyn Transport>,
    subscription_id: String,
}

impl ArmNetworkClient {
    pub fn new(transport: Box<dyn Transport>, subscription_id: &str) -> Self {
        ArmNetworkClient {
            transport,
            subscription_id: subscription_id.to_string(),
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let body = self.transport.send(Method::GET, url, None).await?;
        parse(url, &body)
    }

    async fn put_json<T: serde::Serialize + Sync>(
        &self,
        url: &str,
        resource: &T,
    ) -> Result<(), ProviderError> {
        let body = serde_json::to_value(resource)
            .map_err(|e| ProviderError::Cloud(format!("Error serializing request body: {e}")))?;
        self.transport.send(Method::PUT, url, Some(&body)).await?;
        Ok(())
    }

    /// Fetch a network interface by name.
    pub async fn get_nic(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<NetworkInterface, ProviderError> {
        self.get_json(&arm::nic_url(&self.subscription_id, resource_group, name))
            .await
    }

    /// Fetch a virtual network by name.
    pub async fn get_vnet(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<VirtualNetwork, ProviderError> {
        self.get_json(&arm::vnet_url(&self.subscription_id, resource_group, name))
            .await
    }

    /// Fetch a subnet of `vnet_name`.
    pub async fn get_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
    ) -> Result<Subnet, ProviderError> {
        self.get_json(&arm::subnet_url(
            &self.subscription_id,
            resource_group,
            vnet_name,
            name,
        ))
        .await
    }
}

/// Deserialize a response body, reporting the JSON path on failure.
fn parse<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ProviderError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", body);
        ProviderError::Cloud(format!(
            "Error parsing response from {url}: path={} error={}",
            e.path(),
            e
        ))
    })
}

#[async_trait]
impl NetworkClient for ArmNetworkClient {
    async fn get_nsg(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<NetworkSecurityGroup, ProviderError> {
        self.get_json(&arm::nsg_url(&self.subscription_id, resource_group, name))
            .await
    }

    async fn list_nsgs(
        &self,
        resource_group: &str,
    ) -> Result<Vec<NetworkSecurityGroup>, ProviderError> {
        let mut nsgs = Vec::new();
        let mut seen_links = HashSet::new();
        let mut url = arm::nsgs_url(&self.subscription_id, resource_group);
        let mut count_pages = 0;

        loop {
            let page: Page<NetworkSecurityGroup> = self.get_json(&url).await?;
            log::debug!(
                "got page#{count_pages:2} nsg_count=+{count:3}",
                count = page.value.len()
            );
            nsgs.extend(page.value);
            count_pages += 1;

            match page.next_link {
                Some(next) if !next.is_empty() => {
                    if !seen_links.insert(next.clone()) {
                        return Err(ProviderError::Cloud(
                            "nextLink not unique - possible infinite loop".to_string(),
                        ));
                    }
                    url = next;
                }
                _ => break,
            }
        }

        log::info!("Got {} nsgs in {resource_group}", nsgs.len());
        Ok(nsgs)
    }

    async fn begin_create_or_update_nsg(
        &self,
        resource_group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<(), ProviderError> {
        self.put_json(&arm::nsg_url(&self.subscription_id, resource_group, name), nsg)
            .await
    }

    async fn begin_delete_nsg(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        let url = arm::nsg_url(&self.subscription_id, resource_group, name);
        self.transport.send(Method::DELETE, &url, None).await?;
        Ok(())
    }

    async fn begin_create_or_update_nic(
        &self,
        resource_group: &str,
        nic: &NetworkInterface,
    ) -> Result<(), ProviderError> {
        self.put_json(
            &arm::nic_url(&self.subscription_id, resource_group, &nic.name),
            nic,
        )
        .await
    }

    async fn begin_create_or_update_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        subnet: &Subnet,
    ) -> Result<(), ProviderError> {
        self.put_json(
            &arm::subnet_url(&self.subscription_id, resource_group, vnet_name, &subnet.name),
            subnet,
        )
        .await
    }
}
