//! NSG lifecycle: get, create, update, list and delete.

use crate::azure::NetworkClient;
use crate::config::{Config, OWNER_TAG};
use crate::error::{Error, ProviderError, Result};
use crate::models::NetworkSecurityGroup;
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};

/// Marker in the provider's refusal to delete an NSG that still has dependents.
const NSG_IN_USE_ERROR: &str = "cannot be deleted because it is in use by the following resources";

/// True if the NSG follows the naming convention (name equals region),
/// and therefore belongs to this platform.
pub fn is_onefuzz_nsg(nsg_region: &str, nsg_name: &str) -> bool {
    nsg_region == nsg_name
}

/// True if the NSG belongs to this platform and its region is no longer in use.
pub fn ok_to_delete(active_regions: &HashSet<String>, nsg_region: &str, nsg_name: &str) -> bool {
    !active_regions.contains(nsg_region) && is_onefuzz_nsg(nsg_region, nsg_name)
}

/// Idempotent operations on the NSGs of one resource group.
pub struct NsgManager<C> {
    client: C,
    resource_group: String,
    owner: Option<String>,
}

impl<C: NetworkClient> NsgManager<C> {
    pub fn new(client: C, resource_group: &str) -> Self {
        NsgManager {
            client,
            resource_group: resource_group.to_string(),
            owner: None,
        }
    }

    pub fn from_config(client: C, config: &Config) -> Self {
        NsgManager::new(client, &config.resource_group).with_owner(config.owner.clone())
    }

    /// Owner written to the `OWNER` tag of NSGs created from now on.
    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Fetch an NSG by name.
    ///
    /// Any provider failure, not found included, is logged and reported as `None`.
    pub async fn get_nsg(&self, name: &str) -> Option<NetworkSecurityGroup> {
        log::debug!("getting nsg: {name}");
        match self.client.get_nsg(&self.resource_group, name).await {
            Ok(nsg) => Some(nsg),
            Err(err) => {
                log::error!("nsg {name} does not exist: {err}");
                None
            }
        }
    }

    /// Ask the provider to create an NSG in `location`.
    ///
    /// Losing a race against a concurrent create counts as success.
    pub async fn create_nsg(&self, name: &str, location: &str) -> Result<()> {
        log::info!(
            "creating nsg {}:{}:{}",
            self.resource_group,
            location,
            name
        );

        let mut nsg = NetworkSecurityGroup::new(name, location);
        if let Some(owner) = &self.owner {
            nsg.tags = Some(BTreeMap::from([(OWNER_TAG.to_string(), owner.clone())]));
        }

        let result = self
            .client
            .begin_create_or_update_nsg(&self.resource_group, name, &nsg)
            .await;
        accept_concurrent(result, "create nsg", |err| {
            Error::unable_to_create(format!("Unable to create nsg {name} due to {err}"))
        })
    }

    /// Write back a full NSG, rules included.
    pub async fn update_nsg(&self, nsg: &NetworkSecurityGroup) -> Result<()> {
        log::info!(
            "updating nsg {}:{}:{}",
            self.resource_group,
            nsg.location,
            nsg.name
        );

        let result = self
            .client
            .begin_create_or_update_nsg(&self.resource_group, &nsg.name, nsg)
            .await;
        accept_concurrent(result, "update nsg", |err| {
            Error::unable_to_create(format!("Unable to update nsg {} due to {err}", nsg.name))
        })
    }

    /// Every NSG in the resource group.
    pub async fn list_nsgs(&self) -> Result<Vec<NetworkSecurityGroup>> {
        self.client
            .list_nsgs(&self.resource_group)
            .await
            .map_err(|err| {
                Error::unable_to_find(format!(
                    "Unable to list nsgs in {} due to {err}",
                    self.resource_group
                ))
            })
    }

    /// Start deleting an NSG.
    ///
    /// Returns true if deletion started or the NSG is already gone, false if
    /// the provider refused, e.g. because NICs or subnets still reference it.
    pub async fn start_delete_nsg(&self, name: &str) -> bool {
        log::info!("deleting nsg: {} {}", self.resource_group, name);

        match self.client.begin_delete_nsg(&self.resource_group, name).await {
            Ok(()) => true,
            Err(ProviderError::NotFound(_)) => true,
            Err(ProviderError::Cloud(msg)) if msg.contains(NSG_IN_USE_ERROR) => {
                log::info!("nsg {name} is still in use, not deleting");
                false
            }
            Err(err) => {
                log::warn!("failed to start deleting nsg {name}: {err}");
                false
            }
        }
    }

    /// Start deleting every NSG this platform owns in a region that is not active.
    ///
    /// Returns the names of the NSGs whose deletion started.
    pub async fn reap(&self, active_regions: &HashSet<String>) -> Result<Vec<String>> {
        let mut deleted = Vec::new();
        for nsg in self.list_nsgs().await? {
            if !ok_to_delete(active_regions, &nsg.location, &nsg.name) {
                continue;
            }
            if self.start_delete_nsg(&nsg.name).await {
                deleted.push(nsg.name);
            }
        }
        log::info!(
            "reaped nsgs: [{}] active regions: [{}]",
            deleted.iter().join(", "),
            active_regions.iter().sorted().join(", ")
        );
        Ok(deleted)
    }
}

/// Turn a provider write result into the caller facing result.
///
/// A concurrent-request conflict means someone else is writing the same
/// resource and is treated as success; anything else goes through `on_error`.
pub(crate) fn accept_concurrent<F>(
    result: std::result::Result<(), ProviderError>,
    action: &str,
    on_error: F,
) -> Result<()>
where
    F: FnOnce(ProviderError) -> Error,
{
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_concurrent_request() => {
            log::debug!("{action} had conflicts with concurrent request, ignoring {err}");
            Ok(())
        }
        Err(err) => Err(on_error(err)),
    }
}
