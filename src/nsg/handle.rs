//! The platform's handle on one NSG: a validated name and its region.

use super::manager::is_onefuzz_nsg;
use super::NsgManager;
use crate::azure::NetworkClient;
use crate::error::{Error, Result};
use crate::models::{
    NetworkInterface, NetworkSecurityGroup, NetworkSecurityGroupConfig, Region, SecurityRule,
    Subnet, VirtualNetwork,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest NSG name the provider accepts.
pub const MAX_NSG_NAME_LEN: usize = 80;

#[derive(Deserialize)]
struct RawNsg {
    name: String,
    region: Region,
}

impl TryFrom<RawNsg> for Nsg {
    type Error = Error;

    fn try_from(raw: RawNsg) -> Result<Self> {
        Nsg::new(&raw.name, &raw.region)
    }
}

/// Named NSG in a region. By convention the platform names its NSGs after
/// their region.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "RawNsg")]
pub struct Nsg {
    name: String,
    region: Region,
}

impl Nsg {
    pub fn new(name: &str, region: &str) -> Result<Self> {
        if name.chars().count() > MAX_NSG_NAME_LEN {
            return Err(Error::invalid_request(format!(
                "NSG name too long: {} > {MAX_NSG_NAME_LEN} characters",
                name.chars().count()
            )));
        }
        Ok(Nsg {
            name: name.to_string(),
            region: region.to_string(),
        })
    }

    /// The platform's NSG for `region`.
    pub fn for_region(region: &str) -> Result<Self> {
        Nsg::new(region, region)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn is_onefuzz_nsg(&self) -> bool {
        is_onefuzz_nsg(&self.region, &self.name)
    }

    /// Create the NSG unless it already exists.
    pub async fn create<C: NetworkClient>(&self, manager: &NsgManager<C>) -> Result<()> {
        if manager.get_nsg(&self.name).await.is_some() {
            return Ok(());
        }
        manager.create_nsg(&self.name, &self.region).await
    }

    pub async fn start_delete<C: NetworkClient>(&self, manager: &NsgManager<C>) -> bool {
        manager.start_delete_nsg(&self.name).await
    }

    pub async fn get<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
    ) -> Option<NetworkSecurityGroup> {
        manager.get_nsg(&self.name).await
    }

    pub async fn set_allowed_sources<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
        sources: &NetworkSecurityGroupConfig,
    ) -> Result<()> {
        manager.set_allowed(&self.name, sources).await
    }

    pub async fn clear_all_rules<C: NetworkClient>(&self, manager: &NsgManager<C>) -> Result<()> {
        manager.clear_all_rules(&self.name).await
    }

    pub async fn get_all_rules<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
    ) -> Result<Vec<SecurityRule>> {
        manager.get_all_rules(&self.name).await
    }

    pub async fn associate_nic<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
        nic: &mut NetworkInterface,
    ) -> Result<()> {
        manager.associate_nic(&self.name, nic).await
    }

    pub async fn dissociate_nic<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
        nic: &mut NetworkInterface,
    ) -> Result<()> {
        manager.dissociate_nic(&self.name, nic).await
    }

    pub async fn associate_subnet<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
        vnet: &VirtualNetwork,
        subnet: &mut Subnet,
    ) -> Result<()> {
        manager.associate_subnet(&self.name, vnet, subnet).await
    }

    pub async fn dissociate_subnet<C: NetworkClient>(
        &self,
        manager: &NsgManager<C>,
        vnet: &VirtualNetwork,
        subnet: &mut Subnet,
    ) -> Result<()> {
        manager.dissociate_subnet(&self.name, vnet, subnet).await
    }
}

impl fmt::Display for Nsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.region)
    }
}
