//! Linking NSGs to network interfaces and subnets.
//!
//! A NIC or subnet is either unlinked or linked to exactly one NSG id.
//! `associate` links (replacing any other link), `dissociate` only clears a
//! link that points at the named NSG. The caller's record is updated only
//! once the provider accepted the write.

use super::manager::accept_concurrent;
use super::NsgManager;
use crate::azure::NetworkClient;
use crate::error::{Error, ErrorCode, Result};
use crate::models::{
    NetworkInterface, NetworkSecurityGroup, SubResource, Subnet, VirtualNetwork,
};

/// Resource id of `nsg`; a group without one cannot be linked to.
fn nsg_link(nsg: &NetworkSecurityGroup) -> Result<SubResource> {
    nsg.id
        .as_deref()
        .map(SubResource::new)
        .ok_or_else(|| Error::unable_to_update(format!("nsg {} has no resource id", nsg.name)))
}

impl<C: NetworkClient> NsgManager<C> {
    pub async fn associate_nic(&self, name: &str, nic: &mut NetworkInterface) -> Result<()> {
        let Some(nsg) = self.get_nsg(name).await else {
            return Err(Error::unable_to_find(format!(
                "cannot associate nic. nsg {name} not found"
            )));
        };

        if nsg.location != nic.location {
            return Err(Error::new(
                ErrorCode::UnableToUpdate,
                vec![
                    "network interface and nsg have to be in the same region.".to_string(),
                    format!(
                        "nsg {} {}, nic: {} {}",
                        nsg.name, nsg.location, nic.name, nic.location
                    ),
                ],
            ));
        }

        if nic.nsg_id().is_some() && nic.nsg_id() == nsg.id.as_deref() {
            log::info!(
                "NIC {} and NSG {} already associated, not updating",
                nic.name,
                name
            );
            return Ok(());
        }

        log::info!(
            "associating nic {} with nsg: {} {}",
            nic.name,
            self.resource_group(),
            name
        );

        let mut updated = nic.clone();
        updated.properties.network_security_group = Some(nsg_link(&nsg)?);
        let result = self
            .client()
            .begin_create_or_update_nic(self.resource_group(), &updated)
            .await;
        accept_concurrent(result, "associate nsg with nic", |err| {
            Error::unable_to_update(format!(
                "Unable to associate nsg {name} with nic {} due to {err}",
                nic.name
            ))
        })?;

        *nic = updated;
        Ok(())
    }

    pub async fn dissociate_nic(&self, name: &str, nic: &mut NetworkInterface) -> Result<()> {
        let Some(linked_id) = nic.nsg_id() else {
            return Ok(());
        };
        let Some(nsg) = self.get_nsg(name).await else {
            return Err(Error::unable_to_find(format!(
                "cannot update nsg rules. nsg {name} not found"
            )));
        };
        if nsg.id.as_deref() != Some(linked_id) {
            return Err(Error::new(
                ErrorCode::UnableToUpdate,
                vec![
                    "network interface is not associated with this nsg.".to_string(),
                    format!(
                        "nsg {}, nic: {}, nic.nsg: {}",
                        nsg.id.as_deref().unwrap_or_default(),
                        nic.name,
                        linked_id
                    ),
                ],
            ));
        }

        log::info!(
            "dissociating nic {} with nsg: {} {}",
            nic.name,
            self.resource_group(),
            name
        );

        let mut updated = nic.clone();
        updated.properties.network_security_group = None;
        let result = self
            .client()
            .begin_create_or_update_nic(self.resource_group(), &updated)
            .await;
        accept_concurrent(result, "dissociate nsg with nic", |err| {
            Error::unable_to_update(format!(
                "Unable to dissociate nsg {name} with nic {} due to {err}",
                nic.name
            ))
        })?;

        *nic = updated;
        Ok(())
    }

    /// Link NSG `name` to `subnet`, which must live in `vnet`.
    pub async fn associate_subnet(
        &self,
        name: &str,
        vnet: &VirtualNetwork,
        subnet: &mut Subnet,
    ) -> Result<()> {
        let Some(nsg) = self.get_nsg(name).await else {
            return Err(Error::unable_to_find(format!(
                "cannot associate subnet. nsg {name} not found"
            )));
        };

        if nsg.location != vnet.location {
            return Err(Error::new(
                ErrorCode::UnableToUpdate,
                vec![
                    "subnet and nsg have to be in the same region.".to_string(),
                    format!(
                        "nsg {} {}, subnet: {} {}",
                        nsg.name, nsg.location, subnet.name, vnet.location
                    ),
                ],
            ));
        }

        if subnet.nsg_id().is_some() && subnet.nsg_id() == nsg.id.as_deref() {
            log::info!(
                "Subnet {} and NSG {} already associated, not updating",
                subnet.name,
                name
            );
            return Ok(());
        }

        log::info!(
            "associating subnet {} with nsg: {} {}",
            subnet.name,
            self.resource_group(),
            name
        );

        let mut updated = subnet.clone();
        updated.properties.network_security_group = Some(nsg_link(&nsg)?);
        let result = self
            .client()
            .begin_create_or_update_subnet(self.resource_group(), &vnet.name, &updated)
            .await;
        accept_concurrent(result, "associate nsg with subnet", |err| {
            Error::unable_to_update(format!(
                "Unable to associate nsg {name} with subnet {} due to {err}",
                subnet.name
            ))
        })?;

        *subnet = updated;
        Ok(())
    }

    /// Unlink NSG `name` from `subnet`, which must live in `vnet`.
    pub async fn dissociate_subnet(
        &self,
        name: &str,
        vnet: &VirtualNetwork,
        subnet: &mut Subnet,
    ) -> Result<()> {
        let Some(linked_id) = subnet.nsg_id() else {
            return Ok(());
        };
        let Some(nsg) = self.get_nsg(name).await else {
            return Err(Error::unable_to_find(format!(
                "cannot update nsg rules. nsg {name} not found"
            )));
        };
        if nsg.id.as_deref() != Some(linked_id) {
            return Err(Error::new(
                ErrorCode::UnableToUpdate,
                vec![
                    "subnet is not associated with this nsg.".to_string(),
                    format!(
                        "nsg {}, subnet: {}, subnet.nsg: {}",
                        nsg.id.as_deref().unwrap_or_default(),
                        subnet.name,
                        linked_id
                    ),
                ],
            ));
        }

        log::info!(
            "dissociating subnet {} with nsg: {} {}",
            subnet.name,
            self.resource_group(),
            name
        );

        let mut updated = subnet.clone();
        updated.properties.network_security_group = None;
        let result = self
            .client()
            .begin_create_or_update_subnet(self.resource_group(), &vnet.name, &updated)
            .await;
        accept_concurrent(result, "dissociate nsg with subnet", |err| {
            Error::unable_to_update(format!(
                "Unable to dissociate nsg {name} with subnet {} due to {err}",
                subnet.name
            ))
        })?;

        *subnet = updated;
        Ok(())
    }
}
