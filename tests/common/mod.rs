//! In-memory network provider shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use azure_nsg_manager::azure::NetworkClient;
use azure_nsg_manager::error::CONCURRENT_REQUEST_ERROR;
use azure_nsg_manager::models::{NetworkInterface, NetworkSecurityGroup, Subnet};
use azure_nsg_manager::{NsgManager, ProviderError};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

pub const RESOURCE_GROUP: &str = "fuzzing-rg";

/// A write the provider accepted (or was asked to do and failed).
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Nsg(NetworkSecurityGroup),
    DeleteNsg(String),
    Nic(NetworkInterface),
    Subnet { vnet: String, subnet: Subnet },
}

#[derive(Default)]
struct State {
    nsgs: BTreeMap<String, NetworkSecurityGroup>,
    writes: Vec<Write>,
    /// Consumed by the next write, in order.
    write_errors: VecDeque<ProviderError>,
    get_error: Option<ProviderError>,
}

/// Fake provider: NSGs live in a map, NIC and subnet writes are only recorded.
#[derive(Default)]
pub struct FakeNetworkClient {
    state: Mutex<State>,
}

pub fn nsg_id(name: &str) -> String {
    format!(
        "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.Network/networkSecurityGroups/{name}"
    )
}

pub fn concurrent_error() -> ProviderError {
    ProviderError::Cloud(format!(
        "Conflict({{\"error\":{{\"code\":\"RetryableError\",\"message\":\"{CONCURRENT_REQUEST_ERROR}.\"}}}})"
    ))
}

pub fn cloud_error(msg: &str) -> ProviderError {
    ProviderError::Cloud(msg.to_string())
}

impl FakeNetworkClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an NSG as if it had been created earlier.
    pub fn with_nsg(self, name: &str, location: &str) -> Self {
        let mut nsg = NetworkSecurityGroup::new(name, location);
        nsg.id = Some(nsg_id(name));
        self.state
            .lock()
            .expect("lock poisoned")
            .nsgs
            .insert(name.to_string(), nsg);
        self
    }

    /// Make the next write fail with `err`.
    pub fn fail_next_write(&self, err: ProviderError) {
        self.state
            .lock()
            .expect("lock poisoned")
            .write_errors
            .push_back(err);
    }

    /// Make every read fail with `err`.
    pub fn fail_reads(&self, err: ProviderError) {
        self.state.lock().expect("lock poisoned").get_error = Some(err);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.lock().expect("lock poisoned").writes.clone()
    }

    pub fn stored_nsg(&self, name: &str) -> Option<NetworkSecurityGroup> {
        self.state
            .lock()
            .expect("lock poisoned")
            .nsgs
            .get(name)
            .cloned()
    }

    fn write(&self, write: Write) -> Result<(), ProviderError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.writes.push(write.clone());
        if let Some(err) = state.write_errors.pop_front() {
            return Err(err);
        }
        match write {
            Write::Nsg(mut nsg) => {
                if nsg.id.is_none() {
                    nsg.id = Some(nsg_id(&nsg.name));
                }
                state.nsgs.insert(nsg.name.clone(), nsg);
            }
            Write::DeleteNsg(name) => {
                if state.nsgs.remove(&name).is_none() {
                    return Err(ProviderError::NotFound(name));
                }
            }
            Write::Nic(_) | Write::Subnet { .. } => {}
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkClient for FakeNetworkClient {
    async fn get_nsg(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<NetworkSecurityGroup, ProviderError> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        let state = self.state.lock().expect("lock poisoned");
        if let Some(err) = &state.get_error {
            return Err(err.clone());
        }
        state
            .nsgs
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    async fn list_nsgs(
        &self,
        resource_group: &str,
    ) -> Result<Vec<NetworkSecurityGroup>, ProviderError> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        let state = self.state.lock().expect("lock poisoned");
        if let Some(err) = &state.get_error {
            return Err(err.clone());
        }
        Ok(state.nsgs.values().cloned().collect())
    }

    async fn begin_create_or_update_nsg(
        &self,
        resource_group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<(), ProviderError> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        let mut nsg = nsg.clone();
        nsg.name = name.to_string();
        self.write(Write::Nsg(nsg))
    }

    async fn begin_delete_nsg(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        self.write(Write::DeleteNsg(name.to_string()))
    }

    async fn begin_create_or_update_nic(
        &self,
        resource_group: &str,
        nic: &NetworkInterface,
    ) -> Result<(), ProviderError> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        self.write(Write::Nic(nic.clone()))
    }

    async fn begin_create_or_update_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        subnet: &Subnet,
    ) -> Result<(), ProviderError> {
        assert_eq!(resource_group, RESOURCE_GROUP);
        self.write(Write::Subnet {
            vnet: vnet_name.to_string(),
            subnet: subnet.clone(),
        })
    }
}

pub fn manager(client: FakeNetworkClient) -> NsgManager<FakeNetworkClient> {
    NsgManager::new(client, RESOURCE_GROUP)
}
