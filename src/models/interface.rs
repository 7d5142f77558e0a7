//! Azure network interface (NIC) data model.

use super::SubResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,
    /// IP configurations and the rest, written back untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Represents an Azure network interface.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub properties: NetworkInterfaceProperties,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl NetworkInterface {
    pub fn new(name: &str, location: &str) -> Self {
        NetworkInterface {
            name: name.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    /// Id of the linked NSG, if any.
    pub fn nsg_id(&self) -> Option<&str> {
        self.properties
            .network_security_group
            .as_ref()
            .map(|nsg| nsg.id.as_str())
    }
}
