//! Azure subnet data model.

use super::SubResource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubnetProperties {
    /// CIDR block of the subnet (None if not configured).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    /// Network Security Group reference (if attached).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,
    /// Everything else the provider returned, written back untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Represents an Azure subnet. Subnets carry no location, the parent
/// [`VirtualNetwork`](super::VirtualNetwork) does.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Subnet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the subnet.
    pub name: String,
    #[serde(default)]
    pub properties: SubnetProperties,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Subnet {
    pub fn new(name: &str, address_prefix: &str) -> Self {
        Subnet {
            name: name.to_string(),
            properties: SubnetProperties {
                address_prefix: Some(address_prefix.to_string()),
                ..Default::default()
            },
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
