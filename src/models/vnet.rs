//! Azure Virtual Network (VNet) data model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The parent of a [`Subnet`](super::Subnet). Only the fields needed to
/// address a subnet and check its region are modelled.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct VirtualNetwork {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the virtual network.
    pub name: String,
    /// Azure region location.
    pub location: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl VirtualNetwork {
    pub fn new(name: &str, location: &str) -> Self {
        VirtualNetwork {
            name: name.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }
}

impl fmt::Display for VirtualNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}
