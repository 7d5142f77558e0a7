//! Allow-list input for an NSG.

use serde::{Deserialize, Serialize};

/// Sources allowed to reach machines behind an NSG.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSecurityGroupConfig {
    /// IP addresses or CIDR prefixes.
    #[serde(default)]
    pub allowed_ips: Vec<String>,
    /// Provider service tags, e.g. `AzureCloud`.
    #[serde(default)]
    pub allowed_service_tags: Vec<String>,
}

impl NetworkSecurityGroupConfig {
    pub fn new(allowed_ips: Vec<String>, allowed_service_tags: Vec<String>) -> Self {
        NetworkSecurityGroupConfig {
            allowed_ips,
            allowed_service_tags,
        }
    }

    /// Total number of sources, one rule each.
    pub fn len(&self) -> usize {
        self.allowed_ips.len() + self.allowed_service_tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All sources in rule order: IPs first, then service tags.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.allowed_ips
            .iter()
            .chain(self.allowed_service_tags.iter())
            .map(String::as_str)
    }
}
