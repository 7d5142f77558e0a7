//! Network security group and security rule records.
//!
//! Field names follow the ARM JSON schema so a group fetched from the provider
//! can be modified and written straight back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Lowest priority a custom rule may use.
pub const MIN_RULE_PRIORITY: u32 = 100;
/// Highest priority a custom rule may use.
pub const MAX_RULE_PRIORITY: u32 = 4096;

/// Reference to another ARM resource by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubResource {
    pub id: String,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        SubResource { id: id.into() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityRuleAccess {
    Allow,
    Deny,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityRuleDirection {
    Inbound,
    Outbound,
}

/// Properties of a single security rule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleProperties {
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_port_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_port_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_address_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_address_prefix: Option<String>,
    pub access: SecurityRuleAccess,
    pub priority: u32,
    pub direction: SecurityRuleDirection,
    /// Provider fields not modelled above (descriptions, prefix lists, state).
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A security rule as stored on an NSG.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SecurityRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub properties: SecurityRuleProperties,
}

impl SecurityRule {
    /// Inbound allow rule for any protocol and port from `source`.
    ///
    /// The rule is named `Allow<priority>`.
    pub fn allow_inbound(priority: u32, source: &str) -> Self {
        SecurityRule {
            name: format!("Allow{priority}"),
            id: None,
            properties: SecurityRuleProperties {
                protocol: "*".to_string(),
                source_port_range: Some("*".to_string()),
                destination_port_range: Some("*".to_string()),
                source_address_prefix: Some(source.to_string()),
                destination_address_prefix: Some("*".to_string()),
                access: SecurityRuleAccess::Allow,
                priority,
                direction: SecurityRuleDirection::Inbound,
                other: Map::new(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NsgProperties {
    /// Custom rules. Always serialized, an empty list clears the group.
    #[serde(default)]
    pub security_rules: Vec<SecurityRule>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Azure network security group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkSecurityGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub properties: NsgProperties,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl NetworkSecurityGroup {
    /// New, empty group. `id` is assigned by the provider.
    pub fn new(name: &str, location: &str) -> Self {
        NetworkSecurityGroup {
            name: name.to_string(),
            location: location.to_string(),
            ..Default::default()
        }
    }

    pub fn security_rules(&self) -> &[SecurityRule] {
        &self.properties.security_rules
    }
}
