//! Data records exchanged with the network provider.
//!
//! This module contains the plain data structures used throughout the crate:
//! - [`NetworkSecurityGroup`] and [`SecurityRule`] - NSG and its rules
//! - [`NetworkInterface`] - NIC with optional NSG link
//! - [`Subnet`] and [`VirtualNetwork`] - subnet with optional NSG link, and its parent
//! - [`NetworkSecurityGroupConfig`] - allow-list input

mod config;
mod interface;
mod nsg;
mod subnet;
mod vnet;

/// Azure region name, e.g. `eastus`.
pub type Region = String;

// Re-export public types
pub use config::NetworkSecurityGroupConfig;
pub use interface::{NetworkInterface, NetworkInterfaceProperties};
pub use nsg::{
    NetworkSecurityGroup, NsgProperties, SecurityRule, SecurityRuleAccess, SecurityRuleDirection,
    SecurityRuleProperties, SubResource, MAX_RULE_PRIORITY, MIN_RULE_PRIORITY,
};
pub use subnet::{Subnet, SubnetProperties};
pub use vnet::VirtualNetwork;
