//! NSG manager.
//!
//! This module contains the operations on network security groups:
//! - [`manager`] - Lifecycle: get, create, update, list, delete, reap
//! - [`rules`] - Replacing the inbound allow-list
//! - [`association`] - Linking NSGs to NICs and subnets
//! - [`handle`] - [`Nsg`], a validated name/region pair

mod association;
mod handle;
mod manager;
mod rules;

// Re-export public types and functions
pub use handle::{Nsg, MAX_NSG_NAME_LEN};
pub use manager::{is_onefuzz_nsg, ok_to_delete, NsgManager};
pub use rules::{build_allow_rules, MAX_RULE_COUNT};
