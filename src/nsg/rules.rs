//! Inbound allow-list rules.
//!
//! The rule set of an NSG is always replaced as a whole, never merged.

use super::NsgManager;
use crate::azure::NetworkClient;
use crate::error::{Error, Result};
use crate::models::{NetworkSecurityGroupConfig, SecurityRule, MIN_RULE_PRIORITY};

/// Rules per NSG allowed by the provider.
pub const MAX_RULE_COUNT: usize = 1000;

/// One inbound allow rule per source, IPs first, priorities counting up from 100.
pub fn build_allow_rules(sources: &NetworkSecurityGroupConfig) -> Result<Vec<SecurityRule>> {
    if sources.len() > MAX_RULE_COUNT {
        return Err(Error::invalid_request(format!(
            "too many rules provided {}. Max allowed: {}",
            sources.len(),
            MAX_RULE_COUNT
        )));
    }

    // MAX_RULE_COUNT keeps the last priority below MAX_RULE_PRIORITY.
    let rules = sources
        .sources()
        .zip(MIN_RULE_PRIORITY..)
        .map(|(src, priority)| SecurityRule::allow_inbound(priority, src))
        .collect();
    Ok(rules)
}

impl<C: NetworkClient> NsgManager<C> {
    /// Replace the inbound rules of NSG `name` with one allow rule per source.
    pub async fn set_allowed(
        &self,
        name: &str,
        sources: &NetworkSecurityGroupConfig,
    ) -> Result<()> {
        let Some(mut nsg) = self.get_nsg(name).await else {
            return Err(Error::unable_to_find(format!(
                "cannot update nsg rules. nsg {name} not found"
            )));
        };

        log::info!(
            "setting allowed incoming connection sources for nsg: {} {}",
            self.resource_group(),
            name
        );
        nsg.properties.security_rules = build_allow_rules(sources)?;
        self.update_nsg(&nsg).await
    }

    /// Remove every custom rule from NSG `name`.
    pub async fn clear_all_rules(&self, name: &str) -> Result<()> {
        self.set_allowed(name, &NetworkSecurityGroupConfig::default())
            .await
    }

    pub async fn get_all_rules(&self, name: &str) -> Result<Vec<SecurityRule>> {
        match self.get_nsg(name).await {
            Some(nsg) => Ok(nsg.properties.security_rules),
            None => Err(Error::unable_to_find(format!(
                "cannot get nsg rules. nsg {name} not found"
            ))),
        }
    }
}
