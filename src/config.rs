//! Environment configuration.
//!
//! Values are read from the process environment, after `dotenv` has had a
//! chance to load a `.env` file.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Resource group holding every NSG managed by this crate.
pub const RESOURCE_GROUP_ENV: &str = "ONEFUZZ_RESOURCE_GROUP";
/// Optional owner, written as the `OWNER` tag on new NSGs.
pub const OWNER_ENV: &str = "ONEFUZZ_OWNER";
/// Subscription holding the resource group.
pub const SUBSCRIPTION_ENV: &str = "AZURE_SUBSCRIPTION_ID";
/// `cli` or `http`.
pub const TRANSPORT_ENV: &str = "NSG_TRANSPORT";

/// Tag key used for the owner value.
pub const OWNER_TAG: &str = "OWNER";

/// How requests reach the management endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TransportKind {
    /// `az rest`, reusing the Azure CLI login.
    #[default]
    Cli,
    /// Direct HTTPS with the `azure_identity` credential chain.
    Http,
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" | "az" => Ok(TransportKind::Cli),
            "http" | "rest" => Ok(TransportKind::Http),
            other => Err(format!("unknown transport '{other}', expected cli or http")),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Cli => f.write_str("cli"),
            TransportKind::Http => f.write_str("http"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub resource_group: String,
    /// Resolved from the CLI login when missing and the CLI transport is used.
    pub subscription_id: Option<String>,
    pub owner: Option<String>,
    pub transport: TransportKind,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Values returned by `overrides` (command line flags) win over the environment.
    pub fn from_env<F>(overrides: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        Config::from_lookup(|key| overrides(key).or_else(|| std::env::var(key).ok()))
    }

    /// Read configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let resource_group =
            get(RESOURCE_GROUP_ENV).ok_or_else(|| format!("{RESOURCE_GROUP_ENV} is not set"))?;
        let transport = match get(TRANSPORT_ENV) {
            Some(value) => value.parse::<TransportKind>()?,
            None => TransportKind::default(),
        };

        let config = Config {
            resource_group,
            subscription_id: get(SUBSCRIPTION_ENV),
            owner: get(OWNER_ENV),
            transport,
        };
        log::debug!("config: {:?}", config);
        Ok(config)
    }
}
