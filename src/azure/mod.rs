//! Azure network provider interaction.
//!
//! This module handles all Azure-related operations:
//! - [`cli`] - Command execution for Azure CLI
//! - [`arm`] - Resource Manager URLs and error classification
//! - [`transport`] - `az rest` and HTTPS request transports
//! - [`client`] - The [`NetworkClient`] seam and its ARM implementation

mod arm;
mod cli;
mod client;
mod transport;

use crate::config::{Config, TransportKind};
use std::error::Error;

// Re-export public types and functions
pub use arm::{classify_cli_error, classify_http_error, NETWORK_API_VERSION};
pub use cli::CliError;
pub use client::{ArmNetworkClient, NetworkClient};
pub use transport::{AzCliTransport, HttpTransport, Transport};

/// Build the network client selected by `config`.
pub async fn connect(config: &Config) -> Result<ArmNetworkClient, Box<dyn Error>> {
    match config.transport {
        TransportKind::Cli => {
            let transport = AzCliTransport::new();
            let subscription_id = match &config.subscription_id {
                Some(id) => id.clone(),
                None => transport.default_subscription().await?,
            };
            log::info!("Using az cli transport, subscription {subscription_id}");
            Ok(ArmNetworkClient::new(Box::new(transport), &subscription_id))
        }
        TransportKind::Http => {
            let subscription_id = config
                .subscription_id
                .as_deref()
                .ok_or("AZURE_SUBSCRIPTION_ID is required for the http transport")?;
            log::info!("Using http transport, subscription {subscription_id}");
            Ok(ArmNetworkClient::new(
                Box::new(HttpTransport::new()),
                subscription_id,
            ))
        }
    }
}
