//! Lifecycle and association management for Azure network security groups.
//!
//! Modules:
//! - [`models`] - ARM records for NSGs, rules, NICs, subnets and vnets
//! - [`azure`] - The [`azure::NetworkClient`] seam and its `az`/HTTPS implementations
//! - [`nsg`] - [`nsg::NsgManager`], the idempotent operations on top of it
//! - [`config`] - Environment configuration
//! - [`error`] - Structured errors returned to callers

pub mod azure;
pub mod config;
pub mod error;
pub mod models;
pub mod nsg;

pub use error::{is_concurrent_request_error, Error, ErrorCode, ProviderError, Result};
pub use nsg::{ok_to_delete, Nsg, NsgManager};
