//! Inventory REST API client
//!
//! A Rust client library for the installation-orchestration ("inventory")
//! service that tracks cluster installation progress. The install controller
//! uses it to report aggregate node status and per-host install progress
//! from inside the cluster being installed.
//!
//! # Example
//!
//! ```no_run
//! use inventory_client::{InventoryClient, InventoryClientConfig, InventoryClientTrait};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InventoryClientConfig {
//!     cluster_id: Uuid::new_v4(),
//!     base_url: "https://assisted-service.example.com".to_string(),
//!     pull_secret_token: "your-token".to_string(),
//!     skip_cert_verification: false,
//!     ca_cert_path: None,
//!     proxy: None,
//! };
//! let client = InventoryClient::new(config)?;
//!
//! // Fetch the hosts registered for this cluster
//! let hosts = client.list_hosts().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Host Operations**: List hosts, update per-host install progress
//! - **Status Reporting**: Forward the aggregate cluster status report
//! - **TLS Policy**: Optional certificate-verification skip and extra CA bundle
//! - **Proxy Passthrough**: Honors cluster-wide proxy settings

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod inventory_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{InventoryClient, InventoryClientConfig, ProxySettings};
pub use error::InventoryError;
pub use inventory_trait::InventoryClientTrait;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockInventoryClient;
