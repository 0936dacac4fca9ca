//! Cluster control-plane API adapter
//!
//! Wraps the in-cluster Kubernetes client with the handful of operations the
//! install controller needs while a cluster is converging after bootstrap:
//!
//! - **CSR Operations**: List certificate signing requests, approve node-join
//!   requests via the `approval` subresource
//! - **Node Operations**: List nodes for readiness observation
//! - **Proxy Discovery**: Read the cluster-wide proxy object so outbound
//!   reporting can be routed through the cluster's egress proxy
//!
//! Construction uses default in-cluster discovery (`Client::try_default`),
//! no arguments required.

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cluster_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::ClusterClient;
pub use cluster_trait::ClusterClientTrait;
pub use error::ClusterError;
pub use models::ClusterProxy;
#[cfg(feature = "test-util")]
pub use mock::MockClusterClient;
