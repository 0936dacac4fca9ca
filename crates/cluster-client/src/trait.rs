//! ClusterClient trait for mocking
//!
//! This trait abstracts the ClusterClient to enable mocking in unit tests.
//! The concrete ClusterClient implements this trait, and tests can use mock
//! implementations.

use crate::error::ClusterError;
use crate::models::ClusterProxy;
use k8s_openapi::api::certificates::v1::CertificateSigningRequest;
use k8s_openapi::api::core::v1::Node;

/// Trait for cluster API operations
///
/// This trait enables mocking of cluster API calls for unit testing.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterClientTrait: Send + Sync {
    /// List all certificate signing requests in the cluster
    async fn list_csrs(&self) -> Result<Vec<CertificateSigningRequest>, ClusterError>;

    /// Approve a certificate signing request via the `approval` subresource
    async fn approve_csr(&self, csr: &CertificateSigningRequest) -> Result<(), ClusterError>;

    /// List all nodes in the cluster
    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError>;

    /// Read the cluster-wide proxy settings, if the cluster defines any
    async fn get_proxy_settings(&self) -> Result<Option<ClusterProxy>, ClusterError>;
}
