//! Cluster client errors

use thiserror::Error;

/// Errors that can occur when interacting with the cluster API
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Cluster API returned an unexpected response
    #[error("Cluster API error: {0}")]
    Api(String),

    /// A resource is missing a field the controller relies on
    #[error("Invalid resource: {0}")]
    InvalidResource(String),
}
