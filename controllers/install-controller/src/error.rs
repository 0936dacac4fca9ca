//! Controller-specific error types.
//!
//! Startup errors are fatal: they propagate out of `main` and terminate the
//! process with a non-zero exit before any control loop is launched. Errors
//! inside a loop pass are logged and swallowed by the loop driver instead.

use cluster_client::ClusterError;
use inventory_client::InventoryError;
use thiserror::Error;

/// Errors that can occur in the Install Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Cluster API error
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// Inventory API error
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A control loop task died (panic or unexpected exit)
    #[error("Control loop failure: {0}")]
    Task(String),
}
