//! InventoryClient trait for mocking
//!
//! This trait abstracts the InventoryClient to enable mocking in unit tests.
//! The concrete InventoryClient implements this trait, and tests can use mock
//! implementations.

use crate::error::InventoryError;
use crate::models::{ClusterStatusReport, Host, HostStage};
use uuid::Uuid;

/// Trait for inventory API client operations
///
/// This trait enables mocking of inventory API calls for unit testing.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait InventoryClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// List the hosts registered for this cluster
    async fn list_hosts(&self) -> Result<Vec<Host>, InventoryError>;

    /// Update the install progress of a single host
    async fn update_host_progress(
        &self,
        host_id: &Uuid,
        stage: HostStage,
    ) -> Result<(), InventoryError>;

    /// Forward the aggregate cluster status report
    async fn report_status(&self, report: &ClusterStatusReport) -> Result<(), InventoryError>;
}
