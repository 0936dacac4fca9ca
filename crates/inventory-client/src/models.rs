//! Inventory API data models
//!
//! Serde models for the subset of the inventory REST API the install
//! controller talks to: cluster hosts, host install progress, and the
//! aggregate status report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Install progress stage of a single host, as tracked by the inventory
/// service. The wire values use the service's human-readable stage names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostStage {
    /// Host image written, machine rebooting into the installed system
    Rebooting,
    /// Node has joined the cluster control plane
    Joined,
    /// Node joined and is being configured
    Configuring,
    /// Host installation finished, node is ready
    Done,
    /// Host installation failed
    Failed,
}

/// Install progress of a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProgress {
    /// Current install stage
    pub current_stage: HostStage,
    /// Optional free-form detail for the stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_info: Option<String>,
}

/// A host registered with the inventory service for this cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Inventory-side host identifier
    pub id: Uuid,
    /// Hostname the host requested at discovery time; matches the node name
    /// once the node joins the cluster
    #[serde(default)]
    pub requested_hostname: Option<String>,
    /// Latest reported install progress
    #[serde(default)]
    pub progress: Option<HostProgress>,
}

impl Host {
    /// Current install stage, if any progress has been reported
    #[must_use]
    pub fn current_stage(&self) -> Option<HostStage> {
        self.progress.as_ref().map(|p| p.current_stage)
    }
}

/// Aggregate cluster status forwarded to the inventory service on every
/// monitoring pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatusReport {
    /// Cluster this report belongs to
    pub cluster_id: Uuid,
    /// Number of nodes currently registered with the cluster API
    pub total_nodes: usize,
    /// Names of nodes whose Ready condition is true
    pub ready_nodes: Vec<String>,
    /// When the observation was made
    pub reported_at: DateTime<Utc>,
}

impl ClusterStatusReport {
    /// True when every registered node is ready
    #[must_use]
    pub fn all_nodes_ready(&self) -> bool {
        self.total_nodes > 0 && self.ready_nodes.len() == self.total_nodes
    }
}
