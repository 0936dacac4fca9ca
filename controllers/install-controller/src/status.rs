//! Shared status record.
//!
//! The status monitor loop is the only writer; the supervisor keeps the
//! surviving reference. The record is a guarded cell so a future second
//! writer fails safely on contention instead of racing, even though today's
//! design has exactly one sequential writer and needs no coordination.

use chrono::{DateTime, Utc};
use inventory_client::ClusterStatusReport;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Aggregate node state observed by the latest completed monitoring pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterState {
    /// Number of nodes registered with the cluster API
    pub total_nodes: usize,
    /// Names of nodes whose Ready condition is true
    pub ready_nodes: BTreeSet<String>,
    /// When the observation was made; `None` until the first pass completes
    pub observed_at: Option<DateTime<Utc>>,
}

impl ClusterState {
    /// Render this state as the wire report sent to the inventory service.
    #[must_use]
    pub fn to_report(&self, cluster_id: Uuid) -> ClusterStatusReport {
        ClusterStatusReport {
            cluster_id,
            total_nodes: self.total_nodes,
            ready_nodes: self.ready_nodes.iter().cloned().collect(),
            reported_at: self.observed_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Guarded cell holding the latest [`ClusterState`].
#[derive(Debug, Default)]
pub struct StatusRecord {
    inner: Mutex<ClusterState>,
}

impl StatusRecord {
    fn guard(&self) -> MutexGuard<'_, ClusterState> {
        // A poisoned lock means a panic mid-write elsewhere; the state is
        // replaced wholesale on publish, so the value is still coherent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the record with the state of a fully completed pass.
    pub fn publish(&self, state: ClusterState) {
        *self.guard() = state;
    }

    /// Copy of the most recently published state.
    pub fn snapshot(&self) -> ClusterState {
        self.guard().clone()
    }
}
