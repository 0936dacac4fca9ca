//! Reconciliation passes and control loops.
//!
//! Two independent, non-terminating loops drive convergence:
//! - the CSR approval loop keeps approving pending node-join certificate
//!   signing requests so joining nodes can authenticate
//! - the status monitor loop observes node readiness, folds it into the
//!   shared [`StatusRecord`] and forwards the report to the inventory service
//!
//! A failed pass is logged and retried on the next scheduled pass; neither
//! loop has a terminal state short of process death.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::status::{ClusterState, StatusRecord};
use chrono::Utc;
use cluster_client::ClusterClientTrait;
use inventory_client::{HostStage, InventoryClientTrait};
use k8s_openapi::api::certificates::v1::CertificateSigningRequest;
use k8s_openapi::api::core::v1::Node;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Fixed pacing between status monitoring passes.
pub const GENERAL_WAIT_INTERVAL: Duration = Duration::from_secs(30);

/// Fixed pacing between CSR approval passes.
pub const CSR_APPROVE_INTERVAL: Duration = Duration::from_secs(30);

/// Executes the reconciliation passes against the two remote APIs.
///
/// Shared by both loops through an `Arc`; holds only the configuration and
/// the two long-lived client adapters, which are safe for concurrent use.
pub struct Reconciler {
    config: ControllerConfig,
    cluster: Box<dyn ClusterClientTrait>,
    inventory: Box<dyn InventoryClientTrait>,
}

impl Reconciler {
    /// Creates a new reconciler over the given adapters.
    pub fn new(
        config: ControllerConfig,
        cluster: Box<dyn ClusterClientTrait>,
        inventory: Box<dyn InventoryClientTrait>,
    ) -> Self {
        Self {
            config,
            cluster,
            inventory,
        }
    }

    /// CSR approval loop: approve pending node-join requests, forever.
    ///
    /// `shutdown` is an extension point for a future shutdown contract. It is
    /// deliberately never polled: approval has to keep running so in-flight
    /// node joins can still complete after a stop has been requested. The
    /// only way out of this loop is process termination.
    pub async fn run_csr_approval(&self, shutdown: CancellationToken) {
        let _ = shutdown;
        loop {
            match self.approve_pending_csrs().await {
                Ok(0) => {}
                Ok(count) => info!("Approved {} certificate signing requests", count),
                Err(e) => warn!("CSR approval pass failed: {}", e),
            }
            sleep(CSR_APPROVE_INTERVAL).await;
        }
    }

    /// Status monitor loop: observe-publish-report, then sleep, forever.
    ///
    /// Passes are strictly sequential, so `record` has exactly one writer.
    pub async fn run_status_monitor(&self, record: &StatusRecord) {
        loop {
            if let Err(e) = self.monitor_nodes(record).await {
                warn!("Node status pass failed: {}", e);
            }
            sleep(GENERAL_WAIT_INTERVAL).await;
        }
    }

    /// One CSR approval pass. Returns how many requests were approved.
    ///
    /// A single request failing to approve does not abort the rest of the
    /// pass; approval is idempotent, so anything missed is retried next pass.
    pub(crate) async fn approve_pending_csrs(&self) -> Result<usize, ControllerError> {
        let csrs = self.cluster.list_csrs().await?;
        let mut approved = 0;
        for csr in csrs.iter().filter(|csr| csr_is_pending(csr)) {
            let name = csr.metadata.name.as_deref().unwrap_or("<unnamed>");
            match self.cluster.approve_csr(csr).await {
                Ok(()) => {
                    info!("Approved certificate signing request {}", name);
                    approved += 1;
                }
                Err(e) => warn!("Failed to approve certificate signing request {}: {}", name, e),
            }
        }
        Ok(approved)
    }

    /// One status monitoring pass.
    ///
    /// Observes node readiness, moves hosts whose node went ready to the
    /// `Done` stage, publishes the new state into the record, then forwards
    /// the report. The record is only ever replaced with a fully computed
    /// state, so a failure at any step leaves the previous state intact.
    pub(crate) async fn monitor_nodes(&self, record: &StatusRecord) -> Result<(), ControllerError> {
        let nodes = self.cluster.list_nodes().await?;
        let ready_nodes: BTreeSet<String> = nodes
            .iter()
            .filter(|node| node_is_ready(node))
            .filter_map(|node| node.metadata.name.clone())
            .collect();

        let hosts = self.inventory.list_hosts().await?;
        for host in &hosts {
            let Some(hostname) = host.requested_hostname.as_deref() else {
                continue;
            };
            if ready_nodes.contains(hostname) && host.current_stage() != Some(HostStage::Done) {
                match self
                    .inventory
                    .update_host_progress(&host.id, HostStage::Done)
                    .await
                {
                    Ok(()) => info!("Host {} ({}) is ready, marked Done", hostname, host.id),
                    Err(e) => warn!("Failed to update progress for host {}: {}", host.id, e),
                }
            }
        }

        let state = ClusterState {
            total_nodes: nodes.len(),
            ready_nodes,
            observed_at: Some(Utc::now()),
        };
        let report = state.to_report(self.config.cluster_id);
        record.publish(state);

        self.inventory.report_status(&report).await?;
        Ok(())
    }
}

/// A CSR is pending while no approval decision has been recorded on it.
pub(crate) fn csr_is_pending(csr: &CertificateSigningRequest) -> bool {
    csr.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .is_none_or(|conditions| {
            !conditions
                .iter()
                .any(|c| c.type_ == "Approved" || c.type_ == "Denied")
        })
}

/// A node is ready when its Ready condition is reported true.
pub(crate) fn node_is_ready(node: &Node) -> bool {
    node.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .is_some_and(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
}
