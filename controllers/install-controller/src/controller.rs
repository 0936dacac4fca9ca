//! Main controller implementation.
//!
//! This module contains the `Controller` struct that performs the startup
//! sequence and launches the two control loops as independent tasks. Every
//! startup step failure is fatal; once the loops are launched the supervisor
//! only blocks.

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::status::{ClusterState, StatusRecord};
use cluster_client::{ClusterClient, ClusterClientTrait};
use inventory_client::{InventoryClient, InventoryClientConfig, ProxySettings};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Supervisor aggregate: owns the status record and the two loop tasks.
pub struct Controller {
    status: Arc<StatusRecord>,
    csr_loop: JoinHandle<()>,
    status_loop: JoinHandle<()>,
}

impl Controller {
    /// Creates a new controller instance.
    ///
    /// Startup ordering: cluster adapter → proxy discovery → inventory
    /// adapter → reconciler → CSR loop → status loop. Any failure before the
    /// loops are spawned aborts the whole process.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing Install Controller");

        // Create cluster API client (in-cluster credentials)
        let cluster = ClusterClient::new().await?;
        info!("Cluster API client created");

        // Pass the cluster-wide proxy through to outbound inventory traffic
        let proxy = cluster.get_proxy_settings().await?;
        match &proxy {
            Some(p) => info!("Using cluster proxy settings: {:?}", p),
            None => info!("No cluster proxy configured"),
        }

        // Create inventory API client
        let inventory = InventoryClient::new(InventoryClientConfig {
            cluster_id: config.cluster_id,
            base_url: config.inventory_url.clone(),
            pull_secret_token: config.pull_secret_token.clone(),
            skip_cert_verification: config.skip_cert_verification,
            ca_cert_path: config.ca_cert_path.clone(),
            proxy: proxy.map(|p| ProxySettings {
                http_proxy: p.http_proxy,
                https_proxy: p.https_proxy,
                no_proxy: p.no_proxy,
            }),
        })?;
        info!("Inventory API client created for {}", config.inventory_url);

        let cluster_id = config.cluster_id;
        let reconciler = Arc::new(Reconciler::new(
            config,
            Box::new(cluster),
            Box::new(inventory),
        ));

        // The record outlives both loops; the status loop is its only writer
        let status = Arc::new(StatusRecord::default());

        // Handed to the CSR loop but never cancelled here: the loop is kept
        // alive for the whole process lifetime (see Reconciler::run_csr_approval)
        let shutdown = CancellationToken::new();
        let csr_reconciler = Arc::clone(&reconciler);
        let csr_loop = tokio::spawn(async move {
            csr_reconciler.run_csr_approval(shutdown).await;
        });

        let monitor_reconciler = Arc::clone(&reconciler);
        let monitor_record = Arc::clone(&status);
        let status_loop = tokio::spawn(async move {
            monitor_reconciler.run_status_monitor(&monitor_record).await;
        });

        info!("Install Controller deployed for cluster {}", cluster_id);

        Ok(Self {
            status,
            csr_loop,
            status_loop,
        })
    }

    /// Latest aggregate state published by the status loop.
    pub fn status_snapshot(&self) -> ClusterState {
        self.status.snapshot()
    }

    /// Blocks for the process lifetime.
    ///
    /// The loops never return, so in normal operation this future is only
    /// resolved by process termination. Reaching the code after the select
    /// means a loop task died, which is itself a fatal error.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Install Controller running");

        let died = tokio::select! {
            result = &mut self.csr_loop => ("CSR approval", result),
            result = &mut self.status_loop => ("status monitor", result),
        };

        let (name, result) = died;
        error!(
            "{} loop exited unexpectedly; last known status: {:?}",
            name,
            self.status_snapshot()
        );
        match result {
            Ok(()) => Err(ControllerError::Task(format!("{} loop exited", name))),
            Err(e) => Err(ControllerError::Task(format!("{} loop panicked: {}", name, e))),
        }
    }
}
