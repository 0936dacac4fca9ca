//! Install Controller
//!
//! Runs inside a cluster that is being installed and drives post-bootstrap
//! convergence:
//! - Approves pending node-join certificate signing requests so new nodes
//!   can authenticate to the control plane without an operator
//! - Observes node readiness and reports aggregate status back to the
//!   external inventory service tracking the installation
//!
//! Both jobs run as independent, non-terminating control loops; the process
//! is expected to be torn down by the surrounding platform once installation
//! is complete.

mod config;
mod controller;
mod error;
mod reconciler;
#[cfg(test)]
mod reconciler_test;
mod status;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Install Controller");

    // Bind configuration from environment variables
    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Cluster ID: {}", config.cluster_id);
    info!("  Inventory URL: {}", config.inventory_url);

    // Initialize and run controller
    let controller = Controller::new(config).await?;
    controller.run().await
}
