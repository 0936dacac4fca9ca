//! Inventory API client
//!
//! Implements the REST client for the installation-orchestration service.
//! API structure: /api/v1/clusters/{cluster_id}/hosts and
//! /api/v1/clusters/{cluster_id}/status

use crate::error::InventoryError;
use crate::inventory_trait::InventoryClientTrait;
use crate::models::{ClusterStatusReport, Host, HostProgress, HostStage};
use reqwest::{Certificate, Client, NoProxy, Proxy};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Cluster-wide proxy settings applied to outbound inventory requests.
///
/// Discovered from the cluster being installed and passed through here, so
/// the controller can reach the inventory service from behind the cluster's
/// egress proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy URL for plain HTTP requests
    pub http_proxy: Option<String>,
    /// Proxy URL for HTTPS requests
    pub https_proxy: Option<String>,
    /// Comma-separated hosts that bypass the proxy
    pub no_proxy: Option<String>,
}

/// Everything needed to construct an [`InventoryClient`]
#[derive(Clone)]
pub struct InventoryClientConfig {
    /// Cluster whose installation this controller drives
    pub cluster_id: Uuid,
    /// Inventory service base URL (e.g. "https://assisted-service.example.com")
    pub base_url: String,
    /// Pull-secret token used to authenticate agent requests
    pub pull_secret_token: String,
    /// Skip TLS certificate verification (self-signed deployments)
    pub skip_cert_verification: bool,
    /// Extra root CA bundle (PEM) to trust
    pub ca_cert_path: Option<PathBuf>,
    /// Cluster-wide proxy settings, if any
    pub proxy: Option<ProxySettings>,
}

/// Inventory API client
pub struct InventoryClient {
    client: Client,
    cluster_id: Uuid,
    base_url: String,
    token: String,
}

impl InventoryClient {
    /// Create a new inventory client
    ///
    /// Builds the underlying HTTP client from the TLS policy and proxy
    /// settings in `config`. Fails if the CA bundle cannot be read or a proxy
    /// URL is malformed.
    pub fn new(config: InventoryClientConfig) -> Result<Self, InventoryError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(30));

        if config.skip_cert_verification {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(path) = &config.ca_cert_path {
            let pem = std::fs::read(path).map_err(|e| {
                InventoryError::InvalidConfig(format!(
                    "failed to read CA bundle {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| {
                InventoryError::InvalidConfig(format!(
                    "invalid CA bundle {}: {}",
                    path.display(),
                    e
                ))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if let Some(proxy) = &config.proxy {
            let no_proxy = proxy.no_proxy.as_deref().and_then(NoProxy::from_string);
            if let Some(url) = &proxy.http_proxy {
                let p = Proxy::http(url).map_err(|e| {
                    InventoryError::InvalidConfig(format!("invalid http proxy {}: {}", url, e))
                })?;
                builder = builder.proxy(p.no_proxy(no_proxy.clone()));
            }
            if let Some(url) = &proxy.https_proxy {
                let p = Proxy::https(url).map_err(|e| {
                    InventoryError::InvalidConfig(format!("invalid https proxy {}: {}", url, e))
                })?;
                builder = builder.proxy(p.no_proxy(no_proxy));
            }
        }

        let client = builder.build().map_err(InventoryError::Http)?;

        Ok(Self {
            client,
            cluster_id: config.cluster_id,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.pull_secret_token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cluster_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/v1/clusters/{}/{}",
            self.base_url, self.cluster_id, suffix
        )
    }

    async fn check_response(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, InventoryError> {
        let status = response.status();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Authentication(format!(
                "{}: {} - {}",
                context, status, body
            )));
        }
        if status == 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::NotFound(format!(
                "{}: {} - {}",
                context, status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Api(format!(
                "{}: {} - {}",
                context, status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl InventoryClientTrait for InventoryClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, InventoryError> {
        let url = self.cluster_url("hosts");
        debug!("Fetching hosts for cluster {}", self.cluster_id);

        let response = self
            .client
            .get(&url)
            .header("X-Secret-Key", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(InventoryError::Http)?;

        let response = Self::check_response(response, "Failed to list hosts").await?;
        let hosts: Vec<Host> = response.json().await?;
        Ok(hosts)
    }

    async fn update_host_progress(
        &self,
        host_id: &Uuid,
        stage: HostStage,
    ) -> Result<(), InventoryError> {
        let url = self.cluster_url(&format!("hosts/{}/progress", host_id));
        debug!("Updating host {} progress to {:?}", host_id, stage);

        let progress = HostProgress {
            current_stage: stage,
            progress_info: None,
        };
        let response = self
            .client
            .put(&url)
            .header("X-Secret-Key", &self.token)
            .header("Accept", "application/json")
            .json(&progress)
            .send()
            .await
            .map_err(InventoryError::Http)?;

        Self::check_response(
            response,
            &format!("Failed to update progress for host {}", host_id),
        )
        .await?;
        Ok(())
    }

    async fn report_status(&self, report: &ClusterStatusReport) -> Result<(), InventoryError> {
        let url = self.cluster_url("status");
        debug!(
            "Reporting cluster status: {}/{} nodes ready",
            report.ready_nodes.len(),
            report.total_nodes
        );

        let response = self
            .client
            .put(&url)
            .header("X-Secret-Key", &self.token)
            .header("Accept", "application/json")
            .json(report)
            .send()
            .await
            .map_err(InventoryError::Http)?;

        Self::check_response(response, "Failed to report cluster status").await?;
        Ok(())
    }
}
