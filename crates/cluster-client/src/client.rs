//! Kubernetes-backed cluster client
//!
//! Implements [`ClusterClientTrait`] against the real cluster API using
//! in-cluster credentials. CSR approval patches the `approval` subresource,
//! the same path `kubectl certificate approve` uses.

use crate::cluster_trait::ClusterClientTrait;
use crate::error::ClusterError;
use crate::models::ClusterProxy;
use k8s_openapi::api::certificates::v1::{
    CertificateSigningRequest, CertificateSigningRequestCondition,
};
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, ApiResource, DynamicObject, ListParams, Patch, PatchParams};
use kube::core::GroupVersionKind;
use kube::Client;
use tracing::debug;

/// Cluster API client built from default in-cluster discovery
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    /// Create a new cluster client using the default credential chain
    /// (in-cluster service account, falling back to local kubeconfig).
    pub async fn new() -> Result<Self, ClusterError> {
        Ok(Self::from_client(Client::try_default().await?))
    }

    /// Wrap an already-constructed Kubernetes client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for ClusterClient {
    async fn list_csrs(&self) -> Result<Vec<CertificateSigningRequest>, ClusterError> {
        let api: Api<CertificateSigningRequest> = Api::all(self.client.clone());
        let csrs = api.list(&ListParams::default()).await?;
        debug!("Listed {} certificate signing requests", csrs.items.len());
        Ok(csrs.items)
    }

    async fn approve_csr(&self, csr: &CertificateSigningRequest) -> Result<(), ClusterError> {
        let name = csr.metadata.name.clone().ok_or_else(|| {
            ClusterError::InvalidResource("certificate signing request has no name".to_string())
        })?;

        let mut approved = csr.clone();
        let status = approved.status.get_or_insert_with(Default::default);
        status
            .conditions
            .get_or_insert_with(Vec::new)
            .push(CertificateSigningRequestCondition {
                type_: "Approved".to_string(),
                status: "True".to_string(),
                reason: Some("NodeCSRApprove".to_string()),
                message: Some("This CSR was approved by the install controller".to_string()),
                last_transition_time: None,
                last_update_time: None,
            });

        let api: Api<CertificateSigningRequest> = Api::all(self.client.clone());
        api.patch_approval(&name, &PatchParams::default(), &Patch::Merge(&approved))
            .await?;
        debug!("Approved certificate signing request {}", name);
        Ok(())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let nodes = api.list(&ListParams::default()).await?;
        debug!("Listed {} nodes", nodes.items.len());
        Ok(nodes.items)
    }

    async fn get_proxy_settings(&self) -> Result<Option<ClusterProxy>, ClusterError> {
        // The cluster-wide proxy lives in a non-core API group, so it is read
        // through the dynamic API. Clusters without that API have no proxy.
        let gvk = GroupVersionKind::gvk("config.openshift.io", "v1", "Proxy");
        let resource = ApiResource::from_gvk(&gvk);
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &resource);

        let obj = match api.get_opt("cluster").await {
            Ok(Some(obj)) => obj,
            Ok(None) => return Ok(None),
            Err(kube::Error::Api(e)) if e.code == 404 => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let spec = &obj.data["spec"];
        let field = |key: &str| {
            spec.get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let proxy = ClusterProxy {
            http_proxy: field("httpProxy"),
            https_proxy: field("httpsProxy"),
            no_proxy: field("noProxy"),
        };
        if proxy.is_empty() {
            Ok(None)
        } else {
            debug!("Discovered cluster proxy settings: {:?}", proxy);
            Ok(Some(proxy))
        }
    }
}
