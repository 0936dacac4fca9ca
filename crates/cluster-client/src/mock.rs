//! Mock ClusterClient for unit testing
//!
//! This module provides a mock implementation of ClusterClientTrait that can
//! be used in unit tests without requiring a running cluster.
//!
//! It stores CSRs and nodes in memory, carries failure switches so tests can
//! inject transient API failures per operation, and exposes helpers for
//! building test CSRs and nodes with the conditions the controller inspects.

use crate::cluster_trait::ClusterClientTrait;
use crate::error::ClusterError;
use crate::models::ClusterProxy;
use k8s_openapi::api::certificates::v1::{
    CertificateSigningRequest, CertificateSigningRequestCondition, CertificateSigningRequestStatus,
};
use k8s_openapi::api::core::v1::{Node, NodeCondition, NodeStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock ClusterClient for testing
#[derive(Clone, Default)]
pub struct MockClusterClient {
    csrs: Arc<Mutex<Vec<CertificateSigningRequest>>>,
    nodes: Arc<Mutex<Vec<Node>>>,
    proxy: Arc<Mutex<Option<ClusterProxy>>>,
    approved: Arc<Mutex<Vec<String>>>,
    fail_list_csrs: Arc<AtomicBool>,
    fail_approve_csr: Arc<AtomicBool>,
    fail_list_nodes: Arc<AtomicBool>,
    list_csrs_calls: Arc<AtomicUsize>,
    list_nodes_calls: Arc<AtomicUsize>,
}

fn lock<'a, T>(m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockClusterClient {
    /// Create a new mock client with no resources
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a CSR to the mock store (for test setup)
    pub fn add_csr(&self, csr: CertificateSigningRequest) {
        lock(&self.csrs).push(csr);
    }

    /// Add a node to the mock store (for test setup)
    pub fn add_node(&self, node: Node) {
        lock(&self.nodes).push(node);
    }

    /// Set the cluster proxy settings returned by `get_proxy_settings`
    pub fn set_proxy(&self, proxy: Option<ClusterProxy>) {
        *lock(&self.proxy) = proxy;
    }

    /// Make `list_csrs` fail until switched back
    pub fn set_fail_list_csrs(&self, fail: bool) {
        self.fail_list_csrs.store(fail, Ordering::SeqCst);
    }

    /// Make `approve_csr` fail until switched back
    pub fn set_fail_approve_csr(&self, fail: bool) {
        self.fail_approve_csr.store(fail, Ordering::SeqCst);
    }

    /// Make `list_nodes` fail until switched back
    pub fn set_fail_list_nodes(&self, fail: bool) {
        self.fail_list_nodes.store(fail, Ordering::SeqCst);
    }

    /// Names of CSRs approved so far, in order
    pub fn approved_csrs(&self) -> Vec<String> {
        lock(&self.approved).clone()
    }

    /// Number of `list_csrs` calls made (including failed ones)
    pub fn list_csrs_calls(&self) -> usize {
        self.list_csrs_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_nodes` calls made (including failed ones)
    pub fn list_nodes_calls(&self) -> usize {
        self.list_nodes_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for MockClusterClient {
    async fn list_csrs(&self) -> Result<Vec<CertificateSigningRequest>, ClusterError> {
        self.list_csrs_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_csrs.load(Ordering::SeqCst) {
            return Err(ClusterError::Api(
                "mock: list_csrs failure injected".to_string(),
            ));
        }
        Ok(lock(&self.csrs).clone())
    }

    async fn approve_csr(&self, csr: &CertificateSigningRequest) -> Result<(), ClusterError> {
        if self.fail_approve_csr.load(Ordering::SeqCst) {
            return Err(ClusterError::Api(
                "mock: approve_csr failure injected".to_string(),
            ));
        }
        let name = csr.metadata.name.clone().ok_or_else(|| {
            ClusterError::InvalidResource("certificate signing request has no name".to_string())
        })?;
        let mut csrs = lock(&self.csrs);
        let stored = csrs
            .iter_mut()
            .find(|c| c.metadata.name.as_deref() == Some(name.as_str()))
            .ok_or_else(|| ClusterError::Api(format!("CSR {} not found", name)))?;
        let status = stored.status.get_or_insert_with(Default::default);
        status
            .conditions
            .get_or_insert_with(Vec::new)
            .push(approval_condition("Approved"));
        lock(&self.approved).push(name);
        Ok(())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        self.list_nodes_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_nodes.load(Ordering::SeqCst) {
            return Err(ClusterError::Api(
                "mock: list_nodes failure injected".to_string(),
            ));
        }
        Ok(lock(&self.nodes).clone())
    }

    async fn get_proxy_settings(&self) -> Result<Option<ClusterProxy>, ClusterError> {
        Ok(lock(&self.proxy).clone())
    }
}

fn approval_condition(type_: &str) -> CertificateSigningRequestCondition {
    CertificateSigningRequestCondition {
        type_: type_.to_string(),
        status: "True".to_string(),
        reason: Some("Test".to_string()),
        message: None,
        last_transition_time: None,
        last_update_time: None,
    }
}

/// Build a CSR with no approval conditions (for test setup)
pub fn make_pending_csr(name: &str) -> CertificateSigningRequest {
    CertificateSigningRequest {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Default::default(),
        status: None,
    }
}

/// Build a CSR that already carries the given condition type, e.g.
/// "Approved" or "Denied" (for test setup)
pub fn make_decided_csr(name: &str, condition: &str) -> CertificateSigningRequest {
    CertificateSigningRequest {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: Default::default(),
        status: Some(CertificateSigningRequestStatus {
            conditions: Some(vec![approval_condition(condition)]),
            ..Default::default()
        }),
    }
}

/// Build a node with the given Ready condition (for test setup)
pub fn make_node(name: &str, ready: bool) -> Node {
    Node {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        spec: None,
        status: Some(NodeStatus {
            conditions: Some(vec![NodeCondition {
                type_: "Ready".to_string(),
                status: (if ready { "True" } else { "False" }).to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        }),
    }
}
