//! Mock InventoryClient for unit testing
//!
//! This module provides a mock implementation of InventoryClientTrait that can
//! be used in unit tests without requiring a running inventory service.
//!
//! Besides an in-memory host store, the mock carries failure switches so tests
//! can inject transient API failures per operation, and counters/logs so tests
//! can assert how the controller drove the API.

use crate::error::InventoryError;
use crate::inventory_trait::InventoryClientTrait;
use crate::models::{ClusterStatusReport, Host, HostProgress, HostStage};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Mock InventoryClient for testing
///
/// Stores hosts in memory, records every progress update and status report,
/// and can be switched to fail any operation.
#[derive(Clone, Default)]
pub struct MockInventoryClient {
    base_url: String,
    hosts: Arc<Mutex<Vec<Host>>>,
    reports: Arc<Mutex<Vec<ClusterStatusReport>>>,
    progress_updates: Arc<Mutex<Vec<(Uuid, HostStage)>>>,
    fail_list_hosts: Arc<AtomicBool>,
    fail_update_progress: Arc<AtomicBool>,
    fail_report_status: Arc<AtomicBool>,
    list_hosts_calls: Arc<AtomicUsize>,
    report_status_calls: Arc<AtomicUsize>,
}

fn lock<'a, T>(m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockInventoryClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Add a host to the mock store (for test setup)
    pub fn add_host(&self, host: Host) {
        lock(&self.hosts).push(host);
    }

    /// Convenience for test setup: register a host by name with no progress
    pub fn add_named_host(&self, hostname: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.add_host(Host {
            id,
            requested_hostname: Some(hostname.to_string()),
            progress: None,
        });
        id
    }

    /// Make `list_hosts` fail until switched back
    pub fn set_fail_list_hosts(&self, fail: bool) {
        self.fail_list_hosts.store(fail, Ordering::SeqCst);
    }

    /// Make `update_host_progress` fail until switched back
    pub fn set_fail_update_progress(&self, fail: bool) {
        self.fail_update_progress.store(fail, Ordering::SeqCst);
    }

    /// Make `report_status` fail until switched back
    pub fn set_fail_report_status(&self, fail: bool) {
        self.fail_report_status.store(fail, Ordering::SeqCst);
    }

    /// Status reports received so far
    pub fn reports(&self) -> Vec<ClusterStatusReport> {
        lock(&self.reports).clone()
    }

    /// Progress updates received so far, in order
    pub fn progress_updates(&self) -> Vec<(Uuid, HostStage)> {
        lock(&self.progress_updates).clone()
    }

    /// Number of `list_hosts` calls made
    pub fn list_hosts_calls(&self) -> usize {
        self.list_hosts_calls.load(Ordering::SeqCst)
    }

    /// Number of `report_status` calls made (including failed ones)
    pub fn report_status_calls(&self) -> usize {
        self.report_status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InventoryClientTrait for MockInventoryClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_hosts(&self) -> Result<Vec<Host>, InventoryError> {
        self.list_hosts_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_hosts.load(Ordering::SeqCst) {
            return Err(InventoryError::Api(
                "mock: list_hosts failure injected".to_string(),
            ));
        }
        Ok(lock(&self.hosts).clone())
    }

    async fn update_host_progress(
        &self,
        host_id: &Uuid,
        stage: HostStage,
    ) -> Result<(), InventoryError> {
        if self.fail_update_progress.load(Ordering::SeqCst) {
            return Err(InventoryError::Api(
                "mock: update_host_progress failure injected".to_string(),
            ));
        }
        let mut hosts = lock(&self.hosts);
        let host = hosts
            .iter_mut()
            .find(|h| &h.id == host_id)
            .ok_or_else(|| InventoryError::NotFound(format!("Host {} not found", host_id)))?;
        host.progress = Some(HostProgress {
            current_stage: stage,
            progress_info: None,
        });
        lock(&self.progress_updates).push((*host_id, stage));
        Ok(())
    }

    async fn report_status(&self, report: &ClusterStatusReport) -> Result<(), InventoryError> {
        self.report_status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_report_status.load(Ordering::SeqCst) {
            return Err(InventoryError::Api(
                "mock: report_status failure injected".to_string(),
            ));
        }
        lock(&self.reports).push(report.clone());
        Ok(())
    }
}
