//! Unit tests for the reconciliation passes and control loops

#[cfg(test)]
mod tests {
    use crate::config::ControllerConfig;
    use crate::reconciler::{Reconciler, CSR_APPROVE_INTERVAL, GENERAL_WAIT_INTERVAL};
    use crate::status::StatusRecord;
    use cluster_client::mock::{make_decided_csr, make_node, make_pending_csr};
    use cluster_client::MockClusterClient;
    use inventory_client::{Host, HostProgress, HostStage, MockInventoryClient};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    fn test_config() -> ControllerConfig {
        ControllerConfig {
            cluster_id: Uuid::new_v4(),
            inventory_url: "http://test-inventory".to_string(),
            pull_secret_token: "token".to_string(),
            skip_cert_verification: false,
            ca_cert_path: None,
        }
    }

    fn reconciler(
        cluster: &MockClusterClient,
        inventory: &MockInventoryClient,
    ) -> Arc<Reconciler> {
        Arc::new(Reconciler::new(
            test_config(),
            Box::new(cluster.clone()),
            Box::new(inventory.clone()),
        ))
    }

    // --- pass-level behavior ---

    #[tokio::test]
    async fn test_approve_pass_approves_only_pending_csrs() {
        let cluster = MockClusterClient::new();
        cluster.add_csr(make_pending_csr("csr-new-node"));
        cluster.add_csr(make_decided_csr("csr-approved", "Approved"));
        cluster.add_csr(make_decided_csr("csr-denied", "Denied"));
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);

        let approved = reconciler.approve_pending_csrs().await.unwrap();

        assert_eq!(approved, 1);
        assert_eq!(cluster.approved_csrs(), vec!["csr-new-node".to_string()]);
    }

    #[tokio::test]
    async fn test_approve_pass_is_transient_on_list_failure() {
        let cluster = MockClusterClient::new();
        cluster.add_csr(make_pending_csr("csr-new-node"));
        cluster.set_fail_list_csrs(true);
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);

        assert!(reconciler.approve_pending_csrs().await.is_err());

        cluster.set_fail_list_csrs(false);
        assert_eq!(reconciler.approve_pending_csrs().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_approve_pass_swallows_per_csr_failures() {
        let cluster = MockClusterClient::new();
        cluster.add_csr(make_pending_csr("csr-new-node"));
        cluster.set_fail_approve_csr(true);
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);

        // Listing succeeds, the one approval fails: the pass itself still
        // completes and simply approved nothing.
        assert_eq!(reconciler.approve_pending_csrs().await.unwrap(), 0);
        assert!(cluster.approved_csrs().is_empty());
    }

    #[tokio::test]
    async fn test_monitor_pass_updates_record_and_reports() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        cluster.add_node(make_node("master-1", false));
        let inventory = MockInventoryClient::new("http://test-inventory");
        let host_0 = inventory.add_named_host("master-0");
        inventory.add_named_host("master-1");
        let reconciler = reconciler(&cluster, &inventory);
        let record = StatusRecord::default();

        reconciler.monitor_nodes(&record).await.unwrap();

        let snapshot = record.snapshot();
        assert_eq!(snapshot.total_nodes, 2);
        assert_eq!(
            snapshot.ready_nodes.iter().collect::<Vec<_>>(),
            vec!["master-0"]
        );
        assert!(snapshot.observed_at.is_some());

        // Only the ready host moved to Done
        assert_eq!(inventory.progress_updates(), vec![(host_0, HostStage::Done)]);

        let reports = inventory.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total_nodes, 2);
        assert_eq!(reports[0].ready_nodes, vec!["master-0"]);
    }

    #[tokio::test]
    async fn test_monitor_pass_skips_hosts_already_done() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        let inventory = MockInventoryClient::new("http://test-inventory");
        inventory.add_host(Host {
            id: Uuid::new_v4(),
            requested_hostname: Some("master-0".to_string()),
            progress: Some(HostProgress {
                current_stage: HostStage::Done,
                progress_info: None,
            }),
        });
        let reconciler = reconciler(&cluster, &inventory);
        let record = StatusRecord::default();

        reconciler.monitor_nodes(&record).await.unwrap();

        assert!(inventory.progress_updates().is_empty());
        assert_eq!(inventory.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_monitor_pass_publishes_before_reporting() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        let inventory = MockInventoryClient::new("http://test-inventory");
        inventory.set_fail_report_status(true);
        let reconciler = reconciler(&cluster, &inventory);
        let record = StatusRecord::default();

        // The observation completed, only the forwarding failed: the record
        // still reflects the pass.
        assert!(reconciler.monitor_nodes(&record).await.is_err());
        assert_eq!(record.snapshot().total_nodes, 1);
    }

    #[tokio::test]
    async fn test_monitor_pass_failure_leaves_previous_state() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);
        let record = StatusRecord::default();

        reconciler.monitor_nodes(&record).await.unwrap();
        let first = record.snapshot();

        cluster.set_fail_list_nodes(true);
        assert!(reconciler.monitor_nodes(&record).await.is_err());
        assert_eq!(record.snapshot(), first);
    }

    #[tokio::test]
    async fn test_monitor_pass_continues_past_progress_failures() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        let inventory = MockInventoryClient::new("http://test-inventory");
        inventory.add_named_host("master-0");
        inventory.set_fail_update_progress(true);
        let reconciler = reconciler(&cluster, &inventory);
        let record = StatusRecord::default();

        // Per-host progress failure is partial: the pass still publishes and
        // reports.
        reconciler.monitor_nodes(&record).await.unwrap();
        assert_eq!(record.snapshot().total_nodes, 1);
        assert_eq!(inventory.reports().len(), 1);
    }

    // --- loop-level behavior (paused clock) ---

    #[tokio::test(start_paused = true)]
    async fn test_status_loop_survives_transient_failures() {
        let cluster = MockClusterClient::new();
        cluster.set_fail_list_nodes(true);
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);
        let record = Arc::new(StatusRecord::default());

        let loop_reconciler = Arc::clone(&reconciler);
        let loop_record = Arc::clone(&record);
        let handle = tokio::spawn(async move {
            loop_reconciler.run_status_monitor(&loop_record).await;
        });

        // Several failing passes, one interval apart each
        tokio::time::sleep(GENERAL_WAIT_INTERVAL * 3 + Duration::from_millis(1)).await;
        assert_eq!(cluster.list_nodes_calls(), 4);
        assert!(record.snapshot().observed_at.is_none());
        assert!(!handle.is_finished());

        // Recovery: the next scheduled pass succeeds
        cluster.set_fail_list_nodes(false);
        cluster.add_node(make_node("master-0", true));
        tokio::time::sleep(GENERAL_WAIT_INTERVAL).await;
        assert_eq!(record.snapshot().total_nodes, 1);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_csr_loop_survives_transient_failures() {
        let cluster = MockClusterClient::new();
        cluster.add_csr(make_pending_csr("csr-new-node"));
        cluster.set_fail_list_csrs(true);
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);

        let loop_reconciler = Arc::clone(&reconciler);
        let handle = tokio::spawn(async move {
            loop_reconciler.run_csr_approval(CancellationToken::new()).await;
        });

        tokio::time::sleep(CSR_APPROVE_INTERVAL * 3 + Duration::from_millis(1)).await;
        assert_eq!(cluster.list_csrs_calls(), 4);
        assert!(cluster.approved_csrs().is_empty());

        cluster.set_fail_list_csrs(false);
        tokio::time::sleep(CSR_APPROVE_INTERVAL).await;
        assert_eq!(cluster.approved_csrs(), vec!["csr-new-node".to_string()]);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_loop_honors_interval() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);
        let record = Arc::new(StatusRecord::default());

        let loop_reconciler = Arc::clone(&reconciler);
        let loop_record = Arc::clone(&record);
        let handle = tokio::spawn(async move {
            loop_reconciler.run_status_monitor(&loop_record).await;
        });

        // First pass runs immediately, each further pass exactly one interval
        // later
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(inventory.report_status_calls(), 1);
        for expected in 2..=10 {
            tokio::time::sleep(GENERAL_WAIT_INTERVAL).await;
            assert_eq!(inventory.report_status_calls(), expected);
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_has_no_observable_effect_on_csr_loop() {
        let cluster = MockClusterClient::new();
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);

        let shutdown = CancellationToken::new();
        let loop_reconciler = Arc::clone(&reconciler);
        let loop_token = shutdown.clone();
        let handle = tokio::spawn(async move {
            loop_reconciler.run_csr_approval(loop_token).await;
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(cluster.list_csrs_calls(), 1);

        // Requesting shutdown must not stop subsequent passes
        shutdown.cancel();
        tokio::time::sleep(CSR_APPROVE_INTERVAL * 3).await;
        assert_eq!(cluster.list_csrs_calls(), 4);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_inventory_failure_does_not_affect_csr_loop() {
        let cluster = MockClusterClient::new();
        cluster.add_csr(make_pending_csr("csr-new-node"));
        let inventory = MockInventoryClient::new("http://test-inventory");
        inventory.set_fail_list_hosts(true);
        inventory.set_fail_report_status(true);
        let reconciler = reconciler(&cluster, &inventory);
        let record = Arc::new(StatusRecord::default());

        let csr_reconciler = Arc::clone(&reconciler);
        let csr_handle = tokio::spawn(async move {
            csr_reconciler.run_csr_approval(CancellationToken::new()).await;
        });
        let monitor_reconciler = Arc::clone(&reconciler);
        let loop_record = Arc::clone(&record);
        let monitor_handle = tokio::spawn(async move {
            monitor_reconciler.run_status_monitor(&loop_record).await;
        });

        tokio::time::sleep(CSR_APPROVE_INTERVAL * 5 + Duration::from_millis(1)).await;

        // The status loop is failing on every pass, the CSR loop keeps its
        // cadence and keeps approving
        assert_eq!(cluster.list_csrs_calls(), 6);
        assert_eq!(cluster.approved_csrs(), vec!["csr-new-node".to_string()]);

        csr_handle.abort();
        monitor_handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_csr_failure_does_not_affect_status_loop() {
        let cluster = MockClusterClient::new();
        cluster.add_node(make_node("master-0", true));
        cluster.set_fail_list_csrs(true);
        let inventory = MockInventoryClient::new("http://test-inventory");
        let reconciler = reconciler(&cluster, &inventory);
        let record = Arc::new(StatusRecord::default());

        let csr_reconciler = Arc::clone(&reconciler);
        let csr_handle = tokio::spawn(async move {
            csr_reconciler.run_csr_approval(CancellationToken::new()).await;
        });
        let monitor_reconciler = Arc::clone(&reconciler);
        let loop_record = Arc::clone(&record);
        let monitor_handle = tokio::spawn(async move {
            monitor_reconciler.run_status_monitor(&loop_record).await;
        });

        tokio::time::sleep(GENERAL_WAIT_INTERVAL * 5 + Duration::from_millis(1)).await;

        assert_eq!(inventory.report_status_calls(), 6);
        assert_eq!(record.snapshot().total_nodes, 1);

        csr_handle.abort();
        monitor_handle.abort();
    }
}
