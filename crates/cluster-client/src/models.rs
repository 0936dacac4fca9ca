//! Cluster-level data models

/// Cluster-wide egress proxy settings, read from the cluster proxy object.
///
/// All fields empty means the cluster has no proxy configured; callers get
/// `None` instead of an empty value in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterProxy {
    /// Proxy URL for plain HTTP traffic
    pub http_proxy: Option<String>,
    /// Proxy URL for HTTPS traffic
    pub https_proxy: Option<String>,
    /// Comma-separated hosts that bypass the proxy
    pub no_proxy: Option<String>,
}

impl ClusterProxy {
    /// True when no proxy field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.http_proxy.is_none() && self.https_proxy.is_none() && self.no_proxy.is_none()
    }
}
