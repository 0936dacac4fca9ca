//! Controller configuration.
//!
//! Bound once from environment variables at startup and never mutated
//! afterwards. A missing required variable or an unparsable value is a fatal
//! startup error.

use crate::error::ControllerError;
use std::env;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Immutable controller configuration, bound from the environment.
#[derive(Clone)]
pub struct ControllerConfig {
    /// Cluster whose installation this controller drives
    pub cluster_id: Uuid,
    /// Base URL of the inventory (installation-orchestration) service
    pub inventory_url: String,
    /// Pull-secret token authenticating requests to the inventory service
    pub pull_secret_token: String,
    /// Skip TLS certificate verification towards the inventory service
    pub skip_cert_verification: bool,
    /// Extra root CA bundle (PEM) to trust for inventory requests
    pub ca_cert_path: Option<PathBuf>,
}

impl fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("cluster_id", &self.cluster_id)
            .field("inventory_url", &self.inventory_url)
            .field("pull_secret_token", &"<redacted>")
            .field("skip_cert_verification", &self.skip_cert_verification)
            .field("ca_cert_path", &self.ca_cert_path)
            .finish()
    }
}

impl ControllerConfig {
    /// Bind the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Bind the configuration from an arbitrary key lookup.
    ///
    /// Kept separate from [`from_env`](Self::from_env) so binding is testable
    /// without mutating process-wide environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                ControllerError::InvalidConfig(format!("{} environment variable is required", key))
            })
        };

        let cluster_id: Uuid = required("CLUSTER_ID")?.parse().map_err(|e| {
            ControllerError::InvalidConfig(format!("CLUSTER_ID must be a UUID: {}", e))
        })?;
        let inventory_url = required("INVENTORY_URL")?;
        let pull_secret_token = required("PULL_SECRET_TOKEN")?;
        let skip_cert_verification = match lookup("SKIP_CERT_VERIFICATION") {
            None => false,
            Some(value) => parse_bool("SKIP_CERT_VERIFICATION", &value)?,
        };
        let ca_cert_path = lookup("CA_CERT_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            cluster_id,
            inventory_url,
            pull_secret_token,
            skip_cert_verification,
            ca_cert_path,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ControllerError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ControllerError::InvalidConfig(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}
