//! Configuration Management
//!
//! Handles connector configuration for gws-tables: which customer to query,
//! where credentials come from, and which endpoint to talk to.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Connector configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectorConfig {
    /// Workspace customer to query; defaults to the `my_customer` alias
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Admin user impersonated via domain-wide delegation. Recorded for
    /// deployments whose credential chain performs the delegation.
    #[serde(default)]
    pub impersonated_user_email: Option<String>,
    /// Path to a service-account key file for the ADC chain
    #[serde(default)]
    pub credentials_path: Option<String>,
    /// API endpoint override, primarily for tests
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ConnectorConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gws-tables").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Effective customer id (config > env > "my_customer" alias)
    pub fn effective_customer_id(&self) -> String {
        self.customer_id
            .clone()
            .or_else(|| std::env::var("GOOGLE_CLOUD_CUSTOMER_ID").ok())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "my_customer".to_string())
    }

    /// Effective credentials path (config > env)
    pub fn effective_credentials_path(&self) -> Option<String> {
        self.credentials_path
            .clone()
            .or_else(|| std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok())
            .filter(|s| !s.is_empty())
    }

    /// Effective API endpoint (config > production default)
    pub fn effective_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| crate::gws::client::DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string()
    }
}
