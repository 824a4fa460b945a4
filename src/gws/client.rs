//! Directory Client
//!
//! Main client for interacting with the Admin SDK Directory API, combining
//! authentication and HTTP functionality with per-resource URL builders.

use super::auth::DirectoryCredentials;
use super::http::DirectoryHttpClient;
use crate::config::ConnectorConfig;
use anyhow::{Context, Result};
use serde_json::Value;

/// Production Admin SDK endpoint
pub const DEFAULT_ENDPOINT: &str = "https://admin.googleapis.com";

/// Main Directory API client
#[derive(Clone)]
pub struct DirectoryClient {
    pub credentials: DirectoryCredentials,
    pub http: DirectoryHttpClient,
    pub customer_id: String,
    endpoint: String,
}

impl DirectoryClient {
    /// Create a new Directory client with Application Default Credentials
    pub async fn new(config: &ConnectorConfig) -> Result<Self> {
        if let Some(path) = config.effective_credentials_path() {
            // gcp_auth discovers service-account keys through the ADC chain
            std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", path);
        }

        let credentials = DirectoryCredentials::new()
            .await
            .context("Failed to initialize Google Workspace credentials")?;

        let http = DirectoryHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            customer_id: config.effective_customer_id(),
            endpoint: config.effective_endpoint(),
        })
    }

    /// Create a client from already-constructed parts. Used by hosts that
    /// supply their own credentials and by the integration tests.
    pub fn from_parts(
        credentials: DirectoryCredentials,
        customer_id: &str,
        endpoint: &str,
    ) -> Result<Self> {
        Ok(Self {
            credentials,
            http: DirectoryHttpClient::new()?,
            customer_id: customer_id.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a Directory API endpoint
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    // =========================================================================
    // Directory API URL builders
    // =========================================================================

    /// Build a Directory API URL
    pub fn directory_url(&self, path: &str) -> String {
        format!("{}/admin/directory/v1/{}", self.endpoint, path)
    }

    /// Users collection URL
    pub fn users_url(&self) -> String {
        self.directory_url("users")
    }

    /// Single user URL (user key is an email address or immutable id)
    pub fn user_url(&self, user_key: &str) -> String {
        self.directory_url(&format!("users/{}", urlencoding::encode(user_key)))
    }

    /// Groups collection URL
    pub fn groups_url(&self) -> String {
        self.directory_url("groups")
    }

    /// Single group URL
    pub fn group_url(&self, group_key: &str) -> String {
        self.directory_url(&format!("groups/{}", urlencoding::encode(group_key)))
    }

    /// Group members collection URL
    pub fn members_url(&self, group_key: &str) -> String {
        self.directory_url(&format!(
            "groups/{}/members",
            urlencoding::encode(group_key)
        ))
    }

    /// Single group member URL
    pub fn member_url(&self, group_key: &str, member_key: &str) -> String {
        self.directory_url(&format!(
            "groups/{}/members/{}",
            urlencoding::encode(group_key),
            urlencoding::encode(member_key)
        ))
    }

    /// Org units collection URL for a customer
    pub fn orgunits_url(&self, customer_id: &str) -> String {
        self.directory_url(&format!(
            "customer/{}/orgunits",
            urlencoding::encode(customer_id)
        ))
    }

    /// Single org unit URL. The org unit path keeps its `/` separators;
    /// each segment is encoded individually.
    pub fn orgunit_url(&self, customer_id: &str, org_unit_path: &str) -> String {
        let encoded_path = org_unit_path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        self.directory_url(&format!(
            "customer/{}/orgunits/{}",
            urlencoding::encode(customer_id),
            encoded_path
        ))
    }

    /// Per-user OAuth tokens collection URL
    pub fn tokens_url(&self, user_key: &str) -> String {
        self.directory_url(&format!("users/{}/tokens", urlencoding::encode(user_key)))
    }

    /// Single OAuth token URL
    pub fn token_url(&self, user_key: &str, client_id: &str) -> String {
        self.directory_url(&format!(
            "users/{}/tokens/{}",
            urlencoding::encode(user_key),
            urlencoding::encode(client_id)
        ))
    }
}

/// Format a Directory API error for display
pub fn format_directory_error(error: &anyhow::Error) -> String {
    super::http::format_directory_error(error)
}
