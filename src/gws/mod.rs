//! Google Workspace API interaction module
//!
//! This module provides the core functionality for talking to the Admin SDK
//! Directory API: authentication, HTTP client, and the directory client with
//! its per-resource URL builders.
//!
//! # Module Structure
//!
//! - [`auth`] - Workspace authentication using Application Default Credentials
//! - [`client`] - Directory client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use crate::gws::client::DirectoryClient;
//! use crate::config::ConnectorConfig;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = DirectoryClient::new(&ConnectorConfig::load()).await?;
//!     let groups = client.get(&client.groups_url()).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
