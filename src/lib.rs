//! Google Workspace directory tables
//!
//! A read-only connector that exposes Google Workspace directory resources
//! (users, groups, group members, organizational units, per-user OAuth
//! tokens) as queryable tables for a plugin-based query engine. Each table
//! pairs a declarative column schema with hydrate logic that calls the Admin
//! SDK Directory API, walks pagination tokens, and streams rows to a
//! caller-supplied sink under a row budget.

pub mod config;
pub mod connector;
pub mod gws;
pub mod query;
pub mod table;

pub use config::ConnectorConfig;
pub use connector::Connector;
pub use query::{QueryContext, Qualifiers, Row, RowBudget, RowSink};

/// Version injected at compile time via GWS_TABLES_VERSION env var (set by
/// CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("GWS_TABLES_VERSION") {
    Some(v) => v,
    None => "dev",
};
