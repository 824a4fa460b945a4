//! Connector entry points
//!
//! Wires the table catalog, request dispatch, lister, and fan-out together
//! behind the two operations the query-engine host calls: `list` and `get`.

use crate::config::ConnectorConfig;
use crate::gws::client::DirectoryClient;
use crate::query::{QueryContext, Row, RowSink};
use crate::table::dispatch;
use crate::table::fanout;
use crate::table::fetcher;
use crate::table::registry::{self, TableDef};
use crate::table::row;
use anyhow::{Context, Result};

/// A connected Google Workspace directory connector.
///
/// Each query invocation owns its own loop state; a `Connector` holds no
/// mutable state and can serve concurrent queries without coordination.
#[derive(Clone)]
pub struct Connector {
    client: DirectoryClient,
}

impl Connector {
    /// Connect using the given configuration. Credential failures surface
    /// here, before any remote call is made.
    pub async fn connect(config: &ConnectorConfig) -> Result<Self> {
        let client = DirectoryClient::new(config)
            .await
            .context("Failed to set up the Workspace directory connector")?;
        Ok(Self { client })
    }

    /// Wrap an already-constructed client (host-supplied credentials, tests).
    pub fn with_client(client: DirectoryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DirectoryClient {
        &self.client
    }

    /// Names of all tables this connector exposes
    pub fn table_names() -> Vec<&'static str> {
        registry::all_table_names()
    }

    /// Schema of one table, for the host's output shaping
    pub fn describe(table_name: &str) -> Option<&'static TableDef> {
        registry::get_table(table_name)
    }

    /// Stream a table's rows into the sink.
    ///
    /// Child tables (group members, tokens) fan out across all parents when
    /// the parent-scoping qualifier is absent; otherwise they list the one
    /// parent's children directly.
    pub async fn list(
        &self,
        table_name: &str,
        ctx: &QueryContext,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let table = registry::get_table(table_name)
            .with_context(|| format!("Unknown table: {}", table_name))?;

        let mut budget = ctx.budget();

        if let Some(fanout_def) = &table.list.fanout {
            if ctx.quals.equals(&fanout_def.scope_column).is_empty() {
                let report = fanout::fanout_rows(&self.client, table, &mut budget, sink).await?;
                if !report.skips.is_empty() {
                    tracing::debug!(
                        "{}: skipped {} of {} parents",
                        table_name,
                        report.skips.len(),
                        report.parents_listed
                    );
                }
                return Ok(());
            }
        }

        let parent_key = table
            .list
            .fanout
            .as_ref()
            .map(|f| ctx.quals.equals(&f.scope_column))
            .filter(|key| !key.is_empty());

        fetcher::list_rows(
            &self.client,
            table,
            &ctx.quals,
            parent_key,
            &mut budget,
            sink,
        )
        .await
    }

    /// Fetch exactly one row by its key columns.
    ///
    /// Hosts call getters speculatively; when any required key is unbound
    /// the result is `None` and no remote call is made.
    pub async fn get(&self, table_name: &str, ctx: &QueryContext) -> Result<Option<Row>> {
        let table = registry::get_table(table_name)
            .with_context(|| format!("Unknown table: {}", table_name))?;

        let Some(get_def) = &table.get else {
            anyhow::bail!("Table {} does not support get", table_name);
        };

        for key in &get_def.key_columns {
            if ctx.quals.equals(key).is_empty() {
                return Ok(None);
            }
        }

        let record =
            dispatch::invoke_get(&self.client, &get_def.method, &ctx.quals, &get_def.fields)
                .await?;

        let mut shaped = row::shape_row(&record, &table.columns);
        for qual_column in &table.list.qual_columns {
            let value = ctx.quals.equals(&qual_column.qual);
            if !value.is_empty() {
                shaped = row::join_parent(shaped, &qual_column.column, value);
            }
        }

        // Token rows resolve the owning user's primary email with a
        // follow-up user fetch.
        if get_def.method == "get_token" {
            let user =
                dispatch::invoke_get(&self.client, "get_user", &ctx.quals, "primaryEmail").await?;
            let email = row::extract_string(&user, "primaryEmail");
            shaped = row::join_parent(shaped, "primary_email", &email);
        }

        Ok(Some(shaped))
    }
}
