//! Cross-Resource Fan-Out
//!
//! Lists child resources across every parent when the query supplies no
//! parent-scoping qualifier: one single-page parent listing, then one
//! best-effort child fetch per parent. A parent whose children cannot be
//! read contributes zero rows; iteration continues.

use super::dispatch::ListRequest;
use super::fetcher::fetch_page;
use super::registry::TableDef;
use super::row;
use crate::gws::client::DirectoryClient;
use crate::gws::http::format_directory_error;
use crate::query::{Qualifiers, RowBudget, RowSink};
use anyhow::{Context, Result};

/// A parent whose child fetch was skipped, and why
#[derive(Debug, Clone)]
pub struct ParentSkip {
    pub parent_key: String,
    pub reason: String,
}

/// Outcome of one fan-out pass
#[derive(Debug, Default)]
pub struct FanoutReport {
    pub parents_listed: usize,
    pub rows_emitted: u64,
    pub skips: Vec<ParentSkip>,
}

/// Fan a child-table listing out across all parents.
///
/// The parent listing itself is fatal on error; per-parent child fetches are
/// best effort. Every emitted row carries the parent's key copied from the
/// iteration context, regardless of what the child record contains.
pub async fn fanout_rows(
    client: &DirectoryClient,
    table: &TableDef,
    budget: &mut RowBudget,
    sink: &mut dyn RowSink,
) -> Result<FanoutReport> {
    let list = &table.list;
    let fanout = list
        .fanout
        .as_ref()
        .with_context(|| format!("Table {} does not define a fan-out", table.name))?;

    let no_quals = Qualifiers::new();

    // Single unfiltered page of parents; no pagination loop at this level.
    let parent_req = ListRequest {
        method: &fanout.parent_method,
        fields: &fanout.parent_fields,
        page_size: fanout.parent_page_size,
        page_token: None,
        quals: &no_quals,
        parent_key: None,
        search_quals: &[],
        param_quals: &[],
    };
    let parents = fetch_page(client, &parent_req, &fanout.parent_response_path)
        .await?
        .items;

    let mut report = FanoutReport {
        parents_listed: parents.len(),
        ..Default::default()
    };

    for parent in &parents {
        if budget.is_exhausted() {
            break;
        }

        let parent_key = row::extract_string(parent, &fanout.parent_key_path);
        if parent_key.is_empty() {
            report.skips.push(ParentSkip {
                parent_key,
                reason: "parent record carries no key".to_string(),
            });
            continue;
        }

        let child_req = ListRequest {
            method: &list.method,
            fields: &list.fields,
            page_size: list.page_size,
            page_token: None,
            quals: &no_quals,
            parent_key: Some(&parent_key),
            search_quals: &[],
            param_quals: &[],
        };

        let children = match fetch_page(client, &child_req, &list.response_path).await {
            Ok(page) => page.items,
            Err(error) => {
                tracing::debug!("{}: skipping parent {}: {}", table.name, parent_key, error);
                report.skips.push(ParentSkip {
                    parent_key: parent_key.clone(),
                    reason: format_directory_error(&error),
                });
                continue;
            }
        };

        for child in &children {
            if budget.is_exhausted() {
                break;
            }

            let mut shaped = row::shape_row(child, &table.columns);
            for join in &fanout.join_columns {
                let value = row::extract_string(parent, &join.parent_path);
                shaped = row::join_parent(shaped, &join.column, &value);
            }

            sink.emit(shaped);
            budget.record_emitted();
            report.rows_emitted += 1;
        }
    }

    Ok(report)
}
