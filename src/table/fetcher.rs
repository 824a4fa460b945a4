//! Resource Lister
//!
//! Walks a paginated Directory API list operation, shaping and streaming
//! rows until pages run out or the row budget is exhausted.

use super::dispatch::{self, ListRequest};
use super::registry::{ListDef, TableDef};
use super::row;
use crate::gws::client::DirectoryClient;
use crate::query::{Qualifiers, RowBudget, RowSink};
use anyhow::Result;
use serde_json::Value;

/// Hard ceiling on any single page request; the Directory API rejects
/// larger maxResults values.
pub const MAX_PAGE_SIZE: u64 = 500;

/// Result of one page fetch
pub struct PageResult {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

/// Fetch one page of resources and pull out its items and continuation token
pub async fn fetch_page(
    client: &DirectoryClient,
    req: &ListRequest<'_>,
    response_path: &str,
) -> Result<PageResult> {
    let response = dispatch::invoke_list(client, req).await?;

    let items = match row::extract_value(&response, response_path) {
        Value::Array(items) => items,
        _ => Vec::new(),
    };

    let next_token = response
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(PageResult { items, next_token })
}

/// List a table's rows into the sink, paginating until the continuation
/// token is empty or the budget reaches zero. Remote errors abort the whole
/// listing and propagate unmodified; rows already emitted stay emitted.
pub async fn list_rows(
    client: &DirectoryClient,
    table: &TableDef,
    quals: &Qualifiers,
    parent_key: Option<&str>,
    budget: &mut RowBudget,
    sink: &mut dyn RowSink,
) -> Result<()> {
    let list = &table.list;
    let mut page_token: Option<String> = None;

    loop {
        if budget.is_exhausted() {
            break;
        }

        let req = ListRequest {
            method: &list.method,
            fields: &list.fields,
            page_size: effective_page_size(list, budget),
            page_token: page_token.as_deref(),
            quals,
            parent_key,
            search_quals: &list.search_quals,
            param_quals: &list.param_quals,
        };

        let page = fetch_page(client, &req, &list.response_path).await?;
        stream_items(&page.items, table, quals, budget, sink);

        if budget.is_exhausted() {
            break;
        }

        match page.next_token {
            Some(token) if list.paginated => {
                tracing::debug!("{}: continuing to next page", table.name);
                page_token = Some(token);
            }
            _ => break,
        }
    }

    Ok(())
}

/// Shape and emit a page of items under the budget.
///
/// Once the budget hits zero mid-page, the remaining buffered items of that
/// page are dropped and no resumption state is kept.
pub fn stream_items(
    items: &[Value],
    table: &TableDef,
    quals: &Qualifiers,
    budget: &mut RowBudget,
    sink: &mut dyn RowSink,
) {
    for item in items {
        if budget.is_exhausted() {
            break;
        }

        let mut shaped = row::shape_row(item, &table.columns);
        for qual_column in &table.list.qual_columns {
            let value = quals.equals(&qual_column.qual);
            if !value.is_empty() {
                shaped = row::join_parent(shaped, &qual_column.column, value);
            }
        }

        sink.emit(shaped);
        budget.record_emitted();
    }
}

/// Requested page size: the endpoint's configured size, capped at the
/// protocol maximum and at the remaining budget.
fn effective_page_size(list: &ListDef, budget: &RowBudget) -> Option<u64> {
    list.page_size
        .map(|size| budget.cap_page_size(size.min(MAX_PAGE_SIZE)))
}
