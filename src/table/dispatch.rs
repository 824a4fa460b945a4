//! Request Dispatch
//!
//! Maps declarative list/get method names to Admin SDK Directory REST calls.

use super::registry::{ParamQualDef, SearchQualDef};
use crate::gws::client::DirectoryClient;
use crate::query::Qualifiers;
use anyhow::{Context, Result};
use serde_json::Value;

/// One page-or-less listing request, ready for dispatch.
pub struct ListRequest<'a> {
    pub method: &'a str,
    /// `fields` projection naming the response fields the schema needs
    pub fields: &'a str,
    pub page_size: Option<u64>,
    pub page_token: Option<&'a str>,
    pub quals: &'a Qualifiers,
    /// Parent key for child-resource listings (group members, tokens)
    pub parent_key: Option<&'a str>,
    pub search_quals: &'a [SearchQualDef],
    pub param_quals: &'a [ParamQualDef],
}

/// Invoke a Directory API list operation
pub async fn invoke_list(client: &DirectoryClient, req: &ListRequest<'_>) -> Result<Value> {
    tracing::debug!("invoke_list: method={}", req.method);

    let mut params: Vec<(String, String)> = vec![("fields".to_string(), req.fields.to_string())];
    if let Some(size) = req.page_size {
        params.push(("maxResults".to_string(), size.to_string()));
    }
    if let Some(token) = req.page_token {
        params.push(("pageToken".to_string(), token.to_string()));
    }

    let url = match req.method {
        "list_users" => {
            params.push(("customer".to_string(), client.customer_id.clone()));
            if let Some(query) = build_search_query(req.quals, req.search_quals) {
                params.push(("query".to_string(), query));
            }
            client.users_url()
        }
        "list_groups" => {
            params.push(("customer".to_string(), client.customer_id.clone()));
            client.groups_url()
        }
        "list_group_members" => {
            let group_key = require_parent(req.parent_key, "group_key")?;
            client.members_url(group_key)
        }
        "list_org_units" => {
            for qual in req.param_quals {
                let value = req.quals.equals(&qual.column);
                if !value.is_empty() {
                    params.push((qual.param.clone(), value.to_string()));
                }
            }
            let customer = customer_for(client, req.quals);
            client.orgunits_url(customer)
        }
        "list_tokens" => {
            let user_key = require_parent(req.parent_key, "user_key")?;
            client.tokens_url(user_key)
        }
        _ => anyhow::bail!("Unknown list method: {}", req.method),
    };

    client.get(&with_params(&url, &params)).await
}

/// Invoke a Directory API get operation. Key values come from the bound
/// qualifiers; the caller has already verified they are non-empty.
pub async fn invoke_get(
    client: &DirectoryClient,
    method: &str,
    quals: &Qualifiers,
    fields: &str,
) -> Result<Value> {
    tracing::debug!("invoke_get: method={}", method);

    let params = vec![("fields".to_string(), fields.to_string())];

    let url = match method {
        "get_user" => client.user_url(quals.equals("user_key")),
        "get_group" => client.group_url(quals.equals("id")),
        "get_group_member" => {
            client.member_url(quals.equals("group_key"), quals.equals("member_key"))
        }
        "get_org_unit" => {
            client.orgunit_url(customer_for(client, quals), quals.equals("org_unit_path"))
        }
        "get_token" => client.token_url(quals.equals("user_key"), quals.equals("client_id")),
        _ => anyhow::bail!("Unknown get method: {}", method),
    };

    client.get(&with_params(&url, &params)).await
}

/// Translate equality qualifiers into the Directory search-query syntax,
/// e.g. `email:a@x.com orgUnitPath:/corp`. Multiple bound qualifiers
/// combine into one space-joined query string.
pub fn build_search_query(quals: &Qualifiers, search_quals: &[SearchQualDef]) -> Option<String> {
    let terms: Vec<String> = search_quals
        .iter()
        .filter_map(|sq| {
            let value = quals.equals(&sq.column);
            if value.is_empty() {
                None
            } else {
                Some(format!("{}:{}", sq.term, value))
            }
        })
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

fn require_parent<'a>(parent_key: Option<&'a str>, name: &str) -> Result<&'a str> {
    parent_key
        .filter(|k| !k.is_empty())
        .context(format!("Missing required parameter: {}", name))
}

/// Customer id for org-unit requests: qualifier wins over the configured one
fn customer_for<'a>(client: &'a DirectoryClient, quals: &'a Qualifiers) -> &'a str {
    let qual = quals.equals("customer_id");
    if qual.is_empty() {
        &client.customer_id
    } else {
        qual
    }
}

/// Append query parameters to a URL, encoding values
fn with_params(url: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}
