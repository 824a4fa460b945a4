//! Table Registry - Load table definitions from JSON
//!
//! This module loads all Workspace directory table definitions from embedded
//! JSON files and provides lookup functions for the rest of the crate.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded table JSON files (compiled into the library)
const TABLE_FILES: &[&str] = &[
    include_str!("../tables/users.json"),
    include_str!("../tables/groups.json"),
    include_str!("../tables/group_members.json"),
    include_str!("../tables/org_units.json"),
    include_str!("../tables/tokens.json"),
];

/// Semantic column type, used by the host to shape output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Bool,
    Int,
    Timestamp,
    Json,
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Dot-notation extraction path within the API resource record.
    /// Empty for columns populated from the iteration context.
    #[serde(default)]
    pub api_path: String,
    pub description: String,
}

/// Qualifier translated into the endpoint's search-query syntax
/// (e.g. `primary_email` becomes an `email:<value>` term)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQualDef {
    pub column: String,
    pub term: String,
}

/// Qualifier passed through as a plain request parameter
#[derive(Debug, Clone, Deserialize)]
pub struct ParamQualDef {
    pub column: String,
    pub param: String,
}

/// Column whose value is copied from a qualifier rather than the response
#[derive(Debug, Clone, Deserialize)]
pub struct QualColumnDef {
    pub column: String,
    pub qual: String,
}

/// Column whose value is copied from the parent record during fan-out
#[derive(Debug, Clone, Deserialize)]
pub struct JoinColumnDef {
    pub column: String,
    pub parent_path: String,
}

/// Cross-resource fan-out configuration for synthetic join tables
#[derive(Debug, Clone, Deserialize)]
pub struct FanoutDef {
    /// Qualifier that scopes the listing to one parent; fan-out runs only
    /// when this qualifier is absent
    pub scope_column: String,
    pub parent_method: String,
    pub parent_fields: String,
    pub parent_response_path: String,
    #[serde(default)]
    pub parent_page_size: Option<u64>,
    /// Path to the parent key within each parent record
    pub parent_key_path: String,
    pub join_columns: Vec<JoinColumnDef>,
}

/// List configuration from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ListDef {
    pub method: String,
    /// `fields` projection requested from the API, naming exactly the
    /// response fields the column schema needs
    pub fields: String,
    pub response_path: String,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default)]
    pub paginated: bool,
    #[serde(default)]
    pub search_quals: Vec<SearchQualDef>,
    #[serde(default)]
    pub param_quals: Vec<ParamQualDef>,
    #[serde(default)]
    pub qual_columns: Vec<QualColumnDef>,
    #[serde(default)]
    pub fanout: Option<FanoutDef>,
}

/// Get configuration from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct GetDef {
    pub method: String,
    /// All key columns must be bound for the getter to issue a fetch
    pub key_columns: Vec<String>,
    pub fields: String,
}

/// Table definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub description: String,
    pub list: ListDef,
    #[serde(default)]
    pub get: Option<GetDef>,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Root structure of tables/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct TableCatalog {
    #[serde(default)]
    pub tables: HashMap<String, TableDef>,
}

/// Global catalog loaded from JSON
static CATALOG: OnceLock<TableCatalog> = OnceLock::new();

/// Get the table catalog (loads from embedded JSON on first access)
pub fn get_catalog() -> &'static TableCatalog {
    CATALOG.get_or_init(|| {
        let mut catalog = TableCatalog {
            tables: HashMap::new(),
        };

        for content in TABLE_FILES {
            let partial: TableCatalog = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded table JSON: {}", e));
            catalog.tables.extend(partial.tables);
        }

        catalog
    })
}

/// Get a table definition by name
pub fn get_table(name: &str) -> Option<&'static TableDef> {
    get_catalog().tables.get(name)
}

/// Get all table names
pub fn all_table_names() -> Vec<&'static str> {
    get_catalog().tables.keys().map(|s| s.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_loads_successfully() {
        let catalog = get_catalog();
        assert_eq!(catalog.tables.len(), 5, "catalog should have five tables");
    }

    #[test]
    fn users_table_exists_with_list_only() {
        let table = get_table("googleworkspace_directory_users")
            .expect("users table should exist");
        assert!(table.get.is_none(), "users table is list-only");
        assert_eq!(table.list.method, "list_users");
        assert!(table.list.paginated);
        assert!(table.column("primary_email").is_some());
    }

    #[test]
    fn join_tables_declare_fanout() {
        let members = get_table("googleworkspace_group_members").unwrap();
        let fanout = members.list.fanout.as_ref().expect("members fan out");
        assert_eq!(fanout.scope_column, "group_key");
        assert_eq!(fanout.parent_key_path, "email");

        let tokens = get_table("googleworkspace_tokens_list").unwrap();
        let fanout = tokens.list.fanout.as_ref().expect("tokens fan out");
        assert_eq!(fanout.scope_column, "user_key");
        // Both join columns carry the parent's primary email
        assert_eq!(fanout.join_columns.len(), 2);
    }

    #[test]
    fn org_units_listing_is_unpaginated() {
        let table = get_table("googleworkspace_orgunits").unwrap();
        assert!(!table.list.paginated);
        assert!(table.list.page_size.is_none());
        let get = table.get.as_ref().expect("org units support get");
        assert_eq!(get.key_columns, vec!["org_unit_path"]);
    }

    #[test]
    fn every_column_has_a_name_and_description() {
        for table in get_catalog().tables.values() {
            for column in &table.columns {
                assert!(!column.name.is_empty());
                assert!(!column.description.is_empty(), "{}", column.name);
            }
        }
    }
}
