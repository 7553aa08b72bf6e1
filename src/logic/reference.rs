// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reference data for the submission form: known clients and the institution registry.
//!
//! Loaders never fail: a store error degrades to an empty list plus a notice.
//! Registry edits return the status line to show.

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::logic::store::{DataStore, Direction, Query, Record, decode_rows, record};
use crate::models::institution::Institution;

/// Procedure returning one row per known client.
pub const CLIENTS_PROCEDURE: &str = "get_unique_clients";
/// Column holding the client name in the procedure rows.
pub const CLIENT_COLUMN: &str = "Cliente";
pub const INSTITUTIONS_TABLE: &str = "institutions";

/// Result of a reference load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    /// User-visible, non-fatal notice when the load failed.
    pub notice: Option<String>,
}

impl<T> Loaded<T> {
    fn ok(items: Vec<T>) -> Self {
        Self {
            items,
            notice: None,
        }
    }

    fn failed(notice: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            notice: Some(notice.into()),
        }
    }
}

/// Distinct client names in the order the store returned them.
pub fn load_client_options(store: &dyn DataStore) -> Loaded<String> {
    info!("Loading client options");
    match store.call_procedure(CLIENTS_PROCEDURE, Record::new()) {
        Ok(rows) => {
            let names = client_names(&rows);
            info!(count = names.len(), "Client options loaded");
            Loaded::ok(names)
        }
        Err(err) => {
            warn!(error = %err, "Failed to load client options");
            Loaded::failed("Error loading clients")
        }
    }
}

fn client_names(rows: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        let name = match row.get(CLIENT_COLUMN) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => continue,
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Institution registry ordered by name.
pub fn load_institutions(store: &dyn DataStore) -> Loaded<Institution> {
    info!("Loading institutions");
    let query = Query::new().order_by("name", Direction::Ascending);
    let result = store
        .list_records(INSTITUTIONS_TABLE, &query)
        .and_then(decode_rows::<Institution>);
    match result {
        Ok(items) => {
            info!(count = items.len(), "Institutions loaded");
            Loaded::ok(items)
        }
        Err(err) => {
            warn!(error = %err, "Failed to load institutions");
            Loaded::failed("Error loading institutions")
        }
    }
}

pub fn add_institution(store: &dyn DataStore, name: &str) -> Result<String, StoreError> {
    store.insert_record(INSTITUTIONS_TABLE, record([("name", json!(name))]))?;
    info!(name, "Institution added");
    Ok("Institution added.".into())
}

pub fn rename_institution(store: &dyn DataStore, id: &str, name: &str) -> Result<String, StoreError> {
    store.update_record(
        INSTITUTIONS_TABLE,
        &Query::new().where_eq("id", id),
        record([("name", json!(name))]),
    )?;
    info!(id, name, "Institution renamed");
    Ok("Institution updated.".into())
}

/// Removing an institution leaves past submissions that name it untouched.
pub fn delete_institution(store: &dyn DataStore, id: &str) -> Result<String, StoreError> {
    store.delete_record(INSTITUTIONS_TABLE, &Query::new().where_eq("id", id))?;
    info!(id, "Institution removed");
    Ok("Institution removed.".into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::logic::memory_store::MemoryStore;

    #[test]
    fn client_names_drop_empty_and_duplicate_entries() {
        let store = MemoryStore::new();
        store.set_procedure(
            CLIENTS_PROCEDURE,
            vec![
                record([(CLIENT_COLUMN, json!("Beta"))]),
                record([(CLIENT_COLUMN, json!(""))]),
                record([(CLIENT_COLUMN, Value::Null)]),
                record([("other", json!("x"))]),
                record([(CLIENT_COLUMN, json!("Acme"))]),
                record([(CLIENT_COLUMN, json!("Beta"))]),
            ],
        );

        let loaded = load_client_options(&store);

        assert_eq!(loaded.items, vec!["Beta".to_string(), "Acme".to_string()]);
        assert!(loaded.notice.is_none());
        assert_eq!(store.calls(), vec![format!("rpc:{CLIENTS_PROCEDURE}")]);
    }

    #[test]
    fn client_load_failure_degrades_to_empty_list() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::Request("offline".into()));

        let loaded = load_client_options(&store);

        assert!(loaded.items.is_empty());
        assert_eq!(loaded.notice.as_deref(), Some("Error loading clients"));
    }

    #[test]
    fn institutions_are_sorted_by_name() {
        let store = MemoryStore::new();
        store.seed_row(INSTITUTIONS_TABLE, record([("name", json!("XP"))]));
        store.seed_row(INSTITUTIONS_TABLE, record([("name", json!("BTG"))]));

        let loaded = load_institutions(&store);

        let names: Vec<&str> = loaded.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["BTG", "XP"]);
    }

    #[test]
    fn malformed_institution_rows_produce_notice() {
        let store = MemoryStore::new();
        store.seed_row(INSTITUTIONS_TABLE, record([("name", json!(7))]));

        let loaded = load_institutions(&store);

        assert!(loaded.items.is_empty());
        assert!(loaded.notice.is_some());
    }

    #[test]
    fn registry_edits_are_visible_on_reload() {
        let store = MemoryStore::new();
        add_institution(&store, "XP").unwrap();
        add_institution(&store, "BTG").unwrap();
        let xp = load_institutions(&store)
            .items
            .into_iter()
            .find(|i| i.name == "XP")
            .unwrap();

        rename_institution(&store, &xp.id, "XP Investimentos").unwrap();
        let names: Vec<_> = load_institutions(&store).items.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["BTG".to_string(), "XP Investimentos".to_string()]);

        delete_institution(&store, &xp.id).unwrap();
        assert_eq!(load_institutions(&store).items.len(), 1);
    }
}
