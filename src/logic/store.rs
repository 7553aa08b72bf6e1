// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Data/auth service interface consumed by the screens.
//!
//! The hosted backend is reached through [`DataStore`] so the UI can run against
//! [`crate::logic::rest_store::RestStore`] in production and
//! [`crate::logic::memory_store::MemoryStore`] offline or in tests.

use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::models::session::AuthUser;

/// A single row as returned by the service.
pub type Record = Map<String, Value>;

/// Sort direction for list queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters plus optional ordering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order: Option<(String, Direction)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows whose `column` equals `value`.
    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    /// True when the row satisfies every filter.
    pub fn matches(&self, row: &Record) -> bool {
        self.filters
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

/// Capabilities the application needs from the hosted data/auth service.
pub trait DataStore: Send + Sync {
    fn list_records(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Insert a row and return it as stored (with generated columns).
    fn insert_record(&self, table: &str, record: Record) -> Result<Record, StoreError>;

    /// Apply `changes` to every row matching `query`.
    fn update_record(&self, table: &str, query: &Query, changes: Record)
    -> Result<(), StoreError>;

    fn delete_record(&self, table: &str, query: &Query) -> Result<(), StoreError>;

    /// Remote procedure returning rows.
    fn call_procedure(&self, name: &str, args: Record) -> Result<Vec<Record>, StoreError>;

    /// Server-side function (privileged user operations).
    fn invoke_function(&self, name: &str, body: Value) -> Result<Value, StoreError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, StoreError>;

    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<(), StoreError>;

    fn sign_out(&self) -> Result<(), StoreError>;

    /// Currently authenticated user, if any.
    fn session(&self) -> Option<AuthUser>;
}

/// Build a record from `(column, value)` pairs.
pub fn record<const N: usize>(fields: [(&str, Value); N]) -> Record {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Decode rows into a typed value, failing on the first malformed row.
pub fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<Record>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(StoreError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_matches_all_filters() {
        let row = record([("user_id", json!("u1")), ("role", json!("admin"))]);

        assert!(Query::new().matches(&row));
        assert!(Query::new().where_eq("user_id", "u1").where_eq("role", "admin").matches(&row));
        assert!(!Query::new().where_eq("user_id", "u1").where_eq("role", "user").matches(&row));
        assert!(!Query::new().where_eq("missing", "x").matches(&row));
    }

    #[test]
    fn decode_rows_reports_malformed_rows() {
        #[derive(serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let good = vec![record([("name", json!("XP"))])];
        assert_eq!(decode_rows::<Named>(good).unwrap().len(), 1);

        let bad = vec![record([("name", json!(3))])];
        assert!(matches!(decode_rows::<Named>(bad), Err(StoreError::Decode(_))));
    }
}
