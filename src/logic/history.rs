// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Past submissions of the signed-in user.

use serde_json::Value;
use tracing::{info, warn};

use crate::logic::store::{DataStore, Direction, Query};
use crate::models::history::SubmissionRecord;

pub const SUBMISSIONS_TABLE: &str = "submissions";

/// Newest first. Store failures and malformed rows are logged and skipped.
pub fn load_history(store: &dyn DataStore, user_id: &str) -> Vec<SubmissionRecord> {
    let query = Query::new()
        .where_eq("user_id", user_id)
        .order_by("created_at", Direction::Descending);
    let rows = match store.list_records(SUBMISSIONS_TABLE, &query) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "Failed to load submission history");
            return Vec::new();
        }
    };

    let records: Vec<SubmissionRecord> = rows
        .into_iter()
        .filter_map(|row| match SubmissionRecord::from_value(Value::Object(row)) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "Skipping submission row");
                None
            }
        })
        .collect();
    info!(count = records.len(), "Submission history loaded");
    records
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::StoreError;
    use crate::logic::memory_store::MemoryStore;
    use crate::logic::store::record;

    fn seed(store: &MemoryStore, user: &str, client: &str, created_at: &str) {
        store.seed_row(
            SUBMISSIONS_TABLE,
            record([
                ("user_id", json!(user)),
                ("cliente", json!(client)),
                ("created_at", json!(created_at)),
                ("status", json!("success")),
                ("tipos", json!(["Batedor"])),
            ]),
        );
    }

    #[test]
    fn only_own_rows_newest_first() {
        let store = MemoryStore::new();
        seed(&store, "u1", "Old", "2024-01-01T10:00:00Z");
        seed(&store, "u2", "Other", "2024-03-01T10:00:00Z");
        seed(&store, "u1", "New", "2024-02-01T10:00:00Z");

        let records = load_history(&store, "u1");

        let clients: Vec<_> = records.iter().map(|r| r.client.as_str()).collect();
        assert_eq!(clients, vec!["New", "Old"]);
        assert_eq!(records[0].statement_types, vec!["Batedor".to_string()]);
    }

    #[test]
    fn malformed_rows_and_failures_are_skipped() {
        let store = MemoryStore::new();
        seed(&store, "u1", "Good", "2024-01-01T10:00:00Z");
        store.seed_row(
            SUBMISSIONS_TABLE,
            record([("user_id", json!("u1")), ("created_at", json!("not a date"))]),
        );

        assert_eq!(load_history(&store, "u1").len(), 1);

        store.fail_next(StoreError::Request("offline".into()));
        assert!(load_history(&store, "u1").is_empty());
    }
}
