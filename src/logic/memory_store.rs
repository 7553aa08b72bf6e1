// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Process-local [`DataStore`] used offline and as the test double.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::StoreError;
use crate::logic::store::{DataStore, Direction, Query, Record, record};
use crate::models::institution::DEFAULT_INSTITUTIONS;
use crate::models::session::AuthUser;

/// Account seeded into the offline store so the admin screens are reachable.
pub const OFFLINE_ADMIN_EMAIL: &str = "admin@example.com";
pub const OFFLINE_ADMIN_PASSWORD: &str = "admin123";

struct Account {
    id: String,
    email: String,
    password: String,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Record>>,
    accounts: Vec<Account>,
    procedures: HashMap<String, Vec<Record>>,
    session: Option<AuthUser>,
    fail_next: Option<StoreError>,
    calls: VecDeque<String>,
}

/// Most recent operations kept by [`MemoryStore::calls`].
const CALL_LOG_LIMIT: usize = 256;

/// In-memory tables, accounts, and procedures behind a mutex.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the default institutions and an admin account.
    pub fn seeded() -> Self {
        let store = Self::new();
        for name in DEFAULT_INSTITUTIONS {
            store.seed_row("institutions", record([("name", json!(name))]));
        }
        store.add_account(OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD, "Administrator", &["admin"]);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a row directly, filling `id`/`created_at` when absent.
    pub fn seed_row(&self, table: &str, row: Record) -> Record {
        let row = with_generated_columns(row);
        self.lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    /// Create an account with profile and role rows. Returns the user id.
    pub fn add_account(&self, email: &str, password: &str, full_name: &str, roles: &[&str]) -> String {
        let id = Uuid::new_v4().to_string();
        self.lock().accounts.push(Account {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        self.seed_row(
            "profiles",
            record([
                ("id", json!(id)),
                ("email", json!(email)),
                ("full_name", json!(full_name)),
            ]),
        );
        for role in roles {
            self.seed_row("user_roles", record([("user_id", json!(id)), ("role", json!(role))]));
        }
        id
    }

    /// Fix the rows returned by a procedure.
    pub fn set_procedure(&self, name: &str, rows: Vec<Record>) {
        self.lock().procedures.insert(name.to_string(), rows);
    }

    /// Make the next operation fail with `err`.
    pub fn fail_next(&self, err: StoreError) {
        self.lock().fail_next = Some(err);
    }

    /// Snapshot of a table's rows.
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Most recent operations, oldest first, e.g. `"rpc:get_unique_clients"`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.iter().cloned().collect()
    }

    fn begin(&self, call: String) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self.lock();
        if inner.calls.len() == CALL_LOG_LIMIT {
            inner.calls.pop_front();
        }
        inner.calls.push_back(call);
        let failure = inner.fail_next.take();
        match failure {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }
}

fn with_generated_columns(mut row: Record) -> Record {
    row.entry("id")
        .or_insert_with(|| json!(Uuid::new_v4().to_string()));
    row.entry("created_at")
        .or_insert_with(|| json!(Utc::now().to_rfc3339()));
    row
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn body_str<'a>(body: &'a Value, key: &str) -> Result<&'a str, StoreError> {
    body.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Decode(format!("missing `{key}`")))
}

fn register(inner: &mut Inner, email: &str, password: &str, full_name: &str) -> Result<String, StoreError> {
    if inner.accounts.iter().any(|a| a.email.eq_ignore_ascii_case(email)) {
        return Err(StoreError::Auth("User already registered".into()));
    }
    let id = Uuid::new_v4().to_string();
    inner.accounts.push(Account {
        id: id.clone(),
        email: email.to_string(),
        password: password.to_string(),
    });
    let tables = &mut inner.tables;
    tables
        .entry("profiles".into())
        .or_default()
        .push(with_generated_columns(record([
            ("id", json!(id)),
            ("email", json!(email)),
            ("full_name", json!(full_name)),
        ])));
    tables
        .entry("user_roles".into())
        .or_default()
        .push(with_generated_columns(record([
            ("user_id", json!(id)),
            ("role", json!("user")),
        ])));
    Ok(id)
}

impl DataStore for MemoryStore {
    fn list_records(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let inner = self.begin(format!("list:{table}"))?;
        let mut rows: Vec<Record> = inner
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();

        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        Ok(rows)
    }

    fn insert_record(&self, table: &str, row: Record) -> Result<Record, StoreError> {
        let mut inner = self.begin(format!("insert:{table}"))?;
        let row = with_generated_columns(row);
        inner
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    fn update_record(&self, table: &str, query: &Query, changes: Record) -> Result<(), StoreError> {
        let mut inner = self.begin(format!("update:{table}"))?;
        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| query.matches(r)) {
                for (k, v) in &changes {
                    row.insert(k.clone(), v.clone());
                }
            }
        }
        Ok(())
    }

    fn delete_record(&self, table: &str, query: &Query) -> Result<(), StoreError> {
        let mut inner = self.begin(format!("delete:{table}"))?;
        if let Some(rows) = inner.tables.get_mut(table) {
            rows.retain(|r| !query.matches(r));
        }
        Ok(())
    }

    fn call_procedure(&self, name: &str, _args: Record) -> Result<Vec<Record>, StoreError> {
        let inner = self.begin(format!("rpc:{name}"))?;
        if let Some(rows) = inner.procedures.get(name) {
            return Ok(rows.clone());
        }
        match name {
            // Distinct client names from the `clientes` table.
            "get_unique_clients" => {
                let mut seen = Vec::<Value>::new();
                for row in inner.tables.get("clientes").into_iter().flatten() {
                    if let Some(name) = row.get("Cliente")
                        && !seen.contains(name)
                    {
                        seen.push(name.clone());
                    }
                }
                Ok(seen
                    .into_iter()
                    .map(|name| record([("Cliente", name)]))
                    .collect())
            }
            other => Err(StoreError::NotFound(format!("procedure {other}"))),
        }
    }

    fn invoke_function(&self, name: &str, body: Value) -> Result<Value, StoreError> {
        let mut inner = self.begin(format!("fn:{name}"))?;
        match name {
            "create-user" => {
                let id = register(
                    &mut inner,
                    body_str(&body, "email")?,
                    body_str(&body, "password")?,
                    body_str(&body, "fullName")?,
                )?;
                Ok(json!({ "userId": id }))
            }
            "delete-user" => {
                let user_id = body_str(&body, "userId")?.to_string();
                let before = inner.accounts.len();
                inner.accounts.retain(|a| a.id != user_id);
                if inner.accounts.len() == before {
                    return Err(StoreError::NotFound(format!("user {user_id}")));
                }
                let by_id = Query::new().where_eq("id", user_id.as_str());
                let by_user = Query::new().where_eq("user_id", user_id.as_str());
                if let Some(rows) = inner.tables.get_mut("profiles") {
                    rows.retain(|r| !by_id.matches(r));
                }
                if let Some(rows) = inner.tables.get_mut("user_roles") {
                    rows.retain(|r| !by_user.matches(r));
                }
                Ok(json!({ "success": true }))
            }
            "update-user-password" => {
                let user_id = body_str(&body, "userId")?;
                let password = body_str(&body, "newPassword")?;
                let account = inner
                    .accounts
                    .iter_mut()
                    .find(|a| a.id == user_id)
                    .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
                account.password = password.to_string();
                Ok(json!({ "success": true }))
            }
            other => Err(StoreError::NotFound(format!("function {other}"))),
        }
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, StoreError> {
        let mut inner = self.begin("auth:sign_in".into())?;
        let user = inner
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| AuthUser {
                id: a.id.clone(),
                email: a.email.clone(),
            })
            .ok_or_else(|| StoreError::Auth("Invalid login credentials".into()))?;
        inner.session = Some(user.clone());
        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<(), StoreError> {
        let mut inner = self.begin("auth:sign_up".into())?;
        register(&mut inner, email, password, full_name).map(|_| ())
    }

    fn sign_out(&self) -> Result<(), StoreError> {
        let mut inner = self.begin("auth:sign_out".into())?;
        inner.session = None;
        Ok(())
    }

    fn session(&self) -> Option<AuthUser> {
        self.lock().session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_default_institutions_and_admin() {
        let store = MemoryStore::seeded();

        assert_eq!(store.rows("institutions").len(), DEFAULT_INSTITUTIONS.len());
        let user = store
            .sign_in(OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD)
            .unwrap();
        let roles = store
            .list_records("user_roles", &Query::new().where_eq("user_id", user.id.as_str()))
            .unwrap();
        assert_eq!(roles[0].get("role"), Some(&json!("admin")));
        assert_eq!(store.session(), Some(user));
    }

    #[test]
    fn list_filters_and_orders() {
        let store = MemoryStore::new();
        store.seed_row("t", record([("k", json!("a")), ("n", json!(2))]));
        store.seed_row("t", record([("k", json!("b")), ("n", json!(1))]));
        store.seed_row("t", record([("k", json!("a")), ("n", json!(3))]));

        let rows = store
            .list_records(
                "t",
                &Query::new()
                    .where_eq("k", "a")
                    .order_by("n", Direction::Descending),
            )
            .unwrap();

        let ns: Vec<_> = rows.iter().map(|r| r["n"].clone()).collect();
        assert_eq!(ns, vec![json!(3), json!(2)]);
    }

    #[test]
    fn unique_clients_are_derived_from_client_rows() {
        let store = MemoryStore::new();
        for name in ["Acme", "Beta", "Acme"] {
            store.seed_row("clientes", record([("Cliente", json!(name))]));
        }

        let rows = store.call_procedure("get_unique_clients", Record::new()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(store.calls(), vec!["rpc:get_unique_clients"]);
    }

    #[test]
    fn call_log_keeps_only_recent_operations() {
        let store = MemoryStore::new();
        for _ in 0..CALL_LOG_LIMIT {
            store.list_records("t", &Query::new()).unwrap();
        }
        store.call_procedure("get_unique_clients", Record::new()).unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), CALL_LOG_LIMIT);
        assert_eq!(calls.last().map(String::as_str), Some("rpc:get_unique_clients"));
    }

    #[test]
    fn injected_failure_hits_next_call_only() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::Request("offline".into()));

        assert!(store.list_records("t", &Query::new()).is_err());
        assert!(store.list_records("t", &Query::new()).is_ok());
    }

    #[test]
    fn signup_rejects_duplicate_email_and_sign_in_checks_password() {
        let store = MemoryStore::new();
        store.sign_up("ana@example.com", "secret1", "Ana").unwrap();

        let dup = store.sign_up("ANA@example.com", "other12", "Ana 2").unwrap_err();
        assert_eq!(dup.to_string(), "User already registered");

        let bad = store.sign_in("ana@example.com", "wrong").unwrap_err();
        assert_eq!(bad.to_string(), "Invalid login credentials");
        assert!(store.sign_in("ana@example.com", "secret1").is_ok());

        store.sign_out().unwrap();
        assert!(store.session().is_none());
    }

    #[test]
    fn user_functions_manage_accounts() {
        let store = MemoryStore::new();
        let created = store
            .invoke_function(
                "create-user",
                json!({ "email": "bia@example.com", "password": "secret1", "fullName": "Bia" }),
            )
            .unwrap();
        let id = created["userId"].as_str().unwrap().to_string();

        store
            .invoke_function(
                "update-user-password",
                json!({ "userId": id, "newPassword": "changed1" }),
            )
            .unwrap();
        assert!(store.sign_in("bia@example.com", "changed1").is_ok());

        store
            .invoke_function("delete-user", json!({ "userId": id }))
            .unwrap();
        assert!(store.rows("profiles").is_empty());
        assert!(store.rows("user_roles").is_empty());
        assert!(store.sign_in("bia@example.com", "changed1").is_err());
    }
}
