// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! [`DataStore`] backed by a Supabase-compatible REST service.

use std::sync::{Mutex, PoisonError};

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::BackendConfig;
use crate::error::StoreError;
use crate::logic::store::{DataStore, Direction, Query, Record};
use crate::models::session::AuthUser;

#[derive(Clone)]
struct Token {
    access_token: String,
    user: AuthUser,
}

/// Blocking REST client; holds the access token after sign-in.
pub struct RestStore {
    client: Client,
    base_url: String,
    anon_key: String,
    token: Mutex<Option<Token>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl RestStore {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            token: Mutex::new(None),
        }
    }

    fn bearer(&self) -> String {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    fn table_request(&self, method: Method, table: &str, query: &Query) -> RequestBuilder {
        let mut params: Vec<(String, String)> = query
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", filter_value(value))))
            .collect();
        if let Some((column, direction)) = &query.order {
            let dir = match direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            params.push(("order".into(), format!("{column}.{dir}")));
        }
        self.request(method, &format!("/rest/v1/{table}"))
            .query(&params)
    }
}

fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Map non-2xx responses to errors; auth endpoints report `Auth` errors.
fn check(response: Response, auth: bool) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let message = error_message(&body);
    warn!(status = status.as_u16(), %message, "Backend request failed");
    if auth {
        Err(StoreError::Auth(message))
    } else {
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn into_rows(value: Value) -> Result<Vec<Record>, StoreError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::Decode(format!("expected row object, got {other}"))),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        Value::Null => Ok(Vec::new()),
        other => Err(StoreError::Decode(format!("expected rows, got {other}"))),
    }
}

impl DataStore for RestStore {
    fn list_records(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        debug!(table, "Listing records");
        let response = self
            .table_request(Method::GET, table, query)
            .query(&[("select", "*")])
            .send()?;
        into_rows(check(response, false)?.json()?)
    }

    fn insert_record(&self, table: &str, record: Record) -> Result<Record, StoreError> {
        let response = self
            .table_request(Method::POST, table, &Query::new())
            .header("Prefer", "return=representation")
            .json(&Value::Object(record))
            .send()?;
        into_rows(check(response, false)?.json()?)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode(format!("insert into {table} returned no row")))
    }

    fn update_record(&self, table: &str, query: &Query, changes: Record) -> Result<(), StoreError> {
        let response = self
            .table_request(Method::PATCH, table, query)
            .json(&Value::Object(changes))
            .send()?;
        check(response, false).map(|_| ())
    }

    fn delete_record(&self, table: &str, query: &Query) -> Result<(), StoreError> {
        let response = self.table_request(Method::DELETE, table, query).send()?;
        check(response, false).map(|_| ())
    }

    fn call_procedure(&self, name: &str, args: Record) -> Result<Vec<Record>, StoreError> {
        debug!(procedure = name, "Calling procedure");
        let response = self
            .request(Method::POST, &format!("/rest/v1/rpc/{name}"))
            .json(&Value::Object(args))
            .send()?;
        into_rows(check(response, false)?.json()?)
    }

    fn invoke_function(&self, name: &str, body: Value) -> Result<Value, StoreError> {
        debug!(function = name, "Invoking function");
        let response = self
            .request(Method::POST, &format!("/functions/v1/{name}"))
            .json(&body)
            .send()?;
        let text = check(response, false)?.text()?;
        if text.trim().is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, StoreError> {
        let response = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()?;
        let token: TokenResponse = check(response, true)?.json()?;
        let user = AuthUser {
            id: token.user.id,
            email: token.user.email.unwrap_or_else(|| email.to_string()),
        };
        info!(user_id = %user.id, "Signed in");
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(Token {
            access_token: token.access_token,
            user: user.clone(),
        });
        Ok(user)
    }

    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, "/auth/v1/signup")
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()?;
        check(response, true).map(|_| ())
    }

    fn sign_out(&self) -> Result<(), StoreError> {
        let result = self
            .request(Method::POST, "/auth/v1/logout")
            .send()
            .map_err(StoreError::from)
            .and_then(|r| check(r, true).map(|_| ()));
        // The local token is dropped even when the server call fails.
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        result
    }

    fn session(&self) -> Option<AuthUser> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.user.clone())
    }
}
