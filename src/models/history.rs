// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Submission history rows as stored by the backend.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Processing state of a stored submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Success,
    Error,
    Other(String),
}

impl SubmissionStatus {
    fn from_raw(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "success" => Self::Success,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    /// User-facing label; unknown statuses pass through verbatim.
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

/// One row of the signed-in user's submission history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub client: String,
    pub account_name: Option<String>,
    pub institution: String,
    pub currency: String,
    pub competence: String,
    pub statement_types: Vec<String>,
    pub status: SubmissionStatus,
}

#[derive(Deserialize)]
struct RawSubmission {
    #[serde(deserialize_with = "crate::models::institution::id_as_string")]
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    cliente: String,
    #[serde(default)]
    nome_conta: Option<String>,
    #[serde(default)]
    instituicao: String,
    #[serde(default)]
    moeda: String,
    #[serde(default)]
    competencia: String,
    #[serde(default)]
    tipos: Value,
    #[serde(default)]
    status: String,
}

impl SubmissionRecord {
    /// Decode a backend row. Non-string statement types are dropped.
    pub fn from_value(row: Value) -> Result<Self> {
        let raw: RawSubmission =
            serde_json::from_value(row).context("Malformed submission row")?;

        let statement_types = match raw.tipos {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            id: raw.id,
            created_at: raw.created_at,
            client: raw.cliente,
            account_name: raw.nome_conta.filter(|n| !n.is_empty()),
            institution: raw.instituicao,
            currency: raw.moeda,
            competence: raw.competencia,
            statement_types,
            status: SubmissionStatus::from_raw(&raw.status),
        })
    }

    /// Creation time in local time, `dd/mm/YYYY HH:MM`.
    pub fn created_label(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M")
            .to_string()
    }
}
