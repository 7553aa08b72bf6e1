// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Financial institution registry entries.

use serde::Deserialize;

/// Institutions seeded into an empty offline store.
pub const DEFAULT_INSTITUTIONS: [&str; 10] = [
    "XP",
    "BTG",
    "Santander",
    "Itau",
    "BB",
    "Smart",
    "Warren",
    "C6",
    "XP Performance",
    "IB",
];

/// Persisted institution row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Institution {
    #[serde(deserialize_with = "crate::models::institution::id_as_string")]
    pub id: String,
    pub name: String,
}

/// Accept numeric or string primary keys.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Trim and check a proposed institution name against the existing entries.
///
/// `editing` is the id being renamed, which may keep its own name.
pub fn check_institution_name(
    raw: &str,
    existing: &[Institution],
    editing: Option<&str>,
) -> Result<String, &'static str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err("Institution name cannot be empty.");
    }

    let taken = existing
        .iter()
        .any(|inst| Some(inst.id.as_str()) != editing && inst.name == name);
    if taken {
        return Err("Institution already exists.");
    }

    Ok(name.to_string())
}
