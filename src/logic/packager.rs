// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Packaging of a validated draft into the webhook's multipart layout.
//!
//! Layout, in order:
//! - per file `i`: `data` (the bytes), `filename_i`, `mimetype_i`, `size_i`
//! - `cliente`, `tipos` (JSON array in selection order), `instituicao`, `competencia`

use anyhow::{Context, Result, bail};

use crate::models::submission::DraftSubmission;
use crate::utils::digest_bytes;

/// Shared field name for every file part.
pub const FILE_FIELD: &str = "data";

/// Body of a single multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// Named multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

impl Part {
    fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: PartBody::Text(value.into()),
        }
    }

    /// Text value of a scalar part.
    pub fn as_text(&self) -> Option<&str> {
        match &self.body {
            PartBody::Text(value) => Some(value),
            PartBody::File { .. } => None,
        }
    }
}

/// Ordered multipart payload, independent of any HTTP client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Payload {
    pub parts: Vec<Part>,
}

impl Payload {
    /// First part with the given name.
    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Number of file parts.
    pub fn file_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p.body, PartBody::File { .. }))
            .count()
    }

    /// Convert into a `reqwest` multipart form, preserving part order.
    pub fn into_form(self) -> Result<reqwest::blocking::multipart::Form> {
        use reqwest::blocking::multipart::{Form, Part as HttpPart};

        let mut form = Form::new();
        for part in self.parts {
            form = match part.body {
                PartBody::Text(value) => form.text(part.name, value),
                PartBody::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let http_part = HttpPart::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)
                        .with_context(|| format!("Invalid content type: {mime}"))?;
                    form.part(part.name, http_part)
                }
            };
        }
        Ok(form)
    }
}

/// Read every selected file and assemble the payload.
///
/// Files whose content changed since selection are rejected.
///
/// # Errors
///
/// Returns an error when a file cannot be read or no longer matches its recorded hash.
pub fn build_payload(draft: &DraftSubmission) -> Result<Payload> {
    let mut parts = Vec::with_capacity(draft.files.len() * 4 + 4);

    for (index, file) in draft.files.iter().enumerate() {
        let bytes = std::fs::read(&file.path)
            .with_context(|| format!("Failed to read {}", file.path.display()))?;

        if let Some(expected) = &file.sha256
            && digest_bytes(&bytes) != *expected
        {
            bail!("File modified since it was added: {}", file.name);
        }

        parts.push(Part {
            name: FILE_FIELD.to_string(),
            body: PartBody::File {
                file_name: file.name.clone(),
                mime: file.mime.clone(),
                bytes,
            },
        });
        parts.push(Part::text(format!("filename_{index}"), file.name.clone()));
        parts.push(Part::text(format!("mimetype_{index}"), file.mime.clone()));
        parts.push(Part::text(format!("size_{index}"), file.size.to_string()));
    }

    let types: Vec<&str> = draft.statement_types.iter().map(|t| t.as_str()).collect();
    let types_json = serde_json::to_string(&types).context("Failed to encode statement types")?;

    parts.push(Part::text("cliente", draft.client.clone()));
    parts.push(Part::text("tipos", types_json));
    parts.push(Part::text("instituicao", draft.institution.clone()));
    parts.push(Part::text("competencia", draft.competence.clone()));

    Ok(Payload { parts })
}
