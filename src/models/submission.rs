// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Draft submission domain model (UI-agnostic).

use std::path::PathBuf;

/// Statement categories a submission can be tagged with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementType {
    Rebalanceamento,
    Batedor,
    Performance,
}

impl StatementType {
    /// All selectable statement types in display order.
    pub const ALL: [StatementType; 3] = [
        StatementType::Rebalanceamento,
        StatementType::Batedor,
        StatementType::Performance,
    ];

    /// Wire/display name expected by the webhook.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Rebalanceamento => "Rebalanceamento",
            StatementType::Batedor => "Batedor",
            StatementType::Performance => "Performance",
        }
    }
}

/// A selected statement file with the metadata sent alongside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionFile {
    /// Location on disk; bytes are read only when packaging.
    pub path: PathBuf,
    /// Original file name as chosen by the user.
    pub name: String,
    /// Declared content type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// SHA-256 digest, or `None` when the file could not be read.
    pub sha256: Option<String>,
}

/// Everything the user has entered for one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftSubmission {
    pub files: Vec<SubmissionFile>,
    pub client: String,
    /// Selected statement types in selection order.
    pub statement_types: Vec<StatementType>,
    pub institution: String,
    pub competence: String,
}

impl DraftSubmission {
    /// Select or deselect a statement type, keeping selection order and uniqueness.
    pub fn set_statement_type(&mut self, kind: StatementType, checked: bool) {
        let present = self.statement_types.contains(&kind);
        if checked && !present {
            self.statement_types.push(kind);
        } else if !checked {
            self.statement_types.retain(|t| *t != kind);
        }
    }

    /// Short human summary of the file selection.
    pub fn files_summary(&self) -> String {
        match self.files.as_slice() {
            [] => "No file chosen".to_string(),
            [single] => single.name.clone(),
            many => format!("{} files selected", many.len()),
        }
    }
}
