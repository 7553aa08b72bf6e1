// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field-level validation for draft submissions.
//!
//! Every rule is evaluated on each pass; the result is the union of failures.
//! The competence format rule is advisory and never blocks submission.

use std::collections::BTreeMap;

use crate::models::competence::competence_format_issue;
use crate::models::submission::DraftSubmission;

/// Form fields that can carry a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Files,
    Client,
    StatementTypes,
    Institution,
    Competence,
}

impl Field {
    /// Fields whose errors block submission.
    pub const REQUIRED: [Field; 4] = [
        Field::Files,
        Field::Client,
        Field::StatementTypes,
        Field::Institution,
    ];
}

/// Reason code attached to a failing field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    InvalidFormat,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::Required => "required",
            ValidationCode::InvalidFormat => "invalid_format",
        }
    }
}

/// Mapping from field to failure, recomputed wholesale on every validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, ValidationCode>,
}

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<ValidationCode> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Human-readable message for a field, when it failed.
    pub fn message(&self, field: Field) -> Option<&'static str> {
        self.get(field).map(|code| message_for(field, code))
    }

    /// True when any required field failed. Advisory errors are ignored.
    pub fn blocks_submission(&self) -> bool {
        Field::REQUIRED.iter().any(|f| self.errors.contains_key(f))
    }

    fn insert(&mut self, field: Field, code: ValidationCode) {
        self.errors.insert(field, code);
    }
}

/// Validate a draft submission against all field rules.
pub fn validate(draft: &DraftSubmission) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.files.is_empty() {
        errors.insert(Field::Files, ValidationCode::Required);
    }
    if draft.client.is_empty() {
        errors.insert(Field::Client, ValidationCode::Required);
    }
    if draft.statement_types.is_empty() {
        errors.insert(Field::StatementTypes, ValidationCode::Required);
    }
    if draft.institution.is_empty() {
        errors.insert(Field::Institution, ValidationCode::Required);
    }
    if competence_format_issue(&draft.competence) {
        errors.insert(Field::Competence, ValidationCode::InvalidFormat);
    }

    errors
}

fn message_for(field: Field, code: ValidationCode) -> &'static str {
    match (field, code) {
        (Field::StatementTypes, ValidationCode::Required) => "Select at least one type",
        (Field::Competence, ValidationCode::InvalidFormat) => "Invalid format. Use MM/YYYY",
        (_, ValidationCode::Required) => "This field is required",
        (_, ValidationCode::InvalidFormat) => "Invalid format",
    }
}
