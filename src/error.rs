// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error types surfaced by the submission pipeline and the data service.

use thiserror::Error;

/// Shown when a failure carries no message of its own.
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit the form. Please try again.";

/// Failure of a webhook submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The webhook answered with a non-2xx status.
    #[error("HTTP error: {status} - {status_text}")]
    Status { status: u16, status_text: String },

    /// No response was received (DNS, TLS, offline, refused).
    #[error("Connection error. Check your internet connection and try again.")]
    Connectivity,

    /// Anything else, e.g. a selected file that can no longer be read.
    #[error("{}", unknown_message(.0))]
    Unknown(String),
}

fn unknown_message(message: &str) -> &str {
    if message.trim().is_empty() {
        GENERIC_SUBMIT_FAILURE
    } else {
        message
    }
}

impl From<anyhow::Error> for SubmitError {
    fn from(err: anyhow::Error) -> Self {
        SubmitError::Unknown(format!("{err:#}"))
    }
}

/// Failure talking to the hosted data/auth service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Auth(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Configuration loading/validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
