// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod auth;
pub mod files;
pub mod history;
pub mod institutions;
pub mod statement_form;
pub mod users;
