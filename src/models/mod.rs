// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared between UI and submission logic.

pub mod competence;
pub mod history;
pub mod institution;
pub mod session;
pub mod submission;
pub mod user;
pub mod validation;
