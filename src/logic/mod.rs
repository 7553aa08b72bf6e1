// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effecting services: data store access, reference loading, accounts, packaging, and delivery.

pub mod accounts;
pub mod history;
pub mod memory_store;
pub mod packager;
pub mod reference;
pub mod rest_store;
pub mod store;
pub mod webhook;
