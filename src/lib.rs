// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Client statement submission desktop app.

pub mod app;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod ui;
pub mod utils;
