// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod files;
pub mod hash;

/// Inspect a selected file (name, MIME type, size, digest).
pub use files::inspect_file;
/// Human-readable byte sizes.
pub use files::format_bytes;
/// SHA-256 digests of files and buffers.
pub use hash::{digest_bytes, hash_file};
