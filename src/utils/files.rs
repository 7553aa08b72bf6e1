// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Metadata helpers for user-selected files.

use std::path::Path;

use tracing::warn;

use crate::models::submission::SubmissionFile;
use crate::utils::hash_file;

/// Collect name, MIME type, size, and digest for a selected file.
///
/// Unreadable files are still returned (size 0, no digest) so the user sees them;
/// packaging reports the read error at submit time.
pub fn inspect_file(path: &Path) -> SubmissionFile {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let size = path.metadata().map(|m| m.len()).unwrap_or(0);
    let sha256 = match hash_file(path) {
        Ok(digest) => Some(digest),
        Err(err) => {
            warn!(path = %path.display(), "Could not hash selected file: {err:#}");
            None
        }
    };

    SubmissionFile {
        path: path.to_path_buf(),
        name,
        mime: guess_mime(path),
        size,
        sha256,
    }
}

/// Declared content type derived from the file extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Human-readable formatting for byte sizes with binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn inspect_reads_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("extrato março.pdf");
        fs::write(&path, b"12345").unwrap();

        let file = inspect_file(&path);

        assert_eq!(file.name, "extrato março.pdf");
        assert_eq!(file.mime, "application/pdf");
        assert_eq!(file.size, 5);
        assert_eq!(file.sha256.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn unreadable_file_has_no_digest() {
        let tmp = TempDir::new().unwrap();
        let file = inspect_file(&tmp.path().join("missing.xlsx"));

        assert_eq!(file.size, 0);
        assert!(file.sha256.is_none());
        assert_eq!(
            file.mime,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(guess_mime(Path::new("statement.zzz")), "application/octet-stream");
    }

    #[test]
    fn format_bytes_uses_binary_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
