// ABOUTME: JSON export of fetched data into the export directory
// ABOUTME: Pretty output uses four-space indentation; non-ASCII text is written as-is
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Writes `{filename}.json` files under one directory
#[derive(Debug, Clone)]
pub struct DataExporter {
    export_dir: PathBuf,
}

impl DataExporter {
    /// Exporter targeting `export_dir`
    #[must_use]
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Serialize `data` to `{export_dir}/{filename}.json` and return the path
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the file cannot be written, or a
    /// `SerializationError` if `data` cannot be serialized
    pub fn save_json<T: Serialize + ?Sized>(
        &self,
        data: &T,
        filename: &str,
        pretty: bool,
    ) -> AppResult<PathBuf> {
        let path = self.export_dir.join(format!("{filename}.json"));
        let file = File::create(&path).map_err(|e| {
            AppError::storage(format!("Failed to create {}: {e}", path.display())).with_source(e)
        })?;
        let mut writer = BufWriter::new(file);

        if pretty {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(&mut writer, formatter);
            data.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(&mut writer, data)?;
        }
        writer.flush()?;

        info!(path = %path.display(), pretty, "Exported JSON");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pretty_uses_four_spaces() -> AppResult<()> {
        let dir = TempDir::new()?;
        let exporter = DataExporter::new(dir.path());
        let path = exporter.save_json(&json!({"a": [1]}), "sample", true)?;

        assert_eq!(path, dir.path().join("sample.json"));
        let text = fs::read_to_string(path)?;
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}");
        Ok(())
    }

    #[test]
    fn test_compact_keeps_unicode() -> AppResult<()> {
        let dir = TempDir::new()?;
        let exporter = DataExporter::new(dir.path());
        let path = exporter.save_json(&json!({"name": "Café"}), "compact", false)?;

        assert_eq!(fs::read_to_string(path)?, "{\"name\":\"Café\"}");
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_storage_error() -> AppResult<()> {
        let dir = TempDir::new()?;
        let exporter = DataExporter::new(dir.path().join("absent"));
        let code = exporter.save_json(&json!([]), "x", true).err().map(|e| e.code);
        assert_eq!(code, Some(ErrorCode::StorageError));
        Ok(())
    }
}
