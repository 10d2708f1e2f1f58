//! File writer for generated modules.
//!
//! Writes are whole-file overwrites with parent directories created on
//! demand. Dry-run mode returns what would have been written instead.

use crate::error::{CliResult, WriteError};
use apistub::GeneratedOutput;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        trace!(path = %path.display(), bytes = content.len(), "wrote module");

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Write every module of a generation run, stubs first.
    ///
    /// Stops at the first failure; modules already written stay on disk.
    pub fn write_output(&self, output: &GeneratedOutput) -> CliResult<Vec<WriteResult>> {
        output
            .modules()
            .map(|module| self.write(&module.path, &module.contents))
            .collect()
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::DryRun { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apistub::{Document, GeneratorOptions, StubGenerator};
    use serde_json::json;
    use tempfile::TempDir;

    const CONTENT: &str = "export async function getById() {}\n";

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("getById.ts");

        let writer = FileWriter::new(false);
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api/v0/markets/getById.ts");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(result.was_written());
        assert!(path.exists());
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("getById.ts");
        std::fs::write(&path, "// hand-written implementation\n").unwrap();

        FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("getById.ts");

        let writer = FileWriter::new(true);
        assert!(writer.is_dry_run());
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(!path.exists());
        assert_eq!(result.bytes(), 0);
        match result {
            WriteResult::DryRun { content, .. } => assert_eq!(content, CONTENT),
            WriteResult::Written { .. } => panic!("dry run wrote a file"),
        }
    }

    #[test]
    fn test_write_output() {
        let dir = TempDir::new().unwrap();
        let document = Document::decode(&json!({
            "paths": { "/v0/markets/{id}": { "get": { "tags": ["Markets"] } } }
        }))
        .unwrap();
        let options = GeneratorOptions {
            out_dir: dir.path().join("generated"),
            types_dir: dir.path().join("generated/types"),
            ..GeneratorOptions::default()
        };
        let output = StubGenerator::new(options).generate(&document);

        let results = FileWriter::new(false).write_output(&output).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(WriteResult::was_written));
        assert!(dir.path().join("generated/api/v0/markets/getById.ts").exists());
        assert!(dir.path().join("generated/index.ts").exists());
        assert!(dir.path().join("generated/types/api.ts").exists());
    }

    #[test]
    fn test_write_result_accessors() {
        let path = PathBuf::from("/test/getById.ts");

        let written = WriteResult::Written {
            path: path.clone(),
            bytes: 100,
        };
        assert_eq!(written.path(), path.as_path());
        assert_eq!(written.bytes(), 100);

        let dry_run = WriteResult::DryRun {
            content: "test".to_string(),
            path: path.clone(),
        };
        assert_eq!(dry_run.path(), path.as_path());
        assert!(!dry_run.was_written());
    }
}
