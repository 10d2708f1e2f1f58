//! Up-to-date check for generated modules.
//!
//! Regenerates in memory and compares each module with what is on disk.

use crate::error::CliResult;
use apistub::GeneratedOutput;
use std::path::{Path, PathBuf};

/// State of one generated module relative to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatus {
    /// File content equals the fresh output.
    UpToDate(PathBuf),
    /// File exists with different content.
    Stale(PathBuf),
    /// File does not exist.
    Missing(PathBuf),
}

impl ModuleStatus {
    pub fn path(&self) -> &Path {
        match self {
            ModuleStatus::UpToDate(p) | ModuleStatus::Stale(p) | ModuleStatus::Missing(p) => p,
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        matches!(self, ModuleStatus::UpToDate(_))
    }
}

/// Outcome of checking a whole generation run.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub modules: Vec<ModuleStatus>,
}

impl CheckReport {
    /// Whether every module is up to date.
    pub fn is_clean(&self) -> bool {
        self.modules.iter().all(ModuleStatus::is_up_to_date)
    }

    /// Modules that are stale or missing.
    pub fn outdated(&self) -> impl Iterator<Item = &ModuleStatus> {
        self.modules.iter().filter(|m| !m.is_up_to_date())
    }
}

/// Compare every generated module with the file at its path.
///
/// Content must match byte for byte; an unreadable file is an error rather
/// than a mismatch.
pub fn check_output(output: &GeneratedOutput) -> CliResult<CheckReport> {
    let modules = output
        .modules()
        .map(|module| -> CliResult<ModuleStatus> {
            if !module.path.exists() {
                return Ok(ModuleStatus::Missing(module.path.clone()));
            }
            let on_disk = std::fs::read_to_string(&module.path)?;
            Ok(if on_disk == module.contents {
                ModuleStatus::UpToDate(module.path.clone())
            } else {
                ModuleStatus::Stale(module.path.clone())
            })
        })
        .collect::<CliResult<Vec<_>>>()?;

    Ok(CheckReport { modules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::FileWriter;
    use apistub::{Document, GeneratorOptions, StubGenerator};
    use serde_json::json;
    use tempfile::TempDir;

    fn output(root: &Path) -> GeneratedOutput {
        let document = Document::decode(&json!({
            "paths": {
                "/v0/bets/{id}": { "get": { "tags": ["Bets"] }, "delete": { "tags": ["Bets"] } }
            }
        }))
        .unwrap();
        let options = GeneratorOptions {
            out_dir: root.join("out"),
            types_dir: root.join("out/types"),
            ..GeneratorOptions::default()
        };
        StubGenerator::new(options).generate(&document)
    }

    #[test]
    fn test_everything_missing_before_generation() {
        let dir = TempDir::new().unwrap();
        let report = check_output(&output(dir.path())).unwrap();

        assert_eq!(report.modules.len(), 4);
        assert!(!report.is_clean());
        assert!(report
            .modules
            .iter()
            .all(|m| matches!(m, ModuleStatus::Missing(_))));
    }

    #[test]
    fn test_clean_after_write() {
        let dir = TempDir::new().unwrap();
        let output = output(dir.path());
        FileWriter::new(false).write_output(&output).unwrap();

        let report = check_output(&output).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.outdated().count(), 0);
    }

    #[test]
    fn test_hand_edit_is_stale() {
        let dir = TempDir::new().unwrap();
        let output = output(dir.path());
        FileWriter::new(false).write_output(&output).unwrap();

        let edited = dir.path().join("out/api/v0/bets/deleteById.ts");
        std::fs::write(&edited, "export async function deleteById() {}\n").unwrap();

        let report = check_output(&output).unwrap();
        let outdated: Vec<_> = report.outdated().collect();
        assert_eq!(outdated, vec![&ModuleStatus::Stale(edited)]);
    }
}
