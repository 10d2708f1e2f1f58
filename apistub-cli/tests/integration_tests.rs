//! Integration tests for apistub-cli.
//!
//! These tests drive the library the way the binary does: load config, merge
//! overrides, generate, write and check.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use apistub::{ExcludedOperation, Method};
use apistub_cli::{
    check::{check_output, ModuleStatus},
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    writer::FileWriter,
};

/// Get the path to test fixtures.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Config pointing the fixture spec at a temporary output tree.
fn project_config(root: &Path) -> Config {
    let config = ConfigManager::load(Some(&fixtures_path().join("apistub.toml"))).unwrap();
    ConfigManager::merge_cli_args(
        config,
        &CliArgs {
            spec: Some(fixtures_path().join("openapi.yaml")),
            out_dir: Some(root.join("web/generated")),
            types_out_dir: Some(root.join("web/generated/types")),
            ..Default::default()
        },
    )
}

// =============================================================================
// Config Integration Tests
// =============================================================================

#[test]
fn test_fixture_config_loads() {
    let config = ConfigManager::load(Some(&fixtures_path().join("apistub.toml"))).unwrap();

    assert_eq!(config.spec.path, PathBuf::from("openapi.yaml"));
    assert_eq!(config.output.dir, PathBuf::from("web/generated"));

    let options = config.generator_options().unwrap();
    assert_eq!(
        options.exclude,
        vec![
            ExcludedOperation::new(Method::Get, "/v0/health"),
            ExcludedOperation::new(Method::Delete, "/v0/bets/{id}"),
        ]
    );
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigManager::load(Some(&dir.path().join("apistub.toml"))).unwrap();

    assert_eq!(
        config.generator_options().unwrap(),
        Config::default().generator_options().unwrap()
    );
}

#[test]
fn test_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apistub.toml");
    fs::write(&path, "[output\ndir = 1").unwrap();

    let err = ConfigManager::load(Some(&path)).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

// =============================================================================
// Generation Integration Tests
// =============================================================================

#[test]
fn test_end_to_end_generation() {
    let dir = TempDir::new().unwrap();
    let config = project_config(dir.path());

    let output = apistub_cli::generate(&config).unwrap();
    let results = FileWriter::new(false).write_output(&output).unwrap();
    assert_eq!(results.len(), output.module_count());

    let generated = dir.path().join("web/generated");
    for stub in [
        "api/v0/markets/getMarkets.ts",
        "api/v0/markets/getById.ts",
        "api/v0/bets/postBets.ts",
        "api/v0/bets/getById2.ts",
        "api/v0/userBets/getByUserIdBets.ts",
    ] {
        assert!(generated.join(stub).exists(), "missing {}", stub);
    }

    // Both exclusions from the config file apply.
    assert!(!generated.join("api/v0/bets/deleteById.ts").exists());
    assert!(!generated.join("api/v0/misc").exists());

    let index = fs::read_to_string(generated.join("index.ts")).unwrap();
    assert_eq!(index.matches("export * from").count(), 5);

    let types = fs::read_to_string(generated.join("types/api.ts")).unwrap();
    assert!(types.contains("export interface PlaceBetRequest {"));
}

#[test]
fn test_cli_exclusions_replace_config() {
    let dir = TempDir::new().unwrap();
    let config = ConfigManager::merge_cli_args(
        project_config(dir.path()),
        &CliArgs {
            exclude: vec!["POST /v0/bet".parse().unwrap()],
            ..Default::default()
        },
    );

    let output = apistub_cli::generate(&config).unwrap();

    assert!(output.index.contents.contains("./api/v0/misc/getMisc\""));
    assert!(output.index.contents.contains("./api/v0/bets/deleteById\""));
    assert!(!output.index.contents.contains("postBets"));
}

#[test]
fn test_missing_spec_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let config = ConfigManager::merge_cli_args(
        project_config(dir.path()),
        &CliArgs {
            spec: Some(dir.path().join("nope.json")),
            ..Default::default()
        },
    );

    let err = apistub_cli::generate(&config).unwrap_err();
    assert!(matches!(err, CliError::Load(_)));
    assert!(!dir.path().join("web").exists());
}

#[test]
fn test_regeneration_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = project_config(dir.path());
    let writer = FileWriter::new(false);

    let first = apistub_cli::generate(&config).unwrap();
    writer.write_output(&first).unwrap();
    let snapshot = fs::read_to_string(&first.index.path).unwrap();

    let second = apistub_cli::generate(&config).unwrap();
    writer.write_output(&second).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second.index.path).unwrap(), snapshot);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = project_config(dir.path());

    let output = apistub_cli::generate(&config).unwrap();
    let results = FileWriter::new(true).write_output(&output).unwrap();

    assert!(results.iter().all(|r| !r.was_written()));
    assert!(!dir.path().join("web").exists());
}

// =============================================================================
// Check Integration Tests
// =============================================================================

#[test]
fn test_check_detects_missing_and_stale() {
    let dir = TempDir::new().unwrap();
    let config = project_config(dir.path());
    let output = apistub_cli::generate(&config).unwrap();

    assert!(!check_output(&output).unwrap().is_clean());

    FileWriter::new(false).write_output(&output).unwrap();
    assert!(check_output(&output).unwrap().is_clean());

    let types = dir.path().join("web/generated/types/api.ts");
    fs::write(&types, "export {};\n").unwrap();
    let stub = dir.path().join("web/generated/api/v0/bets/postBets.ts");
    fs::remove_file(&stub).unwrap();

    let report = check_output(&output).unwrap();
    let outdated: Vec<_> = report.outdated().cloned().collect();
    assert_eq!(
        outdated,
        vec![ModuleStatus::Missing(stub), ModuleStatus::Stale(types)]
    );
}

// =============================================================================
// Init Integration Tests
// =============================================================================

#[test]
fn test_init_content_round_trips_through_loader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("apistub.toml");
    fs::write(&path, ConfigManager::default_config_content()).unwrap();

    let config = ConfigManager::load(Some(&path)).unwrap();
    assert_eq!(
        config.generator_options().unwrap(),
        Config::default().generator_options().unwrap()
    );
}
