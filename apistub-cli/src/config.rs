//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `apistub.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use apistub::{ExcludedOperation, GeneratorOptions, Method, StubImports};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "apistub.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input document.
    pub spec: SpecConfig,

    /// Stub and index output.
    pub output: OutputConfig,

    /// Type-declarations output.
    pub types: TypesConfig,

    /// Module specifiers imported by stubs.
    pub imports: ImportsConfig,

    /// Operations that never get a stub.
    pub exclude: Vec<ExcludeConfig>,
}

/// Input document configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpecConfig {
    /// Path to the JSON or YAML document.
    pub path: PathBuf,
}

/// Stub output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the index and the `api/` tree.
    pub dir: PathBuf,

    /// Index filename.
    pub index_file: String,
}

/// Type-declarations output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypesConfig {
    /// Directory holding the declarations module.
    pub dir: PathBuf,

    /// Declarations filename.
    pub file: String,
}

/// Import specifiers written into every stub.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportsConfig {
    /// Specifier of the type-declarations module.
    pub types: String,

    /// Specifier of the request-transport helper.
    pub transport: String,
}

/// One `[[exclude]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExcludeConfig {
    /// HTTP method, any case.
    pub method: String,

    /// Route template, matched literally.
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec: SpecConfig::default(),
            output: OutputConfig::default(),
            types: TypesConfig::default(),
            imports: ImportsConfig::default(),
            exclude: vec![ExcludeConfig::from(&ExcludedOperation::default())],
        }
    }
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("openapi.json"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let options = GeneratorOptions::default();
        Self {
            dir: options.out_dir,
            index_file: options.index_file,
        }
    }
}

impl Default for TypesConfig {
    fn default() -> Self {
        let options = GeneratorOptions::default();
        Self {
            dir: options.types_dir,
            file: options.types_file,
        }
    }
}

impl Default for ImportsConfig {
    fn default() -> Self {
        let imports = StubImports::default();
        Self {
            types: imports.types,
            transport: imports.transport,
        }
    }
}

impl From<&ExcludedOperation> for ExcludeConfig {
    fn from(op: &ExcludedOperation) -> Self {
        Self {
            method: op.method.to_string(),
            path: op.path.clone(),
        }
    }
}

impl Config {
    /// Build generator options, validating the exclusion entries.
    pub fn generator_options(&self) -> CliResult<GeneratorOptions> {
        let exclude = self
            .exclude
            .iter()
            .map(|entry| -> CliResult<ExcludedOperation> {
                let method: Method = entry
                    .method
                    .parse()
                    .map_err(|e: String| ConfigError::invalid_value("exclude.method", e))?;
                Ok(ExcludedOperation::new(method, entry.path.clone()))
            })
            .collect::<CliResult<Vec<_>>>()?;

        Ok(GeneratorOptions {
            out_dir: self.output.dir.clone(),
            index_file: self.output.index_file.clone(),
            types_dir: self.types.dir.clone(),
            types_file: self.types.file.clone(),
            imports: StubImports {
                types: self.imports.types.clone(),
                transport: self.imports.transport.clone(),
            },
            exclude,
        })
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            debug!(path = %config_path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values. Exclusions given
    /// on the command line replace the configured list.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref spec) = args.spec {
            config.spec.path = spec.clone();
        }

        if let Some(ref out_dir) = args.out_dir {
            config.output.dir = out_dir.clone();
        }

        if let Some(ref index_file) = args.index_file {
            config.output.index_file = index_file.clone();
        }

        if let Some(ref types_out_dir) = args.types_out_dir {
            config.types.dir = types_out_dir.clone();
        }

        if let Some(ref types_file) = args.types_file {
            config.types.file = types_file.clone();
        }

        if !args.exclude.is_empty() {
            config.exclude = args.exclude.iter().map(ExcludeConfig::from).collect();
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# apistub configuration file

[spec]
# OpenAPI document to generate from (.json, .yaml or .yml)
path = "openapi.json"

[output]
# Directory for the index module and the api/<version>/<topic>/ stub tree
dir = "./src/generated"

# Index module re-exporting every stub
index_file = "index.ts"

[types]
# Directory for the type-declarations module
dir = "./src/generated/types"

# Type-declarations module filename
file = "api.ts"

[imports]
# Module specifier stubs import the type declarations from (as `Types`)
types = "@/generated/types/api"

# Module specifier of the request transport helper
transport = "@/lib/api/request"

# Operations that never get a stub. Routes are matched literally.
[[exclude]]
method = "GET"
path = "/v0/health"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Spec path override.
    pub spec: Option<PathBuf>,

    /// Output directory override.
    pub out_dir: Option<PathBuf>,

    /// Index filename override.
    pub index_file: Option<String>,

    /// Types output directory override.
    pub types_out_dir: Option<PathBuf>,

    /// Types filename override.
    pub types_file: Option<String>,

    /// Exclusion list override; empty keeps the configured list.
    pub exclude: Vec<ExcludedOperation>,
}
