//! # apistub-cli
//!
//! CLI library for generating TypeScript API stubs from OpenAPI documents.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`writer`] - File output and dry-run support
//! - [`check`] - Comparing a fresh run with files on disk
//! - [`watcher`] - Spec file watching for development mode
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Error types and handling

pub mod check;
pub mod config;
pub mod error;
pub mod logging;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use check::{check_output, CheckReport, ModuleStatus};
pub use config::{CliArgs, Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use watcher::SpecWatcher;
pub use writer::FileWriter;

use apistub::{GeneratedOutput, SpecLoader, StubGenerator};

/// Load the configured spec and run the generator over it, in memory.
pub fn generate(config: &Config) -> CliResult<GeneratedOutput> {
    let options = config.generator_options()?;
    let document = SpecLoader::load(&config.spec.path)?;
    Ok(StubGenerator::new(options).generate(&document))
}
