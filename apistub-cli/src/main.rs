//! # apistub
//!
//! CLI tool for generating TypeScript API stubs from OpenAPI documents.
//!
//! ## Usage
//!
//! ```bash
//! # Generate stubs and type declarations from ./openapi.json
//! apistub generate
//!
//! # Generate from a YAML document into a custom directory
//! apistub generate --spec api/openapi.yaml --out-dir ./web/api
//!
//! # Watch the spec and regenerate on change
//! apistub generate --watch
//!
//! # Preview without writing
//! apistub generate --dry-run
//!
//! # Fail (exit code 2) when generated files are out of date
//! apistub check
//!
//! # Initialize configuration
//! apistub init
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use apistub::{ExcludedOperation, GeneratedOutput};
use apistub_cli::{
    check::{check_output, ModuleStatus},
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    logging,
    watcher::SpecWatcher,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "apistub")]
#[command(author, version, about = "Generate TypeScript API stubs from OpenAPI documents", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate operation stubs, the index and type declarations
    Generate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Watch the spec file and regenerate on change
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that generated files are up-to-date
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Initialize a new apistub configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Inputs shared by `generate` and `check`.
#[derive(Args)]
struct InputArgs {
    /// OpenAPI document (.json, .yaml or .yml)
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// Output directory for the index and stub tree
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Index module filename
    #[arg(long)]
    index_file: Option<String>,

    /// Output directory for the type-declarations module
    #[arg(long)]
    types_out_dir: Option<PathBuf>,

    /// Type-declarations module filename
    #[arg(long)]
    types_file: Option<String>,

    /// Operation to skip, as "METHOD /route" (repeatable; replaces configured exclusions)
    #[arg(long, value_name = "METHOD /ROUTE")]
    exclude: Vec<ExcludedOperation>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl InputArgs {
    /// Load the config file and apply command-line overrides.
    fn resolve(self) -> Result<Config, CliError> {
        let config = ConfigManager::load(self.config.as_deref())?;
        Ok(ConfigManager::merge_cli_args(
            config,
            &CliArgs {
                spec: self.spec,
                out_dir: self.out_dir,
                index_file: self.index_file,
                types_out_dir: self.types_out_dir,
                types_file: self.types_file,
                exclude: self.exclude,
            },
        ))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            inputs,
            watch,
            dry_run,
        } => cmd_generate(inputs.resolve()?, watch, dry_run),

        Commands::Check { inputs } => cmd_check(inputs.resolve()?),

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

/// Generate command implementation.
fn cmd_generate(config: Config, watch: bool, dry_run: bool) -> Result<(), CliError> {
    if watch {
        run_watch_mode(&config, dry_run)
    } else {
        run_generate(&config, dry_run)
    }
}

/// Run generation once.
fn run_generate(config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!(
        "{} {}",
        "Loading specification".cyan(),
        config.spec.path.display()
    );

    let output = apistub_cli::generate(config)?;
    report_unmatched(&output);

    println!(
        "  Generated {} stub(s) and {} module(s) in total",
        output.stubs.len().to_string().green(),
        output.module_count().to_string().green()
    );

    let writer = FileWriter::new(dry_run);
    let results = writer.write_output(&output)?;

    let mut bytes = 0;
    for result in results {
        match result {
            WriteResult::Written { bytes: n, .. } => bytes += n,
            WriteResult::DryRun { content, path } => {
                println!(
                    "{} Would write to {}:",
                    "[dry-run]".yellow(),
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    if !writer.is_dry_run() {
        println!(
            "{} Written {} bytes to {} and {}",
            "✓".green(),
            bytes,
            config.output.dir.display(),
            config.types.dir.display()
        );
    }
    info!(stubs = output.stubs.len(), dry_run, "run finished");

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", config.spec.path.display());
    println!("  Press Ctrl+C to stop\n");

    // A broken spec should not end the session before it has been fixed.
    if let Err(e) = run_generate(config, dry_run) {
        println!("{} {}", "Generation error:".red(), e);
    }

    let watcher = SpecWatcher::new(&config.spec.path);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Spec changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(config, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(config: Config) -> Result<(), CliError> {
    println!("{}", "Checking generated files...".cyan());

    let output = apistub_cli::generate(&config)?;
    report_unmatched(&output);

    let report = check_output(&output)?;
    if report.is_clean() {
        println!(
            "{} {} module(s) are up-to-date",
            "✓".green(),
            report.modules.len()
        );
        return Ok(());
    }

    let mut outdated = 0;
    for status in report.outdated() {
        outdated += 1;
        match status {
            ModuleStatus::Missing(path) => println!("  {} {}", "missing".red(), path.display()),
            ModuleStatus::Stale(path) => println!("  {} {}", "stale".yellow(), path.display()),
            ModuleStatus::UpToDate(_) => {}
        }
    }

    println!("{} Generated files are out of date", "✗".red());
    println!("  Run 'apistub generate' to update");
    Err(CliError::Validation(format!(
        "{} generated module(s) out of date",
        outdated
    )))
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Warn about exclusions that no longer match any operation.
fn report_unmatched(output: &GeneratedOutput) {
    for exclusion in &output.unmatched_exclusions {
        warn!(%exclusion, "exclusion matched no operation");
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
