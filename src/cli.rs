//! Command-line interface for jsxscan.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::batch;
use crate::config::{self, Config};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable read for the log filter before `RUST_LOG`.
pub const LOG_ENV: &str = "JSXSCAN_LOG";

/// Extract component metadata from JSX/TSX source trees.
///
/// jsxscan finds the top-level declarations that are real UI components,
/// skipping constants, factories, instances and helpers, and reports their
/// props, hooks, imports, exports and doc comments.
#[derive(Parser)]
#[command(name = "jsxscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a file or directory for components
    Scan(ScanArgs),
    /// Write a commented configuration file
    Init(InitArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Emit records for custom hooks defined in hook files
    #[arg(long)]
    pub include_hooks: bool,

    /// List rejected candidates in pretty output
    #[arg(long)]
    pub show_rejected: bool,

    /// Exit with status 1 when more warnings than this are reported
    #[arg(long)]
    pub max_warnings: Option<usize>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "jsxscan.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Install the stderr log subscriber.
///
/// `JSXSCAN_LOG` wins over `RUST_LOG`; without either only warnings show.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // a second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let (mut config, config_path) = match Config::load(args.config.as_deref(), &cwd) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if args.include_hooks {
        config.include_hooks = Some(true);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = batch::collect_files(&abs_path, &config)?;
    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let root = if abs_path.is_file() {
        abs_path.parent().unwrap_or(Path::new("/")).to_path_buf()
    } else {
        abs_path.clone()
    };
    let mut result = batch::scan_paths(&root, &files, &config.scan_options());
    result.root = args.path.to_string_lossy().to_string();

    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    match args.format {
        Format::Json => report::write_json(&result, config_str.as_deref())?,
        Format::Pretty => report::write_pretty(&result, config_str.as_deref(), args.show_rejected),
    }

    match args.max_warnings {
        Some(max) if result.problem_count() > max => Ok(EXIT_FAILED),
        _ => Ok(EXIT_SUCCESS),
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite or --output to pick another path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, config::TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: jsxscan scan . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}
