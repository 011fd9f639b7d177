//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod batch;
mod weave;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::Enumeration;
use crate::color::{parse_palette_entry, Palette};
use crate::config::{load_config, merge_cli_overrides, CliOverrides, WeaveConfig};
use crate::error::WeaveError;
use crate::options::Options;
use crate::pattern::TartanStyle;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "PLAINWEAVE_LOG";

/// plainweave - Weave plain-weave color patterns into WIF drafts and PNG swatches
#[derive(Parser)]
#[command(name = "plainweave")]
#[command(about = "Weave repeating color patterns into WIF drafts and PNG swatches")]
#[command(version)]
pub struct Cli {
    /// Path to plainweave.toml (default: search upward, then XDG config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress (debug level unless PLAINWEAVE_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Weave a single pattern
    Weave {
        /// Thread runs, e.g. "1-2" or "3,1,4"
        pattern: String,

        /// Reverse the color order in the weft
        #[arg(short, long, conflicts_with = "both")]
        reverse: bool,

        /// Write both the plain and the reversed variant
        #[arg(long)]
        both: bool,

        #[command(flatten)]
        tartan: TartanArgs,

        /// Only write the .wif document
        #[arg(long)]
        no_png: bool,

        /// Print the document to stdout instead of writing files
        #[arg(long, conflicts_with_all = ["both", "no_png"])]
        stdout: bool,

        #[command(flatten)]
        shared: SharedArgs,
    },

    /// Weave every pattern of an enumerated family, plain and reversed
    Batch {
        /// Pattern family to enumerate
        #[arg(value_enum)]
        kind: Enumeration,

        /// Largest thread run
        #[arg(long, default_value_t = 5)]
        values: u32,

        /// Shortest pattern
        #[arg(long, default_value_t = 2)]
        min_len: usize,

        /// Longest pattern
        #[arg(long, default_value_t = 5)]
        max_len: usize,

        #[command(flatten)]
        tartan: TartanArgs,

        /// Parallel workers (default: config, then available cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Skip remaining patterns after the first failure
        #[arg(long)]
        fail_fast: bool,

        #[command(flatten)]
        shared: SharedArgs,
    },
}

/// Tartan mirroring flags
#[derive(Args, Debug, Clone, Default)]
pub struct TartanArgs {
    /// Mirror the pattern into a tartan sett
    #[arg(long)]
    pub tartan: bool,

    /// Alternate tartan: keep the last run when mirroring
    #[arg(long, requires = "tartan")]
    pub alt: bool,
}

impl TartanArgs {
    pub fn style(&self) -> Option<TartanStyle> {
        match (self.tartan, self.alt) {
            (false, _) => None,
            (true, false) => Some(TartanStyle::Balanced),
            (true, true) => Some(TartanStyle::Alternate),
        }
    }
}

/// Weave flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SharedArgs {
    /// Loom harnesses
    #[arg(long)]
    pub harnesses: Option<u32>,

    /// Exact thread count (default: sized from --max-size)
    #[arg(long)]
    pub size: Option<usize>,

    /// Target thread count for automatic sizing
    #[arg(long)]
    pub max_size: Option<usize>,

    /// Cell edge in pixels
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Color table entry KEY=R,G,B (repeatable, replaces the configured table)
    #[arg(long = "color", value_name = "KEY=R,G,B", value_parser = parse_palette_entry)]
    pub colors: Vec<(String, String)>,

    /// Output directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Name appended to output files and titles
    #[arg(long)]
    pub nickname: Option<String>,

    /// File whose contents replace the generated notes
    #[arg(long, value_name = "FILE")]
    pub notes: Option<PathBuf>,
}

impl SharedArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dir: self.dir.clone(),
            harnesses: self.harnesses,
            size: self.size,
            max_size: self.max_size,
            grid_size: self.grid_size,
            colors: (!self.colors.is_empty())
                .then(|| Palette::from_pairs(self.colors.iter().cloned())),
            ..Default::default()
        }
    }
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Load plainweave.toml and apply CLI overrides.
pub(crate) fn resolve_config(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<WeaveConfig, ExitCode> {
    let mut config = match load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    merge_cli_overrides(&mut config, overrides);
    Ok(config)
}

/// Options for one weave from config plus the per-weave flags.
pub(crate) fn resolve_options(config: &WeaveConfig, shared: &SharedArgs) -> Result<Options, ExitCode> {
    let mut options = config.to_options();
    options.nickname = shared.nickname.clone();
    if let Some(path) = &shared.notes {
        match std::fs::read_to_string(path) {
            Ok(text) => options.notes = Some(text),
            Err(e) => {
                eprintln!("Error: cannot read notes file {}: {}", path.display(), e);
                return Err(ExitCode::from(EXIT_ERROR));
            }
        }
    }
    Ok(options)
}

/// Exit code for a failed weave.
pub(crate) fn exit_code_for(err: &WeaveError) -> ExitCode {
    match err {
        WeaveError::Configuration(_) => ExitCode::from(EXIT_INVALID_ARGS),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Weave { pattern, reverse, both, tartan, no_png, stdout, shared } => {
            let request = weave::WeaveRequest {
                pattern,
                reverse,
                both,
                tartan: tartan.style(),
                no_png,
                stdout,
            };
            weave::run_weave(&request, &shared, config_path)
        }
        Commands::Batch { kind, values, min_len, max_len, tartan, jobs, fail_fast, shared } => {
            let request = batch::BatchRequest {
                kind,
                values,
                min_len,
                max_len,
                tartan: tartan.style(),
                jobs,
                fail_fast,
            };
            batch::run_batch(&request, &shared, config_path)
        }
    }
}
