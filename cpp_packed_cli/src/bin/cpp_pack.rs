//! `cpp-pack`: compress the files named by a JSON manifest into C++ sources.
//!
//! Run once with `--type header` and once with `--type source` to get both
//! halves of the generated asset map.
use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use cpp_packed::{DEFAULT_COMPRESSION_LEVEL, OutputType, Request};
use cpp_packed_cli::logging;

/// Compress and pack multiple files into C++ source code.
#[derive(Parser, Debug)]
#[command(name = "cpp-pack", version, about, long_about = None)]
struct Cli {
    /// JSON manifest: an array of glob patterns
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Path of the generated file
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Output type: header or source
    #[arg(long = "type", value_name = "TYPE")]
    output_type: OutputType,

    /// C++ namespace, e.g. `game::res`
    #[arg(long)]
    namespace: String,

    /// C++ variable name of the generated map
    #[arg(long)]
    varname: String,

    /// Directory that patterns and map keys are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Gzip compression level (0-9)
    #[arg(long, default_value_t = DEFAULT_COMPRESSION_LEVEL)]
    level: u32,

    /// Maximum number of packing threads
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli) -> Result<()> {
    let request = Request::new(&cli.input, &cli.output, cli.output_type)
        .namespace(&cli.namespace)?
        .varname(&cli.varname)?
        .level(cli.level)?
        .jobs(cli.jobs)
        .root(&cli.root);

    let entries = cpp_packed::generate(&request)
        .with_context(|| format!("failed to generate '{}'", cli.output.display()))?;
    tracing::debug!(files = entries.len(), "done");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
