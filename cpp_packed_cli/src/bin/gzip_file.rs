//! `gzip-file`: compress a single file with gzip.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cpp_packed::DEFAULT_COMPRESSION_LEVEL;
use cpp_packed_cli::logging;

/// Compress a file using gzip.
#[derive(Parser, Debug)]
#[command(name = "gzip-file", version, about, long_about = None)]
struct Cli {
    /// Path to the input file
    input: PathBuf,

    /// Path to the output compressed file
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(0)?;

    let level = cpp_packed::level(DEFAULT_COMPRESSION_LEVEL)?;
    cpp_packed::compress_file(&cli.input, &cli.output, level)?;
    Ok(())
}
