//! Command-line driver. Parses a `.graph` stream through a
//! [`graphzip::Compressor`] and writes the resulting pattern dictionary to
//! stdout or a file.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use graphzip::{output, CompressorConfig, Compressor};

#[derive(Debug, Parser)]
#[command(author, version, about, propagate_version = true)]
struct Args {
    /// One or more `.graph` input files, processed in order.
    inputs: Vec<PathBuf>,

    /// alpha: edges per batch.
    #[arg(long, default_value_t = 10)]
    batch_size: usize,

    /// theta: dictionary size bound. Omit for unbounded.
    #[arg(long)]
    dict_size: Option<usize>,

    /// Treat batch/pattern graphs as directed.
    #[arg(long)]
    directed: bool,

    /// Ignore labels during subgraph matching (diagnostic mode).
    #[arg(long)]
    loose_match: bool,

    /// Disallow implicit vertex addition; an undeclared endpoint is a
    /// hard error.
    #[arg(long)]
    no_implicit_vertices: bool,

    /// Clear the vertex-id-to-label map at the end of each file instead
    /// of sharing it across inputs.
    #[arg(long)]
    per_file_labels: bool,

    /// Load a previously saved compressor state before processing.
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Save compressor state here after processing.
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Write the dictionary dump here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render the dictionary as a single combined SVG grid at this path.
    #[cfg(feature = "svg")]
    #[arg(long)]
    svg_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("graphzip: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> graphzip::Result<()> {
    let config = CompressorConfig {
        batch_size: args.batch_size,
        dict_size: args.dict_size,
        directed: args.directed,
        match_strict: !args.loose_match,
        add_implicit_vertices: !args.no_implicit_vertices,
        label_history_per_file: args.per_file_labels,
    };
    config.validate()?;

    let mut compressor = match &args.load_state {
        Some(path) => Compressor::load_state(config, path)?,
        None => Compressor::new(config)?,
    };

    for input in &args.inputs {
        compressor.compress_file(input)?;
    }

    if let Some(path) = &args.save_state {
        compressor.save_state(path)?;
    }

    match &args.out {
        Some(path) => {
            let file = File::create(path)?;
            output::write_dictionary(compressor.dictionary(), BufWriter::new(file))?;
        }
        None => {
            output::write_dictionary(compressor.dictionary(), io::stdout().lock())?;
        }
    }

    #[cfg(feature = "svg")]
    if let Some(path) = &args.svg_out {
        graphzip::visualize::visualize_dictionary_grid(compressor.dictionary(), path, None)?;
    }

    Ok(())
}
