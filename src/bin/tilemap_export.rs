use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tilemap_export::{export, ExportOptions, OutputFormat, DEFAULT_TILE_DATA_PROPERTY};

#[derive(Parser)]
#[command(name = "tilemap-export")]
#[command(about = "Export a tile map's cells and their walkability from a .tscn file")]
struct Args {
    /// Path to the .tscn file
    scene: PathBuf,

    /// Path of the tile map node, relative to the scene root
    tilemap: String,

    /// Output file, `-` for stdout
    output: String,

    /// Tile map property holding the cell pool
    #[arg(long, default_value = DEFAULT_TILE_DATA_PROPERTY)]
    property: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = if quiet || verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let text = std::fs::read_to_string(&args.scene)?;
    let options = ExportOptions {
        property: args.property.clone(),
        format: args.format,
    };

    let output = args.output.as_str();
    let summary = export(&text, &args.tilemap, &options, || -> tilemap_export::Result<Box<dyn Write>> {
        if output == "-" {
            Ok(Box::new(io::stdout().lock()))
        } else {
            Ok(Box::new(BufWriter::new(File::create(output)?)))
        }
    })?;

    tracing::info!(
        output = %args.output,
        rows = summary.cells,
        "export written"
    );
    Ok(())
}
