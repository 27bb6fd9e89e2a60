use std::path::PathBuf;

use clap::Parser;
use topo_sheets::convert::{default_output_path, tsv_to_topo};
use topo_sheets::logging::init_logging;
use topo_sheets::{Result, TopoConfig};

const USAGE: &str =
    "usage: topo-sheets <routes.tsv> [--config <config.json>] [--output <topo.xlsx>]";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("{USAGE}");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => TopoConfig::from_path(path)?,
        None => TopoConfig::default(),
    };
    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input));

    tsv_to_topo(&cli.input, &output, &config)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Turn a tab-separated route export into a printable topo workbook."
)]
struct Cli {
    /// Tab-separated route export.
    input: PathBuf,

    /// Output workbook; defaults to the input path with an .xlsx extension.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// JSON configuration overriding the built-in field labels and sheets.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log per-stage details.
    #[arg(long, short)]
    verbose: bool,
}
