//! # mzrecal
//!
//! Command-line tool that recalibrates the m/z values of an MGF file from the
//! precursor and fragment mass errors observed in a prior identification search.
//!
//! ## Usage
//!
//! ```bash
//! mzrecal --linear-results linear_results.csv --peaks peaks.tsv \
//!     --mgf input.mgf --output recalibrated.mgf --error-report errors.csv
//!
//! # Label the report, draw histograms and read defaults from a config file
//! mzrecal --linear-results linear_results.csv --peaks peaks.tsv \
//!     --mgf input.mgf --output recalibrated.mgf --error-report errors.csv \
//!     --prefix run_01 --plot --config mzrecal.toml -v
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
