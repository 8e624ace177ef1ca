use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod recalibrate;

pub use config::Config;

/// mzrecal - Recalibrate MGF files from linear search mass errors
#[derive(Parser, Debug)]
#[command(name = "mzrecal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Linear search results (CSV)
    #[arg(long, value_name = "FILE")]
    pub linear_results: PathBuf,

    /// Peak annotations (TSV)
    #[arg(long, value_name = "FILE")]
    pub peaks: PathBuf,

    /// Input MGF file
    #[arg(long, value_name = "FILE")]
    pub mgf: PathBuf,

    /// Output recalibrated MGF file
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output mass error report (CSV)
    #[arg(long, value_name = "FILE")]
    pub error_report: PathBuf,

    /// Sample label for the report and plot file names [default: sample]
    #[arg(long)]
    pub prefix: Option<String>,

    /// Draw mass error distribution plots (requires the plot feature)
    #[arg(long)]
    pub plot: bool,

    /// Directory for plot files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub plot_dir: PathBuf,

    /// Minimum match score threshold [default: 6.0]
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Minimum number of precursors for recalibration [default: 50]
    #[arg(long)]
    pub min_precursors: Option<usize>,

    /// Half-width of the fragment error window in ppm [default: 30.0]
    #[arg(long)]
    pub ms2_error_bound: Option<f64>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    recalibrate::run(cli)
}
