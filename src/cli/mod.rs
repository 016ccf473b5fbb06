use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod demo;
mod info;
mod preprocess;

/// xcorrprep - spectrum preprocessing for tandem mass-spectrometry database search
#[derive(Parser)]
#[command(name = "xcorrprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the intake loop and worker pool against a scan source
    Preprocess {
        /// Input scan source path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the configured worker thread count
        #[arg(long)]
        threads: Option<usize>,

        /// Override the configured spectrum batch size
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Generate a synthetic scan stream and run it through preprocessing
    Demo {
        /// Number of synthetic scans to generate
        #[arg(short = 'n', long, default_value_t = 100)]
        scan_count: i32,

        /// Optional path to write a TOML summary of the run
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the resolved configuration as TOML
    Info {
        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
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
    match cli.command {
        Commands::Preprocess {
            input,
            config,
            threads,
            batch_size,
        } => preprocess::run(input, config, threads, batch_size),
        Commands::Demo {
            scan_count,
            output,
            config,
        } => demo::run(scan_count, output, config),
        Commands::Info { config } => info::run(config),
    }
}
