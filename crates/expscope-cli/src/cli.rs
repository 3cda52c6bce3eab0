use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "expscope")]
#[command(about = "expscope - Experiment results explorer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage configuration descriptor
    #[arg(
        long,
        env = "EXPSCOPE_STORAGE_CONFIG",
        default_value = "storage/sqlite.json"
    )]
    pub storage_config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the read-only HTTP API
    Serve {
        /// Port to listen on
        #[arg(long, env = "API_PORT", default_value = "8000")]
        port: u16,
    },

    /// List experiment ids
    Experiments,

    /// Dump one experiment's results as JSON row-records
    Results {
        /// Experiment id
        experiment_id: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build a JSON analysis report for one experiment
    Report {
        /// Experiment id
        experiment_id: String,

        /// Result column to analyze (e.g. result.latency_ms)
        #[arg(long)]
        metric: String,

        /// Column to group configurations by
        #[arg(long, default_value = "tunable_config_id")]
        group_col: String,

        /// Top/bottom group count for whisker plots
        #[arg(long, default_value = "5")]
        top_n: usize,

        /// Significance threshold for pairwise tests
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Test kind: welch or mann-whitney
        #[arg(long, default_value = "welch")]
        test: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
