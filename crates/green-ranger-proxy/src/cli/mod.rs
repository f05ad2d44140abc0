/*
[INPUT]:  Parsed command line arguments
[OUTPUT]: Subcommand definitions and dispatch
[POS]:    CLI layer - binary command surface
[UPDATE]: When adding subcommands or flags
*/

pub mod report;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "green-ranger",
    version,
    about = "Green Ranger proxy forwarder and energy reports"
)]
pub struct Cli {
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the proxy forwarder
    Serve(serve::ServeArgs),
    /// Print one day's generation, carbon estimate and mint amount as JSON
    Report(report::ReportArgs),
}

/// Arguments shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// YAML configuration file; defaults and environment apply without one
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,
}
