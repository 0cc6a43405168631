use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,
}

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    #[command(name = "run")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },
}

/// Run the pipeline from raw reads to the OTU table.
///
/// ```bash
/// otupipe run -c config.toml -i /data/run42
/// ```
///
/// Stages whose output directory is already populated are skipped, so
/// re-running after a failure fast-forwards through completed work. Delete
/// a stage directory to force that stage (and everything after it) to run
/// again.
#[derive(Debug, Parser)]
pub struct RunArgs {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the configuration file",
        value_name = "CONFIG",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    #[arg(
        short = 'i',
        long = "input-dir",
        help = "Directory holding the raw paired-end read files",
        value_name = "DIR",
        default_value = "."
    )]
    pub input_dir: PathBuf,
}
