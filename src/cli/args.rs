use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "batchmap")]
#[command(
    about = "Map inputs in parallel batches and reduce them into a compressed file",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write size, line count and xxh64 of every input file as gzipped JSON lines
    Digest {
        /// Files or directories to process (directories are walked recursively)
        #[arg(required_unless_present = "list")]
        inputs: Vec<PathBuf>,

        /// Output file (created or truncated)
        #[arg(short, long)]
        output: PathBuf,

        /// Read additional input paths from a file, one per line
        #[arg(long)]
        list: Option<PathBuf>,

        /// Only include walked files with these extensions
        #[arg(long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        /// Skip walked files matching these glob patterns
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Inputs per batch (overrides config file)
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Worker threads, 0 for one per core (overrides config file)
        #[arg(short, long, env = "BATCHMAP_JOBS")]
        jobs: Option<usize>,

        /// Map every batch on the main thread
        #[arg(long)]
        sequential: bool,

        /// gzip level 0-9 (overrides config file)
        #[arg(long)]
        level: Option<u32>,

        /// Config file (defaults to ./batchmap.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
