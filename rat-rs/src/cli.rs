//! Root CLI structure for rat-rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rat-rs")]
#[command(about = "Command-line tools for RAT compressed vertex animations", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display information about a RAT animation file
    Info {
        /// Path to the RAT file
        file: PathBuf,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Validate a RAT animation file
    Validate {
        /// Path to the RAT file
        file: PathBuf,
    },

    /// Compress JSON vertex frames into a RAT animation
    Compress {
        /// Input JSON frame file
        input: PathBuf,

        /// Output RAT file
        output: PathBuf,

        /// Companion mesh data filename stored in the header
        #[arg(short, long, default_value = "")]
        mesh: String,

        /// Index count of the companion mesh
        #[arg(short, long, default_value = "0")]
        indices: u32,

        /// Store an unquantized copy of the first frame
        #[arg(long)]
        keep_raw_first_frame: bool,

        /// Cap per-vertex delta widths at this many bits (1-8, lossy)
        #[arg(long)]
        bit_width_cap: Option<u8>,

        /// Split output into chunks of at most this many bytes
        #[arg(short, long)]
        budget: Option<u64>,
    },

    /// Decompress a RAT animation back into JSON vertex frames
    Decompress {
        /// Input RAT file
        input: PathBuf,

        /// Output JSON frame file
        output: PathBuf,
    },

    /// Reassemble chunk files into a single RAT animation
    Assemble {
        /// Chunk files in part order
        #[arg(required = true)]
        chunks: Vec<PathBuf>,

        /// Output RAT file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
