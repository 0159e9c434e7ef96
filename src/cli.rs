// Command-line surface, built on the same `clap` dependency used elsewhere
// in the pack for subcommand-based tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookpress", version, about = "Parallel per-file Huffman compressor for directories of UTF-8 text")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (overrides RUST_LOG if set multiple times).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compress every *.txt file under a directory into a single archive.
    Compress {
        input_dir: PathBuf,
        archive_path: PathBuf,
        /// Worker count; defaults to one worker per file, capped to the host's parallelism.
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Decompress an archive's records back into a directory tree.
    Decompress {
        archive_path: PathBuf,
        output_root: PathBuf,
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Print each record's name and size without decoding its contents.
    List { archive_path: PathBuf },
}
