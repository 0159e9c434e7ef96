//! Parallel per-file Huffman compression for a directory of UTF-8 text
//! files, packed into a single self-describing archive that can be
//! decompressed record-by-record without reading the whole file first.

pub mod bitio;
pub mod block;
pub mod charset;
pub mod cli;
pub mod codes;
pub mod compress;
pub mod decompress;
pub mod error;
pub mod freq;
pub mod parallelism;
pub mod tree;
pub mod utils;
pub mod worker;

use std::path::Path;

pub use error::{Error, Result};

/// Entry point for the `compress` subcommand; also the seam integration
/// tests drive directly rather than shelling out to the built binary.
pub fn run_compress(input_dir: &Path, archive_path: &Path, jobs: Option<usize>) -> Result<()> {
    compress::compress_dir(input_dir, archive_path, jobs)
}

/// Entry point for the `decompress` subcommand.
pub fn run_decompress(archive_path: &Path, output_root: &Path, jobs: Option<usize>) -> Result<()> {
    decompress::decompress_archive(archive_path, output_root, jobs)
}

/// Entry point for the `list` subcommand.
pub fn run_list(archive_path: &Path) -> Result<()> {
    decompress::list_archive(archive_path)
}
