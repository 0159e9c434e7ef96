// Thin CLI entry point; all real work lives in the library so tests can
// call it in-process.

use clap::Parser;
use log::error;

use bookpress::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Command::Compress { input_dir, archive_path, jobs } => {
            bookpress::run_compress(&input_dir, &archive_path, jobs)
        }
        Command::Decompress { archive_path, output_root, jobs } => {
            bookpress::run_decompress(&archive_path, &output_root, jobs)
        }
        Command::List { archive_path } => bookpress::run_list(&archive_path),
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}
