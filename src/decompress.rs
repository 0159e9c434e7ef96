// Parallel decompression orchestrator. Unlike compression, workers need no
// shared lock here — each opens its own handle and seeks to its own
// record's offset.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::bitio::BitReader;
use crate::block::{self, Header, ListRow, RecordHeader};
use crate::error::Result;
use crate::parallelism::{build_pool, resolve_cap};
use crate::worker::decompress_file;

/// Decompresses every record in `archive_path` into `output_root/<dirname>/`,
/// where `dirname` is the directory name recorded in the archive header.
pub fn decompress_archive(archive_path: &Path, output_root: &Path, jobs: Option<usize>) -> Result<()> {
    let now = Instant::now();

    let header = read_header(archive_path)?;
    let output_dir = output_root.join(&header.dirname);
    fs::create_dir_all(&output_dir)?;

    let cap = resolve_cap(jobs, header.offsets.len());
    info!("decompressing {} records from {} with {cap} workers", header.offsets.len(), archive_path.display());
    let pool = build_pool(cap)?;

    let results: Vec<Result<()>> = pool.install(|| {
        header
            .offsets
            .par_iter()
            .enumerate()
            .map(|(i, &offset)| decompress_file(archive_path, offset, &output_dir, i))
            .collect()
    });
    for r in results {
        r?;
    }

    info!("finished decompressing {} records in {:.2?}", header.offsets.len(), now.elapsed());
    Ok(())
}

/// Reads only the byte-aligned prefix of every record (no tree, no bit
/// stream) to print a summary without decoding any symbol data.
pub fn list_archive(archive_path: &Path) -> Result<()> {
    let header = read_header(archive_path)?;
    let archive_len = fs::metadata(archive_path)?.len();

    let mut rows = Vec::with_capacity(header.offsets.len());
    let mut sorted_offsets = header.offsets.clone();
    sorted_offsets.sort_unstable();

    for &offset in &header.offsets {
        let mut file = File::open(archive_path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut reader = BitReader::new(file);
        let record = RecordHeader::read(&mut reader)?;

        let next_offset = sorted_offsets
            .iter()
            .find(|&&o| o > offset)
            .copied()
            .unwrap_or(archive_len);
        rows.push(ListRow {
            filename: record.filename,
            uncompressed_code_points: record.uncompressed_len,
            compressed_bytes: next_offset.saturating_sub(offset),
        });
    }

    block::print_rows(&rows);
    Ok(())
}

fn read_header(archive_path: &Path) -> Result<Header> {
    let file = File::open(archive_path)?;
    let mut reader = BitReader::new(file);
    Header::read(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::compress_dir;
    use tempfile::tempdir;

    #[test]
    fn decompresses_every_record_into_the_archived_directory_name() {
        let workdir = tempdir().unwrap();
        let input_dir = workdir.path().join("books");
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("a.txt"), "the quick brown fox").unwrap();
        fs::write(input_dir.join("b.txt"), "jumps over the lazy dog").unwrap();

        let archive_path = workdir.path().join("archive.bin");
        compress_dir(&input_dir, &archive_path, Some(2)).unwrap();

        let output_root = workdir.path().join("out");
        decompress_archive(&archive_path, &output_root, Some(2)).unwrap();

        let restored_dir = output_root.join("books");
        assert_eq!(fs::read_to_string(restored_dir.join("a.txt")).unwrap(), "the quick brown fox");
        assert_eq!(fs::read_to_string(restored_dir.join("b.txt")).unwrap(), "jumps over the lazy dog");
    }

    #[test]
    fn list_reports_every_record_without_writing_output() {
        let workdir = tempdir().unwrap();
        let input_dir = workdir.path().join("books");
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("a.txt"), "hello").unwrap();

        let archive_path = workdir.path().join("archive.bin");
        compress_dir(&input_dir, &archive_path, Some(1)).unwrap();

        list_archive(&archive_path).unwrap();
    }
}
