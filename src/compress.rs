// Parallel compression orchestrator.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::bitio::BitWriter;
use crate::block::{self, Header, ListRow};
use crate::error::{Error, Result};
use crate::parallelism::{build_pool, resolve_cap};
use crate::utils::{basename, list_text_files};
use crate::worker::compress_file;

/// Compresses every `*.txt` file directly under `input_dir` into a single
/// archive at `archive_path`. `jobs` overrides the concurrency cap; `None`
/// defaults to one worker per file, clamped to the host's parallelism.
pub fn compress_dir(input_dir: &Path, archive_path: &Path, jobs: Option<usize>) -> Result<()> {
    let now = Instant::now();

    let input_paths = list_text_files(input_dir)?;
    if input_paths.is_empty() {
        return Err(Error::Fatal(format!("{} has no *.txt files to compress", input_dir.display())));
    }
    let dirname = basename(input_dir)?;

    let cap = resolve_cap(jobs, input_paths.len());
    info!("compressing {} files from {} with {cap} workers", input_paths.len(), input_dir.display());
    let pool = build_pool(cap)?;

    // Write a zeroed offset placeholder first so the header has a known
    // length; it's patched with real offsets once every worker finishes
    // appending.
    let placeholder = Header { dirname: dirname.clone(), offsets: vec![0; input_paths.len()] };
    let archive_file = File::create(archive_path)?;
    let mut header_writer = BitWriter::new(BufWriter::new(archive_file));
    placeholder.write(&mut header_writer)?;
    let buffered = header_writer.into_inner()?;
    let archive_file = buffered
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;

    // Each worker publishes exactly one slot via an atomic store; the shared
    // writer is guarded by a mutex held only around the append.
    let offsets: Vec<AtomicU64> = (0..input_paths.len()).map(|_| AtomicU64::new(0)).collect();
    let write_cursor = Mutex::new(archive_file);

    let results: Vec<Result<(String, u64)>> = pool.install(|| {
        input_paths
            .par_iter()
            .enumerate()
            .map(|(i, path)| {
                let record = compress_file(path)?;
                append_record(&write_cursor, &offsets, i, &record.body)?;
                Ok((record.filename, record.uncompressed_len))
            })
            .collect()
    });

    let mut files = Vec::with_capacity(results.len());
    for r in results {
        files.push(r?);
    }

    let offsets: Vec<u64> = offsets.iter().map(|a| a.load(Ordering::Relaxed)).collect();
    let final_header = Header { dirname, offsets: offsets.clone() };

    let mut file = write_cursor.into_inner().expect("mutex not poisoned");
    file.seek(SeekFrom::Start(0))?;
    let mut writer = BitWriter::new(BufWriter::new(file));
    final_header.write(&mut writer)?;
    writer.into_inner()?.flush()?;

    // Workers finish and append in whatever order rayon schedules them, so a
    // record's physical neighbor in the archive is not necessarily the next
    // index — find it by sorting offsets rather than assuming index order.
    let archive_len = std::fs::metadata(archive_path)?.len();
    let mut by_offset: Vec<usize> = (0..offsets.len()).collect();
    by_offset.sort_by_key(|&i| offsets[i]);
    let mut compressed_bytes = vec![0u64; offsets.len()];
    for (pos, &i) in by_offset.iter().enumerate() {
        let next_start = by_offset
            .get(pos + 1)
            .map(|&j| offsets[j])
            .unwrap_or(archive_len);
        compressed_bytes[i] = next_start.saturating_sub(offsets[i]);
    }
    let rows: Vec<ListRow> = files
        .iter()
        .enumerate()
        .map(|(i, (name, uncompressed_len))| ListRow {
            filename: name.clone(),
            uncompressed_code_points: *uncompressed_len,
            compressed_bytes: compressed_bytes[i],
        })
        .collect();

    info!("finished compressing {} files in {:.2?}", input_paths.len(), now.elapsed());
    block::print_rows(&rows);
    Ok(())
}

/// Appends one fully-built record under the archive-write lock: the lock is
/// acquired only for this single, already-complete write.
fn append_record(
    write_cursor: &Mutex<File>,
    offsets: &[AtomicU64],
    index: usize,
    body: &[u8],
) -> Result<()> {
    let mut file = write_cursor.lock().expect("archive write lock poisoned");
    let offset = file.stream_position()?;
    offsets[index].store(offset, Ordering::Relaxed);
    file.write_all(&offset.to_le_bytes())?;
    file.write_all(body)?;
    Ok(())
}
