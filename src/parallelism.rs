// Concurrency cap -> rayon thread pool. One codepath covers serial,
// bounded-parallel, and unbounded-parallel by varying the pool size alone.

use std::thread::available_parallelism;

use crate::error::Result;

/// Resolves the `--jobs` CLI value against the number of files in this run.
/// `None` defaults to one worker per file (C = N), clamped to the host's
/// available parallelism; `Some(1)` selects the serial codepath.
pub fn resolve_cap(jobs: Option<usize>, file_count: usize) -> usize {
    let file_count = file_count.max(1);
    match jobs {
        Some(n) => n.max(1).min(file_count),
        None => {
            let host_cap = available_parallelism().map(|n| n.get()).unwrap_or(1);
            file_count.min(host_cap)
        }
    }
}

pub fn build_pool(cap: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cap)
        .build()
        .map_err(|e| crate::error::Error::Fatal(format!("failed to configure thread pool: {e}")))?;
    Ok(pool)
}
