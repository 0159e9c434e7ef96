// Text reader and frequency tabulator.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads a whole UTF-8 file into its sequence of code points. Whitespace and
/// line breaks are ordinary symbols here and are not filtered out.
pub fn read_code_points(path: &Path) -> Result<Vec<u32>> {
    let bytes = fs::read(path)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| Error::InvalidUtf8 { path: path.display().to_string() })?;
    Ok(text.chars().map(|c| c as u32).collect())
}

/// A sparse code-point → count mapping. Implemented as a `HashMap` rather
/// than the classically-sized `[u64; 65536]` array so that code points
/// outside the Basic Multilingual Plane are tabulated rather than dropped;
/// the on-disk `u32` width already accommodates the full range.
#[derive(Default)]
pub struct FreqTable {
    counts: HashMap<u32, u64>,
}

impl FreqTable {
    pub fn new() -> Self {
        FreqTable::default()
    }

    pub fn record(&mut self, code_point: u32) {
        *self.counts.entry(code_point).or_insert(0) += 1;
    }

    pub fn from_code_points(code_points: &[u32]) -> Self {
        let mut table = FreqTable::new();
        for &cp in code_points {
            table.record(cp);
        }
        table
    }

    pub fn get(&self, code_point: u32) -> u64 {
        self.counts.get(&code_point).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Non-zero entries in code-point ascending order, the normalization
    /// that keeps tree construction deterministic run over run.
    pub fn iter_ascending(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        let mut entries: Vec<(u32, u64)> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        entries.sort_unstable_by_key(|&(cp, _)| cp);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabulates_whitespace_as_ordinary_symbols() {
        let table = FreqTable::from_code_points(&"a a\n".chars().map(|c| c as u32).collect::<Vec<_>>());
        assert_eq!(table.get(' ' as u32), 1);
        assert_eq!(table.get('\n' as u32), 1);
        assert_eq!(table.get('a' as u32), 2);
    }

    #[test]
    fn ascending_iteration_is_sorted_by_code_point() {
        let table = FreqTable::from_code_points(&[99, 1, 50]);
        let order: Vec<u32> = table.iter_ascending().map(|(cp, _)| cp).collect();
        assert_eq!(order, vec![1, 50, 99]);
    }
}
