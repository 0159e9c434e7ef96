// Per-file compression and decompression workers. Each function here is
// the complete job handed to one `rayon` task.

use std::fs::{self, File};
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::info;

use crate::bitio::{BitReader, BitWriter};
use crate::block::{self, RecordHeader};
use crate::codes::generate_codes;
use crate::error::{Error, Result};
use crate::freq::{read_code_points, FreqTable};
use crate::tree::{build_tree, read_tree, write_tree, Node};
use crate::utils::basename;

/// A fully-formed per-file record, built entirely in memory. `body` holds
/// every byte of the record *after* its leading `offset` field — the
/// orchestrator fills that field in once it has acquired the archive-write
/// lock and knows the record's real position.
pub struct CompressedRecord {
    pub filename: String,
    pub uncompressed_len: u64,
    pub body: Vec<u8>,
}

/// Reads, tabulates, builds the tree, generates codes, and serializes the
/// whole record into a staging buffer for one input file. Nothing here
/// touches the shared archive.
pub fn compress_file(path: &Path) -> Result<CompressedRecord> {
    info!("compressing {}", path.display());

    let code_points = read_code_points(path)?;
    if code_points.is_empty() {
        return Err(Error::EmptyAlphabet { path: path.display().to_string() });
    }

    let table = FreqTable::from_code_points(&code_points);
    let root = build_tree(&table)?;
    let codes = generate_codes(&root)?;
    let filename = basename(path)?;
    let single_leaf = root.is_leaf();

    let mut writer = BitWriter::new(Vec::new());
    block::write_record_prefix(&mut writer, &filename, code_points.len() as u64)?;
    write_tree(&mut writer, Some(&root))?;

    for &cp in &code_points {
        if single_leaf {
            // A lone symbol gets an arbitrary 1-bit code so the decoder can
            // still make progress one bit at a time.
            writer.write_bit(0)?;
        } else {
            let code = codes
                .get(&cp)
                .ok_or_else(|| Error::Fatal(format!("no code generated for U+{cp:04X}")))?;
            writer.write_code(code)?;
        }
    }

    let body = writer.into_inner()?;
    info!("finished compressing {} ({} code points)", path.display(), code_points.len());
    Ok(CompressedRecord { filename, uncompressed_len: code_points.len() as u64, body })
}

/// Seeks to a record's offset on a private handle, decodes it, and writes
/// the result under `output_dir`.
pub fn decompress_file(archive_path: &Path, offset: u64, output_dir: &Path, index: usize) -> Result<()> {
    info!("decompressing record {index}");

    let mut file = File::open(archive_path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut reader = BitReader::new(BufReader::new(file));

    let record = RecordHeader::read(&mut reader)?;
    let root = read_tree(&mut reader)?
        .ok_or_else(|| Error::MalformedArchive("record has an empty tree".into()))?;

    let text = decode_symbols(&mut reader, &root, record.uncompressed_len)?;

    let out_path: PathBuf = output_dir.join(&record.filename);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, text)?;

    info!("finished decompressing record {index} -> {}", out_path.display());
    Ok(())
}

/// Tree-walk decode, including the single-leaf special case: a degenerate
/// one-leaf tree consumes exactly one (discarded) bit per emitted code
/// point instead of walking absent children.
fn decode_symbols<R: std::io::Read>(reader: &mut BitReader<R>, root: &Node, count: u64) -> Result<String> {
    let mut out = String::new();

    if root.is_leaf() {
        let ch = char::from_u32(root.code_point)
            .ok_or_else(|| Error::MalformedArchive(format!("U+{:04X} is not a valid code point", root.code_point)))?;
        for _ in 0..count {
            reader.read_bit()?;
            out.push(ch);
        }
        return Ok(out);
    }

    let mut emitted = 0u64;
    while emitted < count {
        let mut cursor = root;
        while !cursor.is_leaf() {
            let bit = reader.read_bit()?;
            cursor = if bit == 0 {
                cursor.left.as_deref().ok_or_else(|| Error::Fatal("internal node missing left child".into()))?
            } else {
                cursor.right.as_deref().ok_or_else(|| Error::Fatal("internal node missing right child".into()))?
            };
        }
        let ch = char::from_u32(cursor.code_point)
            .ok_or_else(|| Error::MalformedArchive(format!("U+{:04X} is not a valid code point", cursor.code_point)))?;
        out.push(ch);
        emitted += 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::tempdir;

    #[test]
    fn compress_then_decode_in_process_round_trips() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("sample.txt");
        std::fs::write(&input_path, "héllo wörld\n").unwrap();

        let record = compress_file(&input_path).unwrap();

        // Splice the record together with its (known, since this is a
        // single-record test) offset of 0, then decode it back.
        let mut whole = Vec::new();
        whole.extend_from_slice(&0u64.to_le_bytes());
        whole.extend_from_slice(&record.body);
        let archive_path = dir.path().join("archive.bin");
        std::fs::File::create(&archive_path).unwrap().write_all(&whole).unwrap();

        let out_dir = dir.path().join("out");
        decompress_file(&archive_path, 0, &out_dir, 0).unwrap();

        let restored = std::fs::read_to_string(out_dir.join("sample.txt")).unwrap();
        assert_eq!(restored, "héllo wörld\n");
    }

    #[test]
    fn empty_file_is_empty_alphabet() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("empty.txt");
        std::fs::write(&input_path, "").unwrap();
        assert!(matches!(compress_file(&input_path), Err(Error::EmptyAlphabet { .. })));
    }
}
