// Archive layout: the directory header and the byte-aligned prefix of each
// per-file record (filename + uncompressed length). The tree and bit-stream
// portions of a record are handled by `tree` and `worker` respectively,
// since writing them requires the codec state a bare layout struct doesn't
// carry.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::Result;

/// The archive's directory header: directory name, file count, and the
/// offset table patched in once every worker has finished.
pub struct Header {
    pub dirname: String,
    pub offsets: Vec<u64>,
}

impl Header {
    pub fn num_files(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Total header length in bytes, i.e. the byte offset of the first
    /// per-file record (the value the orchestrator seeks back to when
    /// patching in the final offset table).
    pub fn byte_len(&self) -> u64 {
        8 + self.dirname.as_bytes().len() as u64 + 4 + 8 * self.offsets.len() as u64
    }

    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        let name_bytes = self.dirname.as_bytes();
        writer.write_u64(name_bytes.len() as u64)?;
        writer.write_bytes(name_bytes)?;
        writer.write_u32(self.num_files())?;
        for &offset in &self.offsets {
            writer.write_u64(offset)?;
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Header> {
        let dirname_len = reader.read_u64()? as usize;
        let dirname_bytes = reader.read_vec(dirname_len)?;
        let dirname = String::from_utf8(dirname_bytes)
            .map_err(|_| crate::error::Error::MalformedArchive("directory name is not valid utf-8".into()))?;
        let num_files = reader.read_u32()?;
        let mut offsets = Vec::with_capacity(num_files as usize);
        for _ in 0..num_files {
            offsets.push(reader.read_u64()?);
        }
        Ok(Header { dirname, offsets })
    }
}

/// The byte-aligned prefix of a per-file record: the duplicated offset,
/// filename, and uncompressed length. The tree and bit-stream follow
/// immediately after and are written/read by the caller.
pub struct RecordHeader {
    pub offset: u64,
    pub filename: String,
    pub uncompressed_len: u64,
}

impl RecordHeader {
    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        writer.write_u64(self.offset)?;
        write_record_prefix(writer, &self.filename, self.uncompressed_len)
    }

    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<RecordHeader> {
        let offset = reader.read_u64()?;
        let filename_len = reader.read_u64()? as usize;
        let filename_bytes = reader.read_vec(filename_len)?;
        let filename = String::from_utf8(filename_bytes)
            .map_err(|_| crate::error::Error::MalformedArchive("filename is not valid utf-8".into()))?;
        let uncompressed_len = reader.read_u64()?;
        Ok(RecordHeader { offset, filename, uncompressed_len })
    }
}

/// Writes the `filename_length`/`filename`/`uncompressed_length` fields
/// that make up a record's prefix once its leading `offset` is known — used
/// both by `RecordHeader::write` and by a compression worker staging a
/// record before any offset has been assigned.
pub fn write_record_prefix<W: Write>(writer: &mut BitWriter<W>, filename: &str, uncompressed_len: u64) -> Result<()> {
    let name_bytes = filename.as_bytes();
    writer.write_u64(name_bytes.len() as u64)?;
    writer.write_bytes(name_bytes)?;
    writer.write_u64(uncompressed_len)?;
    Ok(())
}

/// One row of the `list` subcommand's report, which only reads the
/// byte-aligned record headers and infers compressed size from the gap to
/// the next record's offset (or to the end of the archive) — no symbol data
/// is decoded.
pub struct ListRow {
    pub filename: String,
    pub uncompressed_code_points: u64,
    pub compressed_bytes: u64,
}

pub fn print_rows(rows: &[ListRow]) {
    println!("{:>15}  {:>20}  {:25}", "compressed", "uncompressed (cps)", "name");
    for row in rows {
        println!("{:>15}  {:>20}  {:25}", row.compressed_bytes, row.uncompressed_code_points, row.filename);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = Header { dirname: "books".into(), offsets: vec![40, 120, 9001] };
        let mut writer = BitWriter::new(Vec::new());
        header.write(&mut writer).unwrap();
        let buf = writer.into_inner().unwrap();
        assert_eq!(buf.len() as u64, header.byte_len());

        let mut reader = BitReader::new(&buf[..]);
        let restored = Header::read(&mut reader).unwrap();
        assert_eq!(restored.dirname, "books");
        assert_eq!(restored.offsets, vec![40, 120, 9001]);
    }

    #[test]
    fn record_header_round_trips() {
        let rec = RecordHeader { offset: 128, filename: "moby-dick.txt".into(), uncompressed_len: 12345 };
        let mut writer = BitWriter::new(Vec::new());
        rec.write(&mut writer).unwrap();
        let buf = writer.into_inner().unwrap();

        let mut reader = BitReader::new(&buf[..]);
        let restored = RecordHeader::read(&mut reader).unwrap();
        assert_eq!(restored.offset, 128);
        assert_eq!(restored.filename, "moby-dick.txt");
        assert_eq!(restored.uncompressed_len, 12345);
    }
}
