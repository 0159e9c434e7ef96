// The Huffman tree: node shape, min-heap construction, and pre-order
// (de)serialization.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::charset::{NODE_ABSENT, NODE_PRESENT};
use crate::error::{Error, Result};
use crate::freq::FreqTable;

/// A node in the Huffman tree. A leaf has both children `None`; an internal
/// node owns exactly two children. `code_point` is meaningless for an
/// internal node (kept at 0) but still occupies its slot on the wire, since
/// the format serializes it unconditionally alongside `count`.
pub struct Node {
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    pub code_point: u32,
    pub count: u64,
}

impl Node {
    pub fn leaf(code_point: u32, count: u64) -> Node {
        Node { left: None, right: None, code_point, count }
    }

    pub fn internal(left: Box<Node>, right: Box<Node>) -> Node {
        Node {
            count: left.count + right.count,
            left: Some(left),
            right: Some(right),
            code_point: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

// BinaryHeap is a max-heap; reversing the comparison on `count` turns it
// into a min-heap. Ties resolve to `Ordering::Equal`, so pop order among
// equal-count nodes follows the insertion order fed in by `build_tree`
// (code-point ascending), keeping the tree deterministic run over run.
impl Eq for Node {}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other.count.cmp(&self.count)
    }
}

/// Builds the optimal prefix-code tree for a frequency table. Fails with
/// `Fatal` if no code point has a non-zero count (callers reject an empty
/// alphabet earlier, so this is an unreachable-invariant guard).
pub fn build_tree(freq_table: &FreqTable) -> Result<Box<Node>> {
    let mut heap: BinaryHeap<Box<Node>> = BinaryHeap::new();
    for (code_point, count) in freq_table.iter_ascending() {
        heap.push(Box::new(Node::leaf(code_point, count)));
    }
    if heap.is_empty() {
        return Err(Error::Fatal("build_tree called with an empty heap".into()));
    }

    while heap.len() > 1 {
        let first = heap.pop().expect("heap had at least 2 elements");
        let second = heap.pop().expect("heap had at least 2 elements");
        heap.push(Box::new(Node::internal(first, second)));
    }

    Ok(heap.pop().expect("heap is non-empty after the algorithm"))
}

/// Pre-order serialization. Byte-aligned, independent of the bit packer
/// used for the encoded payload that follows it in the archive.
pub fn write_tree<W: Write>(writer: &mut BitWriter<W>, node: Option<&Node>) -> Result<()> {
    match node {
        None => writer.write_u8(NODE_ABSENT)?,
        Some(n) => {
            writer.write_u8(NODE_PRESENT)?;
            writer.write_u32(n.code_point)?;
            // Counts are redundant at decode time (the tree shape alone drives
            // decoding), so clamping instead of erroring here never corrupts a
            // round trip. Still, no real corpus should ever reach a per-symbol
            // count anywhere near u32::MAX.
            debug_assert!(n.count <= u32::MAX as u64, "code point {} count overflows u32 on write", n.code_point);
            writer.write_u32(n.count.min(u32::MAX as u64) as u32)?;
            write_tree(writer, n.left.as_deref())?;
            write_tree(writer, n.right.as_deref())?;
        }
    }
    Ok(())
}

/// Pre-order deserialization. Returns `None` for an absent position; a
/// non-0/1 marker byte is a malformed archive.
pub fn read_tree<R: Read>(reader: &mut BitReader<R>) -> Result<Option<Box<Node>>> {
    let marker = reader.read_u8()?;
    match marker {
        NODE_ABSENT => Ok(None),
        NODE_PRESENT => {
            let code_point = reader.read_u32()?;
            let count = reader.read_u32()? as u64;
            let left = read_tree(reader)?;
            let right = read_tree(reader)?;
            Ok(Some(Box::new(Node { left, right, code_point, count })))
        }
        other => Err(Error::MalformedArchive(format!(
            "invalid tree marker byte {other}, expected 0 or 1"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freq::FreqTable;

    #[test]
    fn tree_frequency_invariant_holds() {
        let mut table = FreqTable::new();
        for (cp, n) in [('a', 3u64), ('b', 2), ('c', 1)] {
            for _ in 0..n {
                table.record(cp as u32);
            }
        }
        let root = build_tree(&table).unwrap();
        assert_invariant(&root);
    }

    fn assert_invariant(node: &Node) {
        if !node.is_leaf() {
            let left = node.left.as_ref().unwrap();
            let right = node.right.as_ref().unwrap();
            assert_eq!(node.count, left.count + right.count);
            assert_invariant(left);
            assert_invariant(right);
        }
    }

    #[test]
    fn tree_round_trips_through_the_wire_format() {
        let mut table = FreqTable::new();
        for cp in "héllo wörld\n".chars() {
            table.record(cp as u32);
        }
        let root = build_tree(&table).unwrap();

        let mut writer = BitWriter::new(Vec::new());
        write_tree(&mut writer, Some(&root)).unwrap();
        let buf = writer.into_inner().unwrap();

        let mut reader = BitReader::new(&buf[..]);
        let restored = read_tree(&mut reader).unwrap().unwrap();
        assert_eq!(leaf_set(&root), leaf_set(&restored));
    }

    fn leaf_set(node: &Node) -> Vec<(u32, u64)> {
        let mut out = Vec::new();
        collect(node, &mut out);
        out.sort();
        out
    }

    fn collect(node: &Node, out: &mut Vec<(u32, u64)>) {
        if node.is_leaf() {
            out.push((node.code_point, node.count));
        } else {
            collect(node.left.as_ref().unwrap(), out);
            collect(node.right.as_ref().unwrap(), out);
        }
    }
}
