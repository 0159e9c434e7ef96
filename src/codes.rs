// Code generator: tree traversal producing code-point -> bit-string.

use std::collections::HashMap;

use bit_vec::BitVec;

use crate::charset::MAX_CODE_BITS;
use crate::error::{Error, Result};
use crate::tree::Node;

/// A Huffman code: an ordered bit-string, most-significant generated bit
/// first (i.e. the bit chosen at the root comes first). Backed by a
/// `BitVec` rather than a fixed-width integer register, since a code's
/// length is bounded only by tree height, not by any machine word size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Code {
    pub bits: BitVec,
}

impl Code {
    pub fn len(&self) -> u8 {
        self.bits.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

pub type CodeTable = HashMap<u32, Code>;

/// Builds the code table for a tree. Handles the single-leaf degenerate
/// case: a lone symbol gets an arbitrary 1-bit code instead of the classical
/// zero-length code, which would otherwise make decoding unable to make
/// progress.
pub fn generate_codes(root: &Node) -> Result<CodeTable> {
    let mut table = CodeTable::new();

    if root.is_leaf() {
        let mut bits = BitVec::new();
        bits.push(false);
        table.insert(root.code_point, Code { bits });
        return Ok(table);
    }

    let mut bits = BitVec::new();
    walk(root, &mut bits, &mut table)?;
    Ok(table)
}

fn walk(node: &Node, bits: &mut BitVec, table: &mut CodeTable) -> Result<()> {
    if node.is_leaf() {
        table.insert(node.code_point, Code { bits: bits.clone() });
        return Ok(());
    }
    if bits.len() == MAX_CODE_BITS as usize {
        // Descending further would overflow the bit-length budget even
        // before reaching a leaf.
        return Err(Error::CodeTooLong { code_point: node.code_point, max: MAX_CODE_BITS });
    }
    if let Some(left) = node.left.as_deref() {
        bits.push(false);
        walk(left, bits, table)?;
        bits.pop();
    }
    if let Some(right) = node.right.as_deref() {
        bits.push(true);
        walk(right, bits, table)?;
        bits.pop();
    }
    Ok(())
}
