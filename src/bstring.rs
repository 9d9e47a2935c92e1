//! BIT STRING accessors.
//!
//! A BIT STRING's content octets start with one octet giving the number of
//! unused low-order bits in the final content octet, followed by the data
//! octets. Two accessor families operate on such a node:
//!
//! * the single-bit accessors [`read_bit`][Tree::read_bit] and
//!   [`write_bit`][Tree::write_bit], which go through a bit-position
//!   pseudo-node created with [`add_bit`][Tree::add_bit] and address one
//!   bit inside the parent BIT STRING, and
//! * the bulk accessors [`read_bits`][Tree::read_bits],
//!   [`write_bits`][Tree::write_bits] and
//!   [`bits_vsize`][Tree::bits_vsize], which move the whole value as data
//!   octets plus the unused-bits count.
//!
//! A BIT STRING may be stored trimmed of trailing all-zero octets. Bits
//! beyond the stored tail therefore read as zero, and the bulk reader
//! reports only the octets up to and including the last non-zero one.

use bytes::Bytes;
use crate::error::{Error, ErrorKind};
use crate::tag::AsnType;
use crate::tree::{Node, Tree, ENUM, FILLED};


//------------ Bits ----------------------------------------------------------

/// The value of a BIT STRING.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bits {
    octets: Bytes,
    unused: u8,
}

impl Bits {
    /// Returns the data octets, trailing all-zero octets trimmed.
    pub fn octets(&self) -> &Bytes {
        &self.octets
    }

    /// Returns the number of data octets.
    pub fn octet_len(&self) -> usize {
        self.octets.len()
    }

    /// Returns the number of unused low-order bits in the last octet.
    ///
    /// Zero for a value with enumerated named bits.
    pub fn unused(&self) -> u8 {
        self.unused
    }
}


/// # BIT STRING access
///
impl Tree {
    /// Reads one bit of a BIT STRING through its pseudo-node.
    ///
    /// The node must be an untagged bit-position pseudo-node whose parent
    /// is a BIT STRING. A bit beyond the currently stored octets reads as
    /// zero without error.
    pub fn read_bit(&mut self, node: Node) -> Result<bool, Error> {
        let ix = self.begin(node)?;
        let up = match self.bit_parent(ix) {
            Some(up) => up,
            None => return Err(self.fail(ix, ErrorKind::Type)),
        };
        let bit = self.node_min(ix) as usize;
        let pos = 1 + (bit >> 3);
        let content = match self.node_content(up) {
            Some(content) => content,
            None => return Ok(false),
        };
        if pos >= content.len() {
            return Ok(false)
        }
        Ok(content[pos] & (0x80 >> (bit & 7)) != 0)
    }

    /// Writes one bit of a BIT STRING through its pseudo-node.
    ///
    /// Grows the parent's content as needed, zero-filling the octets in
    /// between, and propagates the size change upward. Returns the value
    /// written.
    pub fn write_bit(&mut self, node: Node, value: bool) -> Result<bool, Error> {
        let ix = self.begin(node)?;
        let up = match self.bit_parent(ix) {
            Some(up) => up,
            None => return Err(self.fail(ix, ErrorKind::Type)),
        };
        let bit = self.node_min(ix) as usize;
        let end = 2 + (bit >> 3);
        let content = self.node_content_mut(up).get_or_insert_with(Vec::new);
        if content.len() < end {
            content.resize(end, 0);
        }
        let mask = 0x80 >> (bit & 7);
        if value {
            content[end - 1] |= mask;
        }
        else {
            content[end - 1] &= !mask;
        }
        let parent = self.node_handle(up);
        if let Err(err) = self.fill_upward(parent, FILLED) {
            return Err(self.fail(up, err.kind()))
        }
        Ok(value)
    }

    /// Reads the whole value of a BIT STRING.
    ///
    /// Fails with a mandatory error if no content has been supplied yet.
    /// Trailing all-zero data octets are not part of the returned value.
    pub fn read_bits(&mut self, node: Node) -> Result<Bits, Error> {
        let (ix, start, end, unused) = self.bits_window(node)?;
        let content = self.node_content(ix).expect("checked by bits_window");
        Ok(Bits {
            octets: Bytes::copy_from_slice(&content[start..end]),
            unused,
        })
    }

    /// Returns the number of data octets [`read_bits`][Self::read_bits]
    /// would produce, without copying anything.
    pub fn bits_vsize(&mut self, node: Node) -> Result<usize, Error> {
        let (_, start, end, _) = self.bits_window(node)?;
        Ok(end - start)
    }

    /// Replaces the whole value of a BIT STRING.
    ///
    /// Stores the data octets after a leading octet carrying `unused`, the
    /// count of unused low-order bits in the final data octet. A count
    /// above seven is rejected before anything is touched. Returns the new
    /// content length including the leading octet.
    pub fn write_bits(
        &mut self, node: Node, octets: &[u8], unused: u8
    ) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::BitString {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        if unused > 7 {
            return Err(self.fail(ix, ErrorKind::Range))
        }
        let mut content = Vec::with_capacity(octets.len() + 1);
        content.push(unused);
        content.extend_from_slice(octets);
        let len = content.len();
        self.install_content(ix, content);
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(len)
    }

    /// Resolves a pseudo-node to its BIT STRING parent.
    fn bit_parent(&self, ix: usize) -> Option<usize> {
        if self.node_tag(ix).is_some()
            || self.node_type(ix) != AsnType::NoType
        {
            return None
        }
        let up = self.node_parent(ix)?;
        if self.node_type(up) != AsnType::BitString {
            return None
        }
        Some(up)
    }

    /// Checks a BIT STRING and locates its effective data octets.
    ///
    /// Returns the node index, the data range with trailing all-zero
    /// octets trimmed, and the unused-bits count to report.
    fn bits_window(
        &mut self, node: Node
    ) -> Result<(usize, usize, usize, u8), Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::BitString {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let enumerated = self.node_flags(ix) & ENUM != 0;
        let content = match self.node_content(ix) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Mandatory)),
        };
        let unused = if enumerated {
            0
        }
        else {
            content.first().copied().unwrap_or(0)
        };
        if unused > 7 {
            return Err(self.fail(ix, ErrorKind::Range))
        }
        let start = 1.min(content.len());
        let mut end = content.len();
        while end > start && content[end - 1] == 0 {
            end -= 1;
        }
        Ok((ix, start, end, unused))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn bit_string() -> (Tree, Node) {
        let mut tree = Tree::new(AsnType::Sequence);
        let bits = tree.add_child(tree.root(), AsnType::BitString).unwrap();
        (tree, bits)
    }

    #[test]
    fn single_bit_roundtrip() {
        let (mut tree, bits) = bit_string();
        let handles: Vec<_> = (0..24).map(|bit| {
            tree.add_bit(bits, bit).unwrap()
        }).collect();

        for &bit in &[0usize, 3, 7, 8, 15, 23] {
            assert!(tree.write_bit(handles[bit], true).unwrap());
        }
        for (bit, &handle) in handles.iter().enumerate() {
            let expected = matches!(bit, 0 | 3 | 7 | 8 | 15 | 23);
            assert_eq!(tree.read_bit(handle).unwrap(), expected, "bit {}", bit);
        }

        // Clearing works too.
        assert!(!tree.write_bit(handles[3], false).unwrap());
        assert!(!tree.read_bit(handles[3]).unwrap());
    }

    #[test]
    fn unwritten_bits_read_as_zero() {
        let (mut tree, bits) = bit_string();
        let far = tree.add_bit(bits, 200).unwrap();
        assert!(!tree.read_bit(far).unwrap());
        assert_eq!(tree.error(far), None);
    }

    #[test]
    fn trimmed_scenario() {
        // Binary 10110 with three trailing unused bits.
        let (mut tree, bits) = bit_string();
        tree.write_bits(bits, &[0xb0], 3).unwrap();
        assert_eq!(tree.content(bits), Some(&[0x03, 0xb0][..]));

        let expected = [true, false, true, true, false, false, false, false];
        for (bit, &value) in expected.iter().enumerate() {
            let handle = tree.add_bit(bits, bit as u32).unwrap();
            assert_eq!(tree.read_bit(handle).unwrap(), value, "bit {}", bit);
        }
        // Beyond the stored octets entirely.
        let beyond = tree.add_bit(bits, 9).unwrap();
        assert!(!tree.read_bit(beyond).unwrap());
    }

    #[test]
    fn growth_boundary() {
        let (mut tree, bits) = bit_string();
        let bit7 = tree.add_bit(bits, 7).unwrap();
        let bit8 = tree.add_bit(bits, 8).unwrap();

        tree.write_bit(bit7, true).unwrap();
        let len_before = tree.content(bits).unwrap().len();

        tree.write_bit(bit8, true).unwrap();
        let len_after = tree.content(bits).unwrap().len();

        // Exactly one more octet, and the earlier bit is untouched.
        assert_eq!(len_before, 2);
        assert_eq!(len_after, 3);
        assert!(tree.read_bit(bit7).unwrap());
        assert!(tree.read_bit(bit8).unwrap());
    }

    #[test]
    fn write_propagates_length() {
        let (mut tree, bits) = bit_string();
        let bit20 = tree.add_bit(bits, 20).unwrap();
        tree.write_bit(bit20, true).unwrap();

        // Content: count octet plus three data octets.
        assert_eq!(tree.content(bits).unwrap().len(), 4);
        assert_eq!(tree.encoded_content_len(tree.root()), 6);
        assert_eq!(
            tree.to_der().as_ref(),
            &[0x30, 0x06, 0x03, 0x04, 0x00, 0x00, 0x00, 0x08]
        );
    }

    #[test]
    fn bulk_roundtrip_all_shifts() {
        for unused in 0..=7u8 {
            let (mut tree, bits) = bit_string();
            let octets = [0xab, 0xcd, 0x12, 0x81];
            tree.write_bits(bits, &octets, unused).unwrap();

            let value = tree.read_bits(bits).unwrap();
            assert_eq!(value.octets().as_ref(), &octets, "unused {}", unused);
            assert_eq!(value.unused(), unused);
            assert_eq!(tree.bits_vsize(bits).unwrap(), octets.len());
        }
    }

    #[test]
    fn bulk_scenario() {
        let (mut tree, bits) = bit_string();
        assert_eq!(tree.write_bits(bits, &[0xab, 0xcd], 4).unwrap(), 3);
        let value = tree.read_bits(bits).unwrap();
        assert_eq!(value.octets().as_ref(), &[0xab, 0xcd]);
        assert_eq!(value.octet_len(), 2);
        assert_eq!(value.unused(), 4);
    }

    #[test]
    fn trailing_zero_octets_are_trimmed() {
        let (mut tree, bits) = bit_string();
        tree.write_bits(bits, &[0xff, 0x00, 0x00], 0).unwrap();
        let value = tree.read_bits(bits).unwrap();
        assert_eq!(value.octets().as_ref(), &[0xff]);
        assert_eq!(tree.bits_vsize(bits).unwrap(), 1);
    }

    #[test]
    fn empty_value_reads_empty() {
        let (mut tree, bits) = bit_string();
        tree.write_bits(bits, &[], 0).unwrap();
        assert_eq!(tree.content(bits), Some(&[0x00][..]));
        assert_eq!(tree.bits_vsize(bits).unwrap(), 0);
        assert!(tree.read_bits(bits).unwrap().octets().is_empty());
    }

    #[test]
    fn enumerated_reports_zero_shift() {
        let (mut tree, bits) = bit_string();
        tree.set_enumerated(bits).unwrap();
        let bit0 = tree.add_bit(bits, 0).unwrap();
        let bit10 = tree.add_bit(bits, 10).unwrap();
        tree.write_bit(bit0, true).unwrap();
        tree.write_bit(bit10, true).unwrap();

        let value = tree.read_bits(bits).unwrap();
        assert_eq!(value.unused(), 0);
        assert_eq!(value.octets().as_ref(), &[0x80, 0x20]);
    }

    #[test]
    fn errors_are_classified_and_recorded() {
        let (mut tree, bits) = bit_string();

        // Bulk accessors on a non BIT STRING.
        let int = tree.add_child(tree.root(), AsnType::Integer).unwrap();
        assert_eq!(
            tree.read_bits(int).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(tree.error(int), Some(ErrorKind::Type));

        // Missing mandatory content.
        assert_eq!(
            tree.read_bits(bits).unwrap_err().kind(),
            ErrorKind::Mandatory
        );

        // Unused-bits count out of range, rejected before any mutation.
        assert_eq!(
            tree.write_bits(bits, &[0x01], 8).unwrap_err().kind(),
            ErrorKind::Range
        );
        assert_eq!(tree.content(bits), None);

        // A pseudo-node under something that is not a BIT STRING cannot
        // exist, and a plain node is no pseudo-node.
        assert_eq!(
            tree.read_bit(bits).unwrap_err().kind(),
            ErrorKind::Type
        );

        // The next accessor call clears the recorded error again.
        tree.write_bits(bits, &[0x01], 0).unwrap();
        assert_eq!(tree.error(bits), None);
    }
}
