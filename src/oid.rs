//! OBJECT IDENTIFIER accessors and well-known identifiers.
//!
//! Object identifiers move through the accessors in their dotted decimal
//! text form. On the wire the first two arcs are packed into one value as
//! `40 * first + second`, and every value is encoded base 128 with the
//! high bit marking continuation octets.

use crate::error::{Error, ErrorKind};
use crate::tag::AsnType;
use crate::tree::{Node, Tree, FILLED};


//------------ Well-known identifiers ----------------------------------------

/// The X.509 subject key identifier extension.
pub const SUBJECT_KEY_IDENTIFIER: &str = "2.5.29.14";

/// The X.509 key usage extension.
pub const KEY_USAGE: &str = "2.5.29.15";

/// The X.509 basic constraints extension.
pub const BASIC_CONSTRAINTS: &str = "2.5.29.19";

/// The X.509 authority key identifier extension.
pub const AUTHORITY_KEY_IDENTIFIER: &str = "2.5.29.35";

/// The RFC 3779 IP address delegation extension.
pub const IP_ADDRESS_DELEGATION: &str = "1.3.6.1.5.5.7.1.7";

/// The RFC 3779 AS number delegation extension.
pub const AS_NUMBER_DELEGATION: &str = "1.3.6.1.5.5.7.1.8";

/// RSA with SHA-256 signatures.
pub const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";

/// An RSA public key.
pub const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";


/// # OBJECT IDENTIFIER access
///
impl Tree {
    /// Reads an OBJECT IDENTIFIER as dotted decimal text.
    pub fn read_oid(&mut self, node: Node) -> Result<String, Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::Oid {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let content = match self.node_content(ix) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Mandatory)),
        };
        match decode_oid(content) {
            Some(text) => Ok(text),
            None => Err(self.fail(ix, ErrorKind::Range)),
        }
    }

    /// Writes an OBJECT IDENTIFIER from dotted decimal text.
    ///
    /// Returns the new content length. Text that is not a well-formed
    /// object identifier is rejected with a range error before anything
    /// is touched.
    pub fn write_oid(&mut self, node: Node, text: &str) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::Oid {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let content = match encode_oid(text) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Range)),
        };
        let len = content.len();
        self.install_content(ix, content);
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(len)
    }

    /// Returns whether an OBJECT IDENTIFIER equals the given text form.
    pub fn oid_matches(
        &mut self, node: Node, text: &str
    ) -> Result<bool, Error> {
        Ok(self.read_oid(node)? == text)
    }
}

/// Encodes dotted decimal text into content octets.
fn encode_oid(text: &str) -> Option<Vec<u8>> {
    let mut arcs = text.split('.').map(|arc| {
        // Reject empty components and anything non-decimal.
        if arc.is_empty() {
            None
        }
        else {
            arc.parse::<u64>().ok()
        }
    });
    let first = arcs.next()??;
    let second = arcs.next()??;
    if first > 2 || (first < 2 && second >= 40) {
        return None
    }
    let mut out = Vec::new();
    push_base128(first.checked_mul(40)?.checked_add(second)?, &mut out);
    for arc in arcs {
        push_base128(arc?, &mut out);
    }
    Some(out)
}

/// Decodes content octets into dotted decimal text.
fn decode_oid(content: &[u8]) -> Option<String> {
    use std::fmt::Write;

    let mut values = Vec::new();
    let mut cur = 0u64;
    let mut mid = false;
    for &octet in content {
        // A value must not start with a padding octet.
        if !mid && octet == 0x80 {
            return None
        }
        cur = cur.checked_mul(128)? | u64::from(octet & 0x7f);
        if octet & 0x80 != 0 {
            mid = true;
        }
        else {
            values.push(cur);
            cur = 0;
            mid = false;
        }
    }
    if mid || values.is_empty() {
        return None
    }
    let combined = values[0];
    let (first, second) = if combined < 40 {
        (0, combined)
    }
    else if combined < 80 {
        (1, combined - 40)
    }
    else {
        (2, combined - 80)
    };
    let mut text = format!("{}.{}", first, second);
    for &value in &values[1..] {
        write!(&mut text, ".{}", value).ok()?;
    }
    Some(text)
}

fn push_base128(value: u64, out: &mut Vec<u8>) {
    let mut shift = 0;
    while value >> shift >= 0x80 {
        shift += 7;
    }
    while shift > 0 {
        out.push(0x80 | ((value >> shift) & 0x7f) as u8);
        shift -= 7;
    }
    out.push((value & 0x7f) as u8);
}


//============ Tests =========================================================
