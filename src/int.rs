//! INTEGER, ENUMERATED, BOOLEAN, and NULL accessors.
//!
//! The content octets of an INTEGER are its two's complement value, big
//! endian, in the minimal number of octets: the first nine bits are never
//! all zero or all one. The accessors here move values as `i64`; content
//! that does not fit is rejected with a range error rather than truncated.
//! The remaining simple types ride along: BOOLEAN with its single content
//! octet and NULL with none at all.

use crate::error::{Error, ErrorKind};
use crate::tag::AsnType;
use crate::tree::{Node, Tree, FILLED};


/// # INTEGER access
///
impl Tree {
    /// Reads the value of an INTEGER or ENUMERATED node.
    pub fn read_int(&mut self, node: Node) -> Result<i64, Error> {
        let ix = self.begin(node)?;
        if !is_int(self.node_type(ix)) {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let content = match self.node_content(ix) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Mandatory)),
        };
        if content.len() > 8 {
            return Err(self.fail(ix, ErrorKind::Range))
        }
        let mut res: i64 = match content.first() {
            Some(&first) if first & 0x80 != 0 => -1,
            _ => 0,
        };
        for &octet in content {
            res = res << 8 | i64::from(octet);
        }
        Ok(res)
    }

    /// Writes the value of an INTEGER or ENUMERATED node.
    ///
    /// Encodes minimally and propagates the size change upward. Returns
    /// the new content length.
    pub fn write_int(&mut self, node: Node, value: i64) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        if !is_int(self.node_type(ix)) {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let content = encode_int(value);
        let len = content.len();
        self.install_content(ix, content);
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(len)
    }
}

/// # BOOLEAN and NULL access
///
impl Tree {
    /// Reads the value of a BOOLEAN node.
    ///
    /// Any non-zero content octet counts as true, as BER allows.
    pub fn read_bool(&mut self, node: Node) -> Result<bool, Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::Boolean {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let content = match self.node_content(ix) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Mandatory)),
        };
        match content {
            [octet] => Ok(*octet != 0),
            _ => Err(self.fail(ix, ErrorKind::Range)),
        }
    }

    /// Writes the value of a BOOLEAN node in its DER form.
    pub fn write_bool(&mut self, node: Node, value: bool) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::Boolean {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        self.install_content(ix, vec![if value { 0xff } else { 0x00 }]);
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(1)
    }

    /// Marks a NULL node as present.
    pub fn write_null(&mut self, node: Node) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        if self.node_type(ix) != AsnType::Null {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        self.install_content(ix, Vec::new());
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(0)
    }
}

fn is_int(typ: AsnType) -> bool {
    matches!(typ, AsnType::Integer | AsnType::Enumerated)
}

/// Returns the minimal two's complement encoding of a value.
fn encode_int(value: i64) -> Vec<u8> {
    let octets = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let lead = octets[start];
        let next = octets[start + 1];
        if (lead == 0x00 && next & 0x80 == 0)
            || (lead == 0xff && next & 0x80 != 0)
        {
            start += 1;
        }
        else {
            break
        }
    }
    octets[start..].to_vec()
}


//============ Tests =========================================================
