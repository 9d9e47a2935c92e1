//! OCTET STRING and character string accessors.
//!
//! These accessors serve the whole octet string family: OCTET STRING
//! itself plus the restricted character string types whose content is a
//! plain octet sequence on the wire. [`read_text`][Tree::read_text]
//! additionally insists on the content being valid UTF-8, which covers
//! every restricted type this library knows.

use std::str;
use bytes::Bytes;
use crate::error::{Error, ErrorKind};
use crate::tree::{Node, Tree, FILLED};


/// # Octet string access
///
impl Tree {
    /// Reads the content of an octet string family node.
    pub fn read_octets(&mut self, node: Node) -> Result<Bytes, Error> {
        let ix = self.string_node(node)?;
        match self.node_content(ix) {
            Some(content) => Ok(Bytes::copy_from_slice(content)),
            None => Err(self.fail(ix, ErrorKind::Mandatory)),
        }
    }

    /// Returns the content length of an octet string family node.
    pub fn octets_vsize(&mut self, node: Node) -> Result<usize, Error> {
        let ix = self.string_node(node)?;
        match self.node_content(ix) {
            Some(content) => Ok(content.len()),
            None => Err(self.fail(ix, ErrorKind::Mandatory)),
        }
    }

    /// Reads the content of a character string node as text.
    pub fn read_text(&mut self, node: Node) -> Result<String, Error> {
        let ix = self.string_node(node)?;
        let content = match self.node_content(ix) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Mandatory)),
        };
        match str::from_utf8(content) {
            Ok(text) => Ok(text.into()),
            Err(_) => Err(self.fail(ix, ErrorKind::Range)),
        }
    }

    /// Replaces the content of an octet string family node.
    ///
    /// Returns the new content length.
    pub fn write_octets(
        &mut self, node: Node, octets: &[u8]
    ) -> Result<usize, Error> {
        let ix = self.string_node(node)?;
        self.install_content(ix, octets.to_vec());
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(octets.len())
    }

    /// Replaces the content of a character string node with text.
    pub fn write_text(
        &mut self, node: Node, text: &str
    ) -> Result<usize, Error> {
        self.write_octets(node, text.as_bytes())
    }

    fn string_node(&mut self, node: Node) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        if !self.node_type(ix).is_string() {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        Ok(ix)
    }
}


//============ Tests =========================================================
