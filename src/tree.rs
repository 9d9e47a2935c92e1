//! Object trees: the node store, navigation, and length propagation.
//!
//! A [`Tree`] owns every node of one ASN.1 value in an index-based arena.
//! Nodes reference their parent and children by index, so parent
//! back-references never form ownership cycles and walking towards the root
//! is O(1) per step. A [`Node`] is a plain copyable handle into the arena.
//!
//! A tree comes into being either by [`Tree::decode`]-ing definite-length
//! BER/DER data or by building it up from a root via [`Tree::add_child`]
//! and friends. The typed accessors in the sibling modules mutate node
//! content in place; after every mutation the length-propagation engine
//! [`Tree::fill_upward`] restores the invariant that each ancestor's cached
//! encoded length matches the sum of its children's encoded sizes. Encoding
//! a tree back to wire form is then a single pass over the arena.

use std::convert::TryFrom;
use bytes::Bytes;
use crate::error::{DecodeError, Error, ErrorKind};
use crate::tag::{AsnType, Class, Tag};


//------------ Flags ---------------------------------------------------------

/// The node has been written to at least once.
pub const FILLED: u8 = 0x01;

/// The BIT STRING has enumerated named bits.
///
/// The bulk bit accessors report a shift of zero for such a value instead
/// of consulting the leading unused-bits octet.
pub const ENUM: u8 = 0x02;

/// Maximum nesting depth accepted when decoding.
const MAX_DEPTH: usize = 128;


//------------ Node ----------------------------------------------------------

/// A handle to a node of a [`Tree`].
///
/// Handles are plain indexes and only meaningful together with the tree
/// they came from. Using a handle on the wrong tree is safe but will
/// address an unrelated node or fail with a null-handle error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Node(usize);


//------------ NodeData ------------------------------------------------------

/// The stored state of one node.
#[derive(Clone, Debug)]
struct NodeData {
    /// The tag, or `None` for an untagged bit-position pseudo-node.
    tag: Option<Tag>,

    /// The semantic type the accessors check against.
    typ: AsnType,

    /// The raw content octets of a primitive value.
    ///
    /// `None` means the value has not been supplied. Constructed nodes
    /// never carry content; their octets live in their children.
    content: Option<Vec<u8>>,

    /// The bit index for a pseudo-node; type-specific metadata otherwise.
    min: u32,

    /// `FILLED` and `ENUM`.
    flags: u8,

    /// The index of the enclosing constructed node.
    parent: Option<usize>,

    /// Child indexes in encoding order.
    children: Vec<usize>,

    /// Cached number of content octets of a constructed node.
    cached_len: usize,

    /// The classification of the last failed operation on this node.
    error: Option<ErrorKind>,
}

impl NodeData {
    fn new(tag: Option<Tag>, typ: AsnType, parent: Option<usize>) -> Self {
        NodeData {
            tag, typ,
            content: None,
            min: 0,
            flags: 0,
            parent,
            children: Vec::new(),
            cached_len: 0,
            error: None,
        }
    }
}


//------------ Tree ----------------------------------------------------------

/// A tree of lazily encoded ASN.1 values.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

/// # Creation
///
impl Tree {
    /// Creates a tree holding a single empty value of the given type.
    ///
    /// The root receives the universal tag of `typ`. For a differently
    /// tagged root, build the value under a constructed root instead.
    pub fn new(typ: AsnType) -> Self {
        let tag = typ.universal_number().map(|number| {
            Tag::universal(number, typ.is_constructed())
        });
        Tree { nodes: vec![NodeData::new(tag, typ, None)] }
    }

    /// Appends a new empty child with the universal tag of its type.
    pub fn add_child(
        &mut self, parent: Node, typ: AsnType
    ) -> Result<Node, Error> {
        let tag = match typ.universal_number() {
            Some(number) => Tag::universal(number, typ.is_constructed()),
            None => {
                let ix = self.index(parent)?;
                return Err(self.fail(ix, ErrorKind::Type))
            }
        };
        self.add_child_tagged(parent, tag, typ)
    }

    /// Appends a new empty child with an explicitly given tag.
    ///
    /// This is the way to add implicitly tagged members: the tag carries
    /// the class and number actually used on the wire while `typ` names
    /// the underlying type the accessors should accept.
    pub fn add_child_tagged(
        &mut self, parent: Node, tag: Tag, typ: AsnType
    ) -> Result<Node, Error> {
        let ix = self.index(parent)?;
        let parent_constructed = match self.nodes[ix].tag {
            Some(tag) => tag.is_constructed(),
            None => false,
        };
        if !parent_constructed || self.nodes[ix].content.is_some() {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let child = self.nodes.len();
        self.nodes.push(NodeData::new(Some(tag), typ, Some(ix)));
        self.nodes[ix].children.push(child);
        Ok(Node(child))
    }

    /// Adds a bit-position pseudo-node to a BIT STRING.
    ///
    /// The returned handle addresses the single bit with the given
    /// zero-based index through [`read_bit`][Tree::read_bit] and
    /// [`write_bit`][Tree::write_bit]. The pseudo-node is untagged, never
    /// owns content, and does not take part in encoding.
    pub fn add_bit(
        &mut self, parent: Node, bit: u32
    ) -> Result<Node, Error> {
        let ix = self.index(parent)?;
        if self.nodes[ix].typ != AsnType::BitString {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let child = self.nodes.len();
        let mut data = NodeData::new(None, AsnType::NoType, Some(ix));
        data.min = bit;
        self.nodes.push(data);
        self.nodes[ix].children.push(child);
        Ok(Node(child))
    }

    /// Declares a BIT STRING as having enumerated named bits.
    pub fn set_enumerated(&mut self, node: Node) -> Result<(), Error> {
        let ix = self.begin(node)?;
        if self.nodes[ix].typ != AsnType::BitString {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        self.nodes[ix].flags |= ENUM;
        Ok(())
    }
}

/// # Navigation and node state
///
impl Tree {
    /// Returns the handle of the root node.
    pub fn root(&self) -> Node {
        Node(0)
    }

    /// Returns the parent of a node.
    ///
    /// Returns `None` at the root and for an invalid handle. Never
    /// mutates anything.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.nodes.get(node.0)?.parent.map(Node)
    }

    /// Returns an iterator over the children of a node in encoding order.
    pub fn children(
        &self, node: Node
    ) -> impl Iterator<Item = Node> + '_ {
        self.nodes.get(node.0)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
            .iter().copied().map(Node)
    }

    /// Returns the `idx`th child of a node.
    pub fn child(&self, node: Node, idx: usize) -> Option<Node> {
        self.nodes.get(node.0)?.children.get(idx).copied().map(Node)
    }

    /// Returns the number of children of a node.
    pub fn child_count(&self, node: Node) -> usize {
        self.nodes.get(node.0).map(|data| data.children.len()).unwrap_or(0)
    }

    /// Returns the semantic type of a node.
    pub fn asn_type(&self, node: Node) -> Option<AsnType> {
        self.nodes.get(node.0).map(|data| data.typ)
    }

    /// Returns the tag of a node.
    ///
    /// Returns `None` both for untagged pseudo-nodes and invalid handles.
    pub fn tag(&self, node: Node) -> Option<Tag> {
        self.nodes.get(node.0).and_then(|data| data.tag)
    }

    /// Returns the flags of a node.
    pub fn flags(&self, node: Node) -> u8 {
        self.nodes.get(node.0).map(|data| data.flags).unwrap_or(0)
    }

    /// Returns the content octets of a primitive node.
    pub fn content(&self, node: Node) -> Option<&[u8]> {
        self.nodes.get(node.0)?.content.as_deref()
    }

    /// Returns whether a node is present in the encoding.
    ///
    /// A node that was parsed from wire data or written to at least once
    /// is present; an instantiated but never supplied member is not.
    pub fn is_present(&self, node: Node) -> bool {
        self.nodes.get(node.0).map(|data| {
            data.flags & FILLED != 0 || data.content.is_some()
        }).unwrap_or(false)
    }

    /// Returns the error recorded by the last failed operation on a node.
    pub fn error(&self, node: Node) -> Option<ErrorKind> {
        self.nodes.get(node.0).and_then(|data| data.error)
    }

    /// Resets a node's recorded error.
    ///
    /// Every typed accessor does this first. The only way this can fail
    /// is a handle that addresses no node at all, which cannot be
    /// attributed to any node's error state.
    pub fn clear_error(&mut self, node: Node) -> Result<(), Error> {
        let ix = self.index(node)?;
        self.nodes[ix].error = None;
        Ok(())
    }
}

/// # Internal plumbing shared with the accessor modules
///
impl Tree {
    /// Validates a handle.
    fn index(&self, node: Node) -> Result<usize, Error> {
        if node.0 < self.nodes.len() {
            Ok(node.0)
        }
        else {
            Err(ErrorKind::NullHandle.into())
        }
    }

    /// Validates a handle and clears the node's recorded error.
    pub(crate) fn begin(&mut self, node: Node) -> Result<usize, Error> {
        let ix = self.index(node)?;
        self.nodes[ix].error = None;
        Ok(ix)
    }

    /// Records an error kind on a node and returns it as an error.
    pub(crate) fn fail(&mut self, ix: usize, kind: ErrorKind) -> Error {
        self.nodes[ix].error = Some(kind);
        kind.into()
    }

    pub(crate) fn node_type(&self, ix: usize) -> AsnType {
        self.nodes[ix].typ
    }

    pub(crate) fn node_tag(&self, ix: usize) -> Option<Tag> {
        self.nodes[ix].tag
    }

    pub(crate) fn node_parent(&self, ix: usize) -> Option<usize> {
        self.nodes[ix].parent
    }

    pub(crate) fn node_flags(&self, ix: usize) -> u8 {
        self.nodes[ix].flags
    }

    pub(crate) fn node_min(&self, ix: usize) -> u32 {
        self.nodes[ix].min
    }

    pub(crate) fn node_content(&self, ix: usize) -> Option<&[u8]> {
        self.nodes[ix].content.as_deref()
    }

    pub(crate) fn node_content_mut(
        &mut self, ix: usize
    ) -> &mut Option<Vec<u8>> {
        &mut self.nodes[ix].content
    }

    /// Installs fresh content on a node.
    ///
    /// The swap is atomic with respect to the accessor: the caller builds
    /// the complete new buffer first, so a failure before this point
    /// leaves the old content untouched.
    pub(crate) fn install_content(&mut self, ix: usize, content: Vec<u8>) {
        self.nodes[ix].content = Some(content);
    }

    pub(crate) fn node_handle(&self, ix: usize) -> Node {
        Node(ix)
    }

    fn present_ix(&self, ix: usize) -> bool {
        let data = &self.nodes[ix];
        data.flags & FILLED != 0 || data.content.is_some()
    }

    /// Returns the number of content octets a node currently encodes to.
    fn content_octets(&self, ix: usize) -> usize {
        let data = &self.nodes[ix];
        match data.content {
            Some(ref content) => content.len(),
            None => data.cached_len,
        }
    }
}

/// # Length propagation
///
impl Tree {
    /// Propagates a content size change to every ancestor of a node.
    ///
    /// Sets `mark` (normally [`FILLED`]) on the node and on each ancestor,
    /// and recomputes every ancestor's cached content length from the
    /// encoded sizes of its present children. Since growing a length can
    /// itself grow the ancestor's own length prefix, the walk is repeated
    /// until a full pass changes nothing. Calling this twice in a row
    /// without an intervening content change is a no-op the second time.
    ///
    /// Returns the number of ancestors whose cached length changed. Fails
    /// with a structural error if the ancestor chain is corrupt; the tree
    /// should not be trusted after that.
    pub fn fill_upward(&mut self, node: Node, mark: u8) -> Result<usize, Error> {
        let ix = self.index(node)?;
        self.nodes[ix].flags |= mark;
        let mut changed_total = 0;
        loop {
            let mut changed = false;
            let mut cur = ix;
            let mut steps = 0;
            while let Some(up) = self.nodes[cur].parent {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(ErrorKind::Structural.into())
                }
                let fresh = self.recompute_content_len(up)?;
                let data = &mut self.nodes[up];
                if data.cached_len != fresh {
                    data.cached_len = fresh;
                    changed = true;
                    changed_total += 1;
                }
                data.flags |= mark;
                cur = up;
            }
            if !changed {
                break
            }
        }
        Ok(changed_total)
    }

    /// Recomputes the number of content octets of a node.
    ///
    /// For a content-bearing node this is the buffer length; anything
    /// hanging off such a node other than bit pseudo-nodes means the tree
    /// is corrupt. For a constructed node it is the sum of the encoded
    /// sizes of the present children.
    fn recompute_content_len(&self, ix: usize) -> Result<usize, Error> {
        let data = &self.nodes[ix];
        if let Some(ref content) = data.content {
            for &child in &data.children {
                match self.nodes.get(child) {
                    Some(child_data)
                        if child_data.typ == AsnType::NoType => { }
                    _ => return Err(ErrorKind::Structural.into()),
                }
            }
            return Ok(content.len())
        }
        let mut sum = 0;
        for &child in &data.children {
            let child_data = match self.nodes.get(child) {
                Some(child_data) => child_data,
                None => return Err(ErrorKind::Structural.into()),
            };
            if child_data.typ == AsnType::NoType {
                continue
            }
            if !self.present_ix(child) {
                continue
            }
            let tag = match child_data.tag {
                Some(tag) => tag,
                None => return Err(ErrorKind::Structural.into()),
            };
            let content_len = self.content_octets(child);
            sum += tag.encoded_len()
                + length_len(content_len)
                + content_len;
        }
        Ok(sum)
    }
}

/// # Encoding and decoding
///
impl Tree {
    /// Parses definite-length BER/DER data into a tree.
    ///
    /// The data must hold exactly one value. Indefinite lengths and
    /// non-minimal length encodings are rejected: the persisted form this
    /// library round-trips is the minimal-length definite form, and
    /// anything else could not be re-encoded identically.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut tree = Tree { nodes: Vec::new() };
        let end = tree.parse_value(data, 0, None, 0)?;
        if end != data.len() {
            return Err(DecodeError::new(end, "trailing data"))
        }
        Ok(tree)
    }

    fn parse_value(
        &mut self,
        data: &[u8],
        pos: usize,
        parent: Option<usize>,
        depth: usize,
    ) -> Result<usize, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::new(pos, "nesting too deep"))
        }
        let (tag, tag_len) = Tag::parse(&data[pos..], pos)?;
        let (content_len, len_len) = parse_length(
            &data[pos + tag_len..], pos + tag_len
        )?;
        let start = pos + tag_len + len_len;
        let end = match start.checked_add(content_len) {
            Some(end) if end <= data.len() => end,
            _ => {
                return Err(DecodeError::new(
                    pos + tag_len, "length past end of data"
                ))
            }
        };

        let typ = match tag.class() {
            Class::Universal => {
                match AsnType::from_universal(tag.number()) {
                    Some(typ) => {
                        if typ.is_constructed() != tag.is_constructed() {
                            return Err(DecodeError::new(
                                pos, "invalid primitive or constructed form"
                            ))
                        }
                        typ
                    }
                    None => AsnType::Opaque,
                }
            }
            _ => AsnType::Opaque,
        };

        let ix = self.nodes.len();
        let mut node = NodeData::new(Some(tag), typ, parent);
        node.flags = FILLED;
        node.cached_len = content_len;
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.nodes[parent].children.push(ix);
        }

        if tag.is_constructed() {
            let mut cur = start;
            while cur < end {
                cur = self.parse_value(data, cur, Some(ix), depth + 1)?;
            }
            if cur != end {
                return Err(DecodeError::new(
                    cur, "child value overruns its parent"
                ))
            }
        }
        else {
            self.nodes[ix].content = Some(data[start..end].to_vec());
        }
        Ok(end)
    }

    /// Returns the number of content octets a node encodes to.
    ///
    /// For constructed nodes this is the cached length maintained by
    /// [`fill_upward`][Self::fill_upward].
    pub fn encoded_content_len(&self, node: Node) -> usize {
        match self.nodes.get(node.0) {
            Some(_) => self.content_octets(node.0),
            None => 0,
        }
    }

    /// Returns the full encoded size of a node including tag and length.
    ///
    /// An absent node and a pseudo-node take up no octets at all.
    pub fn encoded_size(&self, node: Node) -> usize {
        let data = match self.nodes.get(node.0) {
            Some(data) => data,
            None => return 0,
        };
        if data.typ == AsnType::NoType || !self.present_ix(node.0) {
            return 0
        }
        let tag = match data.tag {
            Some(tag) => tag,
            None => return 0,
        };
        let content_len = self.content_octets(node.0);
        tag.encoded_len() + length_len(content_len) + content_len
    }

    /// Encodes the subtree rooted at a node.
    pub fn encode(&self, node: Node) -> Result<Bytes, Error> {
        let ix = self.index(node)?;
        let mut out = Vec::with_capacity(self.encoded_size(node));
        self.write_value(ix, &mut out);
        Ok(out.into())
    }

    /// Encodes the whole tree.
    pub fn to_der(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.encoded_size(self.root()));
        self.write_value(0, &mut out);
        out.into()
    }

    fn write_value(&self, ix: usize, out: &mut Vec<u8>) {
        let data = &self.nodes[ix];
        if data.typ == AsnType::NoType || !self.present_ix(ix) {
            return
        }
        let tag = match data.tag {
            Some(tag) => tag,
            None => return,
        };
        tag.write(out);
        write_length(self.content_octets(ix), out);
        match data.content {
            Some(ref content) => out.extend_from_slice(content),
            None => {
                for &child in &data.children {
                    self.write_value(child, out);
                }
            }
        }
    }
}


//------------ Length octets -------------------------------------------------

/// Returns the number of length octets needed for a content length.
///
/// One octet up to 127, otherwise a length-of-length octet followed by the
/// minimal big-endian encoding of the length.
pub(crate) fn length_len(len: usize) -> usize {
    if len < 0x80 {
        1
    }
    else {
        let mut octets = 1;
        let mut len = len >> 8;
        while len > 0 {
            octets += 1;
            len >>= 8;
        }
        octets + 1
    }
}

/// Appends the minimal-length encoding of a content length.
pub(crate) fn write_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return
    }
    let octets = length_len(len) - 1;
    out.push(0x80 | octets as u8);
    for i in (0..octets).rev() {
        out.push((len >> (i * 8)) as u8);
    }
}

/// Parses length octets, returning the content length and octets consumed.
fn parse_length(data: &[u8], pos: usize) -> Result<(usize, usize), DecodeError> {
    let first = match data.first() {
        Some(first) => *first,
        None => return Err(DecodeError::new(pos, "missing length octets")),
    };
    if first < 0x80 {
        return Ok((usize::from(first), 1))
    }
    if first == 0x80 {
        return Err(DecodeError::new(pos, "indefinite length"))
    }
    let count = usize::from(first & 0x7f);
    if count > 8 {
        return Err(DecodeError::new(pos, "length too large"))
    }
    let mut len = 0u64;
    for i in 0..count {
        let octet = match data.get(1 + i) {
            Some(octet) => *octet,
            None => {
                return Err(DecodeError::new(pos, "truncated length octets"))
            }
        };
        len = len << 8 | u64::from(octet);
    }
    if data[1] == 0 || (count == 1 && len < 0x80) {
        return Err(DecodeError::new(pos, "non-minimal length"))
    }
    let len = match usize::try_from(len) {
        Ok(len) => len,
        Err(_) => return Err(DecodeError::new(pos, "length too large")),
    };
    Ok((len, 1 + count))
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn length_octet_counts() {
        for (len, expected) in [
            (0, 1), (127, 1), (128, 2), (255, 2),
            (256, 3), (65535, 3), (65536, 4),
        ] {
            assert_eq!(length_len(len), expected, "length {}", len);
            let mut out = Vec::new();
            write_length(len, &mut out);
            assert_eq!(out.len(), expected, "length {}", len);
            assert_eq!(parse_length(&out, 0).unwrap(), (len, expected));
        }
    }

    #[test]
    fn length_rejects() {
        // Indefinite form.
        assert!(parse_length(&[0x80], 0).is_err());
        // Non-minimal: two octets for a value below 128.
        assert!(parse_length(&[0x81, 0x05], 0).is_err());
        // Non-minimal: leading zero octet.
        assert!(parse_length(&[0x82, 0x00, 0xff], 0).is_err());
        // Truncated.
        assert!(parse_length(&[0x82, 0x01], 0).is_err());
        assert!(parse_length(&[], 0).is_err());
    }

    #[test]
    fn decode_encode_roundtrip() {
        // SEQUENCE { INTEGER 5, SEQUENCE { OCTET STRING "ab" }, BOOLEAN }
        let data: &[u8] = &[
            0x30, 0x0c,
                0x02, 0x01, 0x05,
                0x30, 0x04,
                    0x04, 0x02, 0x61, 0x62,
                0x01, 0x01, 0xff,
        ];
        let tree = Tree::decode(data).unwrap();
        assert_eq!(tree.to_der().as_ref(), data);

        let root = tree.root();
        assert_eq!(tree.asn_type(root), Some(AsnType::Sequence));
        assert_eq!(tree.child_count(root), 3);
        let int = tree.child(root, 0).unwrap();
        assert_eq!(tree.asn_type(int), Some(AsnType::Integer));
        assert_eq!(tree.content(int), Some(&[0x05][..]));
        let inner = tree.child(root, 1).unwrap();
        assert_eq!(tree.parent(tree.child(inner, 0).unwrap()), Some(inner));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn decode_rejects() {
        // Trailing data after the outermost value.
        assert!(Tree::decode(&[0x02, 0x01, 0x00, 0x00]).is_err());
        // Content length past the end of the data.
        assert!(Tree::decode(&[0x04, 0x05, 0x01]).is_err());
        // Indefinite length.
        assert!(Tree::decode(&[0x30, 0x80, 0x00, 0x00]).is_err());
        // A primitive SEQUENCE is not a thing.
        assert!(Tree::decode(&[0x10, 0x00]).is_err());
        // Child value sticking out of its parent.
        assert!(Tree::decode(&[0x30, 0x03, 0x04, 0x03, 0x61]).is_err());
    }

    #[test]
    fn fill_upward_updates_ancestors() {
        let mut tree = Tree::new(AsnType::Sequence);
        let inner = tree.add_child(tree.root(), AsnType::Sequence).unwrap();
        let leaf = tree.add_child(inner, AsnType::OctetString).unwrap();

        let leaf_ix = tree.index(leaf).unwrap();
        tree.install_content(leaf_ix, vec![0u8; 5]);
        tree.fill_upward(leaf, FILLED).unwrap();

        // inner: 04 05 <5> = 7 octets; root content: 30 07 <7> = 9 octets.
        assert_eq!(tree.encoded_content_len(inner), 7);
        assert_eq!(tree.encoded_content_len(tree.root()), 9);
        assert_eq!(tree.encoded_size(tree.root()), 11);
    }

    #[test]
    fn fill_upward_is_idempotent() {
        let mut tree = Tree::new(AsnType::Sequence);
        let inner = tree.add_child(tree.root(), AsnType::Sequence).unwrap();
        let leaf = tree.add_child(inner, AsnType::OctetString).unwrap();
        let leaf_ix = tree.index(leaf).unwrap();
        tree.install_content(leaf_ix, vec![1, 2, 3]);

        assert!(tree.fill_upward(leaf, FILLED).unwrap() > 0);
        assert_eq!(tree.fill_upward(leaf, FILLED).unwrap(), 0);
        assert_eq!(tree.encoded_content_len(inner), 5);
    }

    #[test]
    fn fill_upward_grows_length_prefixes() {
        let mut tree = Tree::new(AsnType::Sequence);
        let inner = tree.add_child(tree.root(), AsnType::Sequence).unwrap();
        let leaf = tree.add_child(inner, AsnType::OctetString).unwrap();
        let leaf_ix = tree.index(leaf).unwrap();

        // 120 content octets: everything stays in the short length form.
        tree.install_content(leaf_ix, vec![0u8; 120]);
        tree.fill_upward(leaf, FILLED).unwrap();
        assert_eq!(tree.encoded_content_len(inner), 122);
        assert_eq!(tree.encoded_content_len(tree.root()), 124);

        // 130 content octets: the leaf needs a long length, which pushes
        // the inner sequence over 127 as well, which in turn changes the
        // size the root sees. One call settles the whole chain.
        tree.install_content(leaf_ix, vec![0u8; 130]);
        tree.fill_upward(leaf, FILLED).unwrap();
        assert_eq!(tree.encoded_content_len(inner), 133);
        assert_eq!(tree.encoded_content_len(tree.root()), 136);

        let encoded = tree.to_der();
        assert_eq!(encoded.len(), tree.encoded_size(tree.root()));
        let reparsed = Tree::decode(encoded.as_ref()).unwrap();
        assert_eq!(reparsed.to_der(), encoded);
    }

    #[test]
    fn absent_members_are_skipped() {
        let mut tree = Tree::new(AsnType::Sequence);
        let first = tree.add_child(tree.root(), AsnType::Integer).unwrap();
        let second = tree.add_child(tree.root(), AsnType::Integer).unwrap();

        let first_ix = tree.index(first).unwrap();
        tree.install_content(first_ix, vec![0x2a]);
        tree.fill_upward(first, FILLED).unwrap();

        assert!(tree.is_present(first));
        assert!(!tree.is_present(second));
        assert_eq!(tree.to_der().as_ref(), &[0x30, 0x03, 0x02, 0x01, 0x2a]);
    }

    #[test]
    fn error_state_per_node() {
        let mut tree = Tree::new(AsnType::Sequence);
        let child = tree.add_child(tree.root(), AsnType::Integer).unwrap();

        // Adding a child to a primitive node is a type error, recorded on
        // the would-be parent.
        assert_eq!(
            tree.add_child(child, AsnType::Integer).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(tree.error(child), Some(ErrorKind::Type));
        tree.clear_error(child).unwrap();
        assert_eq!(tree.error(child), None);

        // A handle past the arena is a null-handle error.
        let bogus = Node(999);
        assert_eq!(
            tree.clear_error(bogus).unwrap_err().kind(),
            ErrorKind::NullHandle
        );
    }
}
