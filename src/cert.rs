//! Certificates as object trees.
//!
//! [`Certificate`] wraps a decoded tree and resolves the standard X.509
//! skeleton by position: the to-be-signed portion, the signature algorithm,
//! the signature BIT STRING, and inside the to-be-signed portion the
//! serial number, validity, subject public key info, and the `[3]` tagged
//! extension list. Everything is plain node handles into the underlying
//! tree, so all edits go through the typed accessors and keep the encoded
//! form consistent.
//!
//! This module stops at the structural boundary. It can locate, create,
//! and rewrite fields and extensions, and with the `crypto` feature check
//! signatures; it does not implement certification path or resource
//! validation policy.

use chrono::{DateTime, Utc};
use crate::bstring::Bits;
use crate::error::{DecodeError, Error, ErrorKind};
use crate::tag::{AsnType, Tag};
use crate::tree::{Node, Tree};

#[cfg(feature = "crypto")] use std::{error, fmt};
#[cfg(feature = "crypto")] use bytes::Bytes;
#[cfg(feature = "crypto")] use ring::{digest, signature};
#[cfg(feature = "crypto")] use ring::signature::VerificationAlgorithm;
#[cfg(feature = "crypto")] use untrusted::Input;


//------------ Certificate ---------------------------------------------------

/// An X.509 certificate held as an editable object tree.
#[derive(Clone, Debug)]
pub struct Certificate {
    tree: Tree,
    tbs: Node,
    signature_algorithm: Node,
    signature: Node,
    serial: Node,
    validity: Node,
    spki: Node,
    extensions: Option<Node>,
}

impl Certificate {
    /// Decodes a certificate from its DER form.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let tree = Tree::decode(data)?;
        Self::from_tree(tree)
    }

    /// Resolves the certificate skeleton inside a decoded tree.
    pub fn from_tree(tree: Tree) -> Result<Self, DecodeError> {
        fn bad(reason: &'static str) -> DecodeError {
            DecodeError::new(0, reason)
        }

        let root = tree.root();
        if tree.asn_type(root) != Some(AsnType::Sequence) {
            return Err(bad("certificate is not a sequence"))
        }
        let tbs = tree.child(root, 0)
            .ok_or_else(|| bad("missing tbsCertificate"))?;
        let signature_algorithm = tree.child(root, 1)
            .ok_or_else(|| bad("missing signatureAlgorithm"))?;
        let signature = tree.child(root, 2)
            .ok_or_else(|| bad("missing signature"))?;
        if tree.asn_type(tbs) != Some(AsnType::Sequence)
            || tree.asn_type(signature_algorithm) != Some(AsnType::Sequence)
            || tree.asn_type(signature) != Some(AsnType::BitString)
        {
            return Err(bad("malformed certificate sequence"))
        }

        // The tbsCertificate members are positional except for the leading
        // [0] version.
        let version_tag = Tag::context(0, true);
        let offset = match tree.child(tbs, 0) {
            Some(first) if tree.tag(first) == Some(version_tag) => 1,
            Some(_) => 0,
            None => return Err(bad("empty tbsCertificate")),
        };
        let serial = tree.child(tbs, offset)
            .ok_or_else(|| bad("missing serialNumber"))?;
        let validity = tree.child(tbs, offset + 3)
            .ok_or_else(|| bad("missing validity"))?;
        let spki = tree.child(tbs, offset + 5)
            .ok_or_else(|| bad("missing subjectPublicKeyInfo"))?;

        let extensions_tag = Tag::context(3, true);
        let mut extensions = None;
        for child in tree.children(tbs) {
            if tree.tag(child) == Some(extensions_tag) {
                extensions = Some(
                    tree.child(child, 0)
                        .ok_or_else(|| bad("empty extensions wrapper"))?
                );
                break
            }
        }

        Ok(Certificate {
            tree, tbs, signature_algorithm, signature,
            serial, validity, spki, extensions,
        })
    }

    /// Returns a reference to the underlying tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns a mutable reference to the underlying tree.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Returns the handle of the to-be-signed portion.
    pub fn tbs(&self) -> Node {
        self.tbs
    }

    /// Returns the handle of the signature BIT STRING.
    pub fn signature(&self) -> Node {
        self.signature
    }

    /// Returns the handle of the subjectPublicKeyInfo sequence.
    pub fn subject_public_key_info(&self) -> Node {
        self.spki
    }

    /// Encodes the certificate back to DER.
    pub fn to_der(&self) -> bytes::Bytes {
        self.tree.to_der()
    }
}

/// # Field access
///
impl Certificate {
    /// Reads the serial number.
    pub fn serial_number(&mut self) -> Result<i64, Error> {
        let serial = self.serial;
        self.tree.read_int(serial)
    }

    /// Reads the validity as not-before and not-after times.
    pub fn validity(
        &mut self
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), Error> {
        let not_before = member(&self.tree, self.validity, 0)?;
        let not_after = member(&self.tree, self.validity, 1)?;
        Ok((
            self.tree.read_time(not_before)?,
            self.tree.read_time(not_after)?,
        ))
    }

    /// Reads the signature value.
    pub fn signature_bits(&mut self) -> Result<Bits, Error> {
        let signature = self.signature;
        self.tree.read_bits(signature)
    }

    /// Replaces the signature value.
    pub fn set_signature_bits(
        &mut self, octets: &[u8], unused: u8
    ) -> Result<usize, Error> {
        let signature = self.signature;
        self.tree.write_bits(signature, octets, unused)
    }

    /// Reads the raw subjectPublicKey bits.
    pub fn subject_public_key_bits(&mut self) -> Result<Bits, Error> {
        let bits = member(&self.tree, self.spki, 1)?;
        self.tree.read_bits(bits)
    }
}

/// # Extension handling
///
impl Certificate {
    /// Returns the extension list if the certificate has one.
    pub fn extensions(&self) -> Option<Node> {
        self.extensions
    }

    /// Finds an extension by its object identifier.
    ///
    /// Returns the extension sequence whose first member matches `oid`.
    /// With `create`, a missing extension is appended as a fresh sequence
    /// of the identifier and an empty value, creating the `[3]` tagged
    /// extension list on the way if the certificate lacks one.
    pub fn find_extension(
        &mut self, oid: &str, create: bool
    ) -> Result<Option<Node>, Error> {
        let list = match self.extensions {
            Some(list) => list,
            None => {
                if !create {
                    return Ok(None)
                }
                let wrapper = self.tree.add_child_tagged(
                    self.tbs, Tag::context(3, true), AsnType::Opaque
                )?;
                let list = self.tree.add_child(wrapper, AsnType::Sequence)?;
                self.extensions = Some(list);
                list
            }
        };

        let entries: Vec<Node> = self.tree.children(list).collect();
        for ext in entries {
            let id = match self.tree.child(ext, 0) {
                Some(id) if self.tree.asn_type(id) == Some(AsnType::Oid) => id,
                _ => continue,
            };
            if self.tree.oid_matches(id, oid)? {
                return Ok(Some(ext))
            }
        }
        if !create {
            return Ok(None)
        }

        let ext = self.tree.add_child(list, AsnType::Sequence)?;
        let id = self.tree.add_child(ext, AsnType::Oid)?;
        let value = self.tree.add_child(ext, AsnType::OctetString)?;
        self.tree.write_oid(id, oid)?;
        self.tree.write_octets(value, &[])?;
        Ok(Some(ext))
    }

    /// Returns the extension for `oid` with an empty value.
    ///
    /// An existing extension is cleared; a missing one is created.
    pub fn make_extension(&mut self, oid: &str) -> Result<Node, Error> {
        let ext = match self.find_extension(oid, true)? {
            Some(ext) => ext,
            // `create` means find_extension only comes back empty if the
            // tree is broken underneath us.
            None => return Err(ErrorKind::Structural.into()),
        };
        let value = self.extension_value(ext)?;
        self.tree.write_octets(value, &[])?;
        Ok(ext)
    }

    /// Returns the object identifier of an extension.
    pub fn extension_oid(&mut self, ext: Node) -> Result<String, Error> {
        let id = member(&self.tree, ext, 0)?;
        self.tree.read_oid(id)
    }

    /// Returns whether an extension is marked critical.
    pub fn extension_critical(&mut self, ext: Node) -> Result<bool, Error> {
        let second = member(&self.tree, ext, 1)?;
        if self.tree.asn_type(second) != Some(AsnType::Boolean) {
            // Absent means the default, which is not critical.
            return Ok(false)
        }
        self.tree.read_bool(second)
    }

    /// Returns the value node of an extension.
    ///
    /// The value is the final member, an OCTET STRING wrapping the
    /// extension's own DER.
    pub fn extension_value(&mut self, ext: Node) -> Result<Node, Error> {
        let count = self.tree.child_count(ext);
        if count == 0 {
            return Err(ErrorKind::Structural.into())
        }
        let value = member(&self.tree, ext, count - 1)?;
        if self.tree.asn_type(value) != Some(AsnType::OctetString) {
            return Err(ErrorKind::Structural.into())
        }
        Ok(value)
    }
}

/// # Signatures
///
#[cfg(feature = "crypto")]
impl Certificate {
    /// Verifies a message signed by this certificate's key.
    ///
    /// The key must be an RSA key and the signature RSA PKCS#1 v1.5 with
    /// SHA-256, the profile used throughout the toolchain.
    pub fn check_signature(
        &mut self, message: &[u8], signature: &Bits
    ) -> Result<(), VerificationError> {
        let key = self.subject_public_key_bits()
            .map_err(|_| VerificationError)?;
        signature::RSA_PKCS1_2048_8192_SHA256.verify(
            Input::from(key.octets().as_ref()),
            Input::from(message),
            Input::from(signature.octets().as_ref()),
        ).map_err(|_| VerificationError)
    }

    /// Verifies that this certificate was signed by the issuer's key.
    pub fn check_issued_by(
        &mut self, issuer: &mut Certificate
    ) -> Result<(), VerificationError> {
        let message = self.tree.encode(self.tbs)
            .map_err(|_| VerificationError)?;
        let signature = self.signature_bits()
            .map_err(|_| VerificationError)?;
        issuer.check_signature(message.as_ref(), &signature)
    }

    /// Returns the SHA-256 digest of the subjectPublicKey bits.
    pub fn subject_key_digest(&mut self) -> Result<Bytes, Error> {
        let key = self.subject_public_key_bits()?;
        Ok(Bytes::copy_from_slice(
            digest::digest(&digest::SHA256, key.octets().as_ref()).as_ref()
        ))
    }

    /// Writes the digest of this certificate's key into a node.
    ///
    /// This is the building block for key identifier extensions: the
    /// digest of the subjectPublicKey bits becomes the content of the
    /// given octet string node.
    pub fn write_hashed_public_key(
        &mut self, node: Node
    ) -> Result<usize, Error> {
        let hash = self.subject_key_digest()?;
        self.tree.write_octets(node, hash.as_ref())
    }
}

/// Returns a child by position or a structural error.
fn member(tree: &Tree, node: Node, idx: usize) -> Result<Node, Error> {
    tree.child(node, idx).ok_or_else(|| ErrorKind::Structural.into())
}


//------------ VerificationError ---------------------------------------------

/// A signature did not verify.
#[cfg(feature = "crypto")]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerificationError;

#[cfg(feature = "crypto")]
impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("signature verification failed")
    }
}

#[cfg(feature = "crypto")]
impl error::Error for VerificationError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Datelike, TimeZone};
    use crate::oid;

    /// Adds a name with a single common name attribute.
    fn add_name(tree: &mut Tree, tbs: Node, name: &str) {
        let rdns = tree.add_child(tbs, AsnType::Sequence).unwrap();
        let rdn = tree.add_child(rdns, AsnType::Set).unwrap();
        let attr = tree.add_child(rdn, AsnType::Sequence).unwrap();
        let attr_oid = tree.add_child(attr, AsnType::Oid).unwrap();
        tree.write_oid(attr_oid, "2.5.4.3").unwrap();
        let attr_value = tree.add_child(
            attr, AsnType::PrintableString
        ).unwrap();
        tree.write_text(attr_value, name).unwrap();
    }

    /// Builds a structurally complete certificate.
    fn build_cert() -> Certificate {
        let mut tree = Tree::new(AsnType::Sequence);
        let root = tree.root();
        let tbs = tree.add_child(root, AsnType::Sequence).unwrap();

        let version = tree.add_child_tagged(
            tbs, Tag::context(0, true), AsnType::Opaque
        ).unwrap();
        let version_int = tree.add_child(version, AsnType::Integer).unwrap();
        tree.write_int(version_int, 2).unwrap();

        let serial = tree.add_child(tbs, AsnType::Integer).unwrap();
        tree.write_int(serial, 0x0123).unwrap();

        let alg = tree.add_child(tbs, AsnType::Sequence).unwrap();
        let alg_oid = tree.add_child(alg, AsnType::Oid).unwrap();
        tree.write_oid(alg_oid, oid::SHA256_WITH_RSA).unwrap();
        let param = tree.add_child(alg, AsnType::Null).unwrap();
        tree.write_null(param).unwrap();

        add_name(&mut tree, tbs, "Test CA");

        let validity = tree.add_child(tbs, AsnType::Sequence).unwrap();
        let not_before = tree.add_child(validity, AsnType::UtcTime).unwrap();
        let not_after = tree.add_child(validity, AsnType::UtcTime).unwrap();
        tree.write_time(
            not_before, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
        ).unwrap();
        tree.write_time(
            not_after, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap()
        ).unwrap();

        add_name(&mut tree, tbs, "Test EE");

        let spki = tree.add_child(tbs, AsnType::Sequence).unwrap();
        let key_alg = tree.add_child(spki, AsnType::Sequence).unwrap();
        let key_alg_oid = tree.add_child(key_alg, AsnType::Oid).unwrap();
        tree.write_oid(key_alg_oid, oid::RSA_ENCRYPTION).unwrap();
        let key_param = tree.add_child(key_alg, AsnType::Null).unwrap();
        tree.write_null(key_param).unwrap();
        let key_bits = tree.add_child(spki, AsnType::BitString).unwrap();
        tree.write_bits(key_bits, &[0x30, 0x06, 0x02, 0x01, 0x05, 0x02,
            0x01, 0x03], 0).unwrap();

        let wrapper = tree.add_child_tagged(
            tbs, Tag::context(3, true), AsnType::Opaque
        ).unwrap();
        let exts = tree.add_child(wrapper, AsnType::Sequence).unwrap();
        let ski = tree.add_child(exts, AsnType::Sequence).unwrap();
        let ski_oid = tree.add_child(ski, AsnType::Oid).unwrap();
        tree.write_oid(ski_oid, oid::SUBJECT_KEY_IDENTIFIER).unwrap();
        let ski_value = tree.add_child(ski, AsnType::OctetString).unwrap();
        tree.write_octets(ski_value, &[0x04, 0x02, 0xaa, 0xbb]).unwrap();

        let sig_alg = tree.add_child(root, AsnType::Sequence).unwrap();
        let sig_alg_oid = tree.add_child(sig_alg, AsnType::Oid).unwrap();
        tree.write_oid(sig_alg_oid, oid::SHA256_WITH_RSA).unwrap();
        let signature = tree.add_child(root, AsnType::BitString).unwrap();
        tree.write_bits(signature, &[0x5a; 16], 0).unwrap();

        Certificate::decode(tree.to_der().as_ref()).unwrap()
    }

    #[test]
    fn skeleton_resolution() {
        let mut cert = build_cert();
        assert_eq!(cert.serial_number().unwrap(), 0x0123);
        let (not_before, not_after) = cert.validity().unwrap();
        assert_eq!(not_before.year(), 2026);
        assert_eq!(not_after.year(), 2027);
        assert_eq!(cert.signature_bits().unwrap().octets().as_ref(),
            &[0x5a; 16][..]);
        assert!(cert.extensions().is_some());
    }

    #[test]
    fn decode_encode_identity() {
        let cert = build_cert();
        let encoded = cert.to_der();
        let again = Certificate::decode(encoded.as_ref()).unwrap();
        assert_eq!(again.to_der(), encoded);
    }

    #[test]
    fn find_and_make_extensions() {
        let mut cert = build_cert();

        let ski = cert.find_extension(
            oid::SUBJECT_KEY_IDENTIFIER, false
        ).unwrap().unwrap();
        assert_eq!(
            cert.extension_oid(ski).unwrap(),
            oid::SUBJECT_KEY_IDENTIFIER
        );
        assert!(!cert.extension_critical(ski).unwrap());

        assert!(cert.find_extension(oid::KEY_USAGE, false).unwrap().is_none());

        // Creating appends a zeroed extension and keeps the encoding
        // consistent.
        let usage = cert.find_extension(oid::KEY_USAGE, true)
            .unwrap().unwrap();
        assert_eq!(cert.extension_oid(usage).unwrap(), oid::KEY_USAGE);
        let value = cert.extension_value(usage).unwrap();
        assert_eq!(cert.tree_mut().octets_vsize(value).unwrap(), 0);

        let mut reparsed = Certificate::decode(cert.to_der().as_ref()).unwrap();
        assert!(reparsed.find_extension(oid::KEY_USAGE, false)
            .unwrap().is_some());

        // Making an existing extension clears its value.
        let ski_value = cert.extension_value(ski).unwrap();
        assert!(cert.tree_mut().octets_vsize(ski_value).unwrap() > 0);
        cert.make_extension(oid::SUBJECT_KEY_IDENTIFIER).unwrap();
        assert_eq!(cert.tree_mut().octets_vsize(ski_value).unwrap(), 0);
    }

    #[test]
    fn rejects_non_certificates() {
        assert!(Certificate::decode(&[0x02, 0x01, 0x00]).is_err());
        // A sequence that is too short.
        assert!(Certificate::decode(&[0x30, 0x03, 0x02, 0x01, 0x00]).is_err());
    }

    #[test]
    fn editing_a_key_usage_bit() {
        let mut cert = build_cert();
        let usage = cert.find_extension(oid::KEY_USAGE, true)
            .unwrap().unwrap();
        let value = cert.extension_value(usage).unwrap();

        // The value of a key usage extension is itself a DER BIT STRING;
        // build it as its own little tree and stuff it into the value.
        let mut bits = Tree::new(AsnType::BitString);
        let key_cert_sign = bits.add_bit(bits.root(), 5).unwrap();
        bits.write_bit(key_cert_sign, true).unwrap();
        let encoded = bits.to_der();
        cert.tree_mut().write_octets(value, encoded.as_ref()).unwrap();

        let mut reparsed = Tree::decode(
            cert.tree().content(value).unwrap()
        ).unwrap();
        let probe = reparsed.add_bit(reparsed.root(), 5).unwrap();
        assert!(reparsed.read_bit(probe).unwrap());
    }
}
