//! Compact ASN.1 object trees for RPKI tooling.
//!
//! This crate keeps a BER/DER encoded value as a tree of nodes that can be
//! read and edited in place through typed accessors. Writing to any node,
//! however deep, re-establishes the encoded lengths of every enclosing
//! value before the call returns, so a tree can always be serialized back
//! to valid DER in a single pass. That makes it a convenient substrate for
//! tooling that needs to inspect or surgically alter certificates and
//! other signed objects rather than merely parse them.
//!
//! The core lives in [`tree`] with the per-type accessors implemented on
//! [`Tree`] in their own modules. On top of it, [`cert`] resolves the
//! X.509 certificate skeleton and its extension list, [`rtr`] speaks the
//! RPKI-to-Router PDU format (enable the `rtr` feature), and [`config`]
//! loads the toolchain configuration file. Signature verification in
//! [`cert`] needs the `crypto` feature.

pub use self::bstring::Bits;
pub use self::error::{DecodeError, Error, ErrorKind};
pub use self::tag::{AsnType, Class, Tag};
pub use self::tree::{Node, Tree};

pub mod bstring;
pub mod cert;
pub mod config;
pub mod error;
pub mod int;
pub mod oid;
pub mod ostring;
pub mod rtr;
pub mod tag;
pub mod time;
pub mod tree;
