//! The identifier octets of BER encoded values.
//!
//! Every encoded value starts with identifier octets carrying its tag: the
//! class, whether the encoding is primitive or constructed, and the tag
//! number. [`Tag`] represents a decoded tag. [`AsnType`] is the semantic
//! type a node of the object tree carries, a closed enumeration that the
//! typed accessors match on at runtime.

use std::fmt;
use crate::error::DecodeError;


//------------ Class ---------------------------------------------------------

/// The class of an ASN.1 tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    fn bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }

    fn from_bits(octet: u8) -> Self {
        match octet & 0xc0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of an encoded value.
///
/// A tag combines the class, the tag number, and whether the value uses the
/// constructed encoding. Bit-position pseudo-nodes have no tag at all; the
/// tree represents that with `Option<Tag>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Tag {
    class: Class,
    number: u32,
    constructed: bool,
}

impl Tag {
    /// Creates a new tag from its parts.
    pub fn new(class: Class, number: u32, constructed: bool) -> Self {
        Tag { class, number, constructed }
    }

    /// Creates a universal tag.
    pub fn universal(number: u32, constructed: bool) -> Self {
        Tag::new(Class::Universal, number, constructed)
    }

    /// Creates a context-specific tag.
    pub fn context(number: u32, constructed: bool) -> Self {
        Tag::new(Class::Context, number, constructed)
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        self.class
    }

    /// Returns the tag number.
    pub fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag announces a constructed encoding.
    pub fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Parses the identifier octets at the start of `data`.
    ///
    /// Returns the tag and the number of octets it occupied. The position
    /// `pos` is only used for error reporting.
    pub fn parse(data: &[u8], pos: usize) -> Result<(Self, usize), DecodeError> {
        let first = match data.first() {
            Some(octet) => *octet,
            None => return Err(DecodeError::new(pos, "missing identifier octet")),
        };
        let class = Class::from_bits(first);
        let constructed = first & 0x20 != 0;
        if first & 0x1f != 0x1f {
            return Ok((
                Tag::new(class, u32::from(first & 0x1f), constructed), 1
            ))
        }

        // High-tag-number form: base 128, big endian, bit 8 set on all but
        // the last octet.
        let mut number = 0u32;
        let mut len = 1;
        loop {
            let octet = match data.get(len) {
                Some(octet) => *octet,
                None => {
                    return Err(DecodeError::new(
                        pos + len, "truncated identifier octets"
                    ))
                }
            };
            number = match number.checked_mul(128) {
                Some(number) => number | u32::from(octet & 0x7f),
                None => {
                    return Err(DecodeError::new(
                        pos + len, "tag number too large"
                    ))
                }
            };
            len += 1;
            if octet & 0x80 == 0 {
                break
            }
        }
        if number < 31 {
            return Err(DecodeError::new(pos, "non-minimal tag number"))
        }
        Ok((Tag::new(class, number, constructed), len))
    }

    /// Returns the number of identifier octets the tag encodes to.
    pub fn encoded_len(self) -> usize {
        if self.number < 31 {
            1
        }
        else {
            let mut len = 2;
            let mut number = self.number >> 7;
            while number > 0 {
                len += 1;
                number >>= 7;
            }
            len
        }
    }

    /// Appends the identifier octets to `out`.
    pub fn write(self, out: &mut Vec<u8>) {
        let lead = self.class.bits()
            | if self.constructed { 0x20 } else { 0 };
        if self.number < 31 {
            out.push(lead | self.number as u8);
            return
        }
        out.push(lead | 0x1f);
        let mut shift = (self.encoded_len() - 2) * 7;
        while shift > 0 {
            out.push(0x80 | ((self.number >> shift) & 0x7f) as u8);
            shift -= 7;
        }
        out.push((self.number & 0x7f) as u8);
    }
}


//--- Display

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.class {
            Class::Universal => write!(f, "[UNIVERSAL {}]", self.number),
            Class::Application => write!(f, "[APPLICATION {}]", self.number),
            Class::Context => write!(f, "[{}]", self.number),
            Class::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}


//------------ AsnType -------------------------------------------------------

/// The semantic ASN.1 type of a node.
///
/// The typed accessors check the node's declared type against this
/// enumeration before touching any content and reject a mismatch with a
/// type error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AsnType {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    Oid,
    Enumerated,
    Utf8String,
    Sequence,
    Set,
    NumericString,
    PrintableString,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    VisibleString,

    /// A value with a non-universal tag whose type is not known.
    Opaque,

    /// A bit-position pseudo-node inside a BIT STRING.
    ///
    /// Pseudo-nodes never own content and never appear in the encoding;
    /// they exist purely as handles for the single-bit accessors.
    NoType,
}

impl AsnType {
    /// Returns the type for a universal tag number, if known.
    pub fn from_universal(number: u32) -> Option<Self> {
        match number {
            1 => Some(AsnType::Boolean),
            2 => Some(AsnType::Integer),
            3 => Some(AsnType::BitString),
            4 => Some(AsnType::OctetString),
            5 => Some(AsnType::Null),
            6 => Some(AsnType::Oid),
            10 => Some(AsnType::Enumerated),
            12 => Some(AsnType::Utf8String),
            16 => Some(AsnType::Sequence),
            17 => Some(AsnType::Set),
            18 => Some(AsnType::NumericString),
            19 => Some(AsnType::PrintableString),
            22 => Some(AsnType::Ia5String),
            23 => Some(AsnType::UtcTime),
            24 => Some(AsnType::GeneralizedTime),
            26 => Some(AsnType::VisibleString),
            _ => None,
        }
    }

    /// Returns the universal tag number of the type, if it has one.
    pub fn universal_number(self) -> Option<u32> {
        match self {
            AsnType::Boolean => Some(1),
            AsnType::Integer => Some(2),
            AsnType::BitString => Some(3),
            AsnType::OctetString => Some(4),
            AsnType::Null => Some(5),
            AsnType::Oid => Some(6),
            AsnType::Enumerated => Some(10),
            AsnType::Utf8String => Some(12),
            AsnType::Sequence => Some(16),
            AsnType::Set => Some(17),
            AsnType::NumericString => Some(18),
            AsnType::PrintableString => Some(19),
            AsnType::Ia5String => Some(22),
            AsnType::UtcTime => Some(23),
            AsnType::GeneralizedTime => Some(24),
            AsnType::VisibleString => Some(26),
            AsnType::Opaque | AsnType::NoType => None,
        }
    }

    /// Returns whether values of the type use the constructed encoding.
    pub fn is_constructed(self) -> bool {
        matches!(self, AsnType::Sequence | AsnType::Set)
    }

    /// Returns whether the type belongs to the octet string family.
    ///
    /// These are the types whose content the octet string accessors are
    /// willing to touch.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            AsnType::OctetString | AsnType::Utf8String
                | AsnType::NumericString | AsnType::PrintableString
                | AsnType::Ia5String | AsnType::VisibleString
        )
    }
}


//============ Tests =========================================================
