//! Errors for object tree operations.
//!
//! Accessor failures are classified into a small taxonomy, [`ErrorKind`].
//! Every typed accessor clears the recorded kind on its target node before
//! doing anything else, and records the new kind there when it fails, so a
//! caller can always ask the tree for the diagnostics of the last operation
//! on a node. The same kind is also returned directly as part of [`Error`].
//!
//! Parsing of wire data fails with [`DecodeError`] instead, which carries
//! the octet position of the offending data.

use std::{error, fmt};


//------------ ErrorKind -----------------------------------------------------

/// The classification of an object tree operation failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The accessor was invoked on a node of the wrong ASN.1 type.
    Type,

    /// A mandatory value has no content yet.
    Mandatory,

    /// The node handle itself does not refer to a node.
    ///
    /// This is the only kind that cannot be recorded on a node, since
    /// there is no node to record it on.
    NullHandle,

    /// The ancestor chain of a node is internally inconsistent.
    ///
    /// A tree that produced this error should be considered corrupt.
    Structural,

    /// A value was outside the range an operation can represent.
    Range,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Type => "type mismatch",
            ErrorKind::Mandatory => "mandatory value not present",
            ErrorKind::NullHandle => "invalid node handle",
            ErrorKind::Structural => "inconsistent tree structure",
            ErrorKind::Range => "value out of range",
        }
    }
}


//--- Display

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Error ---------------------------------------------------------

/// An error returned by an object tree operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Returns the classification of the error.
    pub fn kind(self) -> ErrorKind {
        self.kind
    }
}


//--- From

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind }
    }
}


//--- Display and Error

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl error::Error for Error { }


//------------ DecodeError ---------------------------------------------------

/// An error happened while parsing BER/DER encoded data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    pos: usize,
    reason: &'static str,
}

impl DecodeError {
    pub(crate) fn new(pos: usize, reason: &'static str) -> Self {
        DecodeError { pos, reason }
    }

    /// Returns the octet position at which parsing failed.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns a human-readable reason for the failure.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}


//--- Display and Error

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed data at octet {}: {}", self.pos, self.reason)
    }
}

impl error::Error for DecodeError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::from(ErrorKind::Type).to_string(),
            "type mismatch"
        );
        assert_eq!(
            DecodeError::new(12, "trailing data").to_string(),
            "malformed data at octet 12: trailing data"
        );
    }
}
