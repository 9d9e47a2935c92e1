//! RTR: the RPKI to Router Protocol.
//!
//! Validated RPKI data reaches routers through the RPKI to Router
//! Protocol, a simple binary protocol of fixed-header PDUs exchanged over
//! a stream transport. This module implements the PDU layer: encoding,
//! decoding, and the session state the PDUs carry. It is generic over the
//! transport through Tokio's `AsyncRead` and `AsyncWrite`, so it works
//! over plain TCP as well as anything wrapped around it.
//!
//! The protocol is specified in [RFC 6810] and, for version 1, [RFC 8210].
//!
//! [RFC 6810]: https://tools.ietf.org/html/rfc6810
//! [RFC 8210]: https://tools.ietf.org/html/rfc8210

#![cfg(feature = "rtr")]

pub use self::pdu::{Pdu, Timing};
pub use self::state::{Serial, State};

pub mod pdu;
pub mod state;
