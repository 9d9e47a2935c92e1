//! Raw protocol data.
//!
//! This module contains types for the protocol data units of RTR in their
//! wire representation: a fixed eight octet header of version, PDU type, a
//! sixteen bit session field that some types reuse for other purposes, and
//! the total length, followed by a type-specific payload. See section 5 of
//! RFC 6810 and RFC 8210.
//!
//! Reading happens through [`Pdu::read`] which returns `Ok(None)` both
//! when the peer closed the connection before a new PDU started and when a
//! PDU announces a length its type cannot have, since such a stream cannot
//! be re-synchronized and must be dropped either way.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use bytes::Bytes;
use log::warn;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use super::state::{Serial, State};


/// The largest PDU length accepted when reading.
///
/// Only error reports have a variable length. Anything bigger than this
/// is taken as a malformed stream rather than a request to allocate.
const MAX_PDU_LEN: u32 = 65536;


//------------ Header --------------------------------------------------------

/// The header portion of an RTR PDU.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Header {
    version: u8,
    pdu: u8,
    session: u16,
    length: u32,
}

impl Header {
    /// The size of an encoded header.
    pub const LEN: usize = 8;

    /// Creates a new header.
    pub fn new(version: u8, pdu: u8, session: u16, length: u32) -> Self {
        Header { version, pdu, session, length }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the PDU type.
    pub fn pdu(self) -> u8 {
        self.pdu
    }

    /// Returns the session field.
    ///
    /// Some PDU types reuse this field for other purposes, e.g. the error
    /// code of an error report.
    pub fn session(self) -> u16 {
        self.session
    }

    /// Returns the total length of the PDU including the header.
    pub fn length(self) -> u32 {
        self.length
    }

    fn to_bytes(self) -> [u8; Self::LEN] {
        let session = self.session.to_be_bytes();
        let length = self.length.to_be_bytes();
        [
            self.version, self.pdu, session[0], session[1],
            length[0], length[1], length[2], length[3],
        ]
    }

    fn from_bytes(data: [u8; Self::LEN]) -> Self {
        Header {
            version: data[0],
            pdu: data[1],
            session: u16::from_be_bytes([data[2], data[3]]),
            length: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
        }
    }

    /// Reads a header from a reader.
    ///
    /// Returns `Ok(None)` if the connection was closed before the first
    /// octet. A close in the middle of the header is an error.
    pub async fn read<Sock: AsyncRead + Unpin>(
        sock: &mut Sock
    ) -> Result<Option<Self>, io::Error> {
        let mut buf = [0u8; Self::LEN];
        let mut got = 0;
        while got < buf.len() {
            let count = sock.read(&mut buf[got..]).await?;
            if count == 0 {
                if got == 0 {
                    return Ok(None)
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed inside a PDU header"
                ))
            }
            got += count;
        }
        Ok(Some(Self::from_bytes(buf)))
    }
}


//------------ SerialNotify --------------------------------------------------

/// A serial notify informs a client that a cache has new data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SerialNotify {
    version: u8,
    state: State,
}

impl SerialNotify {
    /// The PDU type of a serial notify.
    pub const PDU: u8 = 0;

    /// The encoded size.
    pub const LEN: u32 = 12;

    /// Creates a new serial notify PDU.
    pub fn new(version: u8, state: State) -> Self {
        SerialNotify { version, state }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the state carried in the PDU.
    pub fn state(self) -> State {
        self.state
    }

    fn to_vec(self) -> Vec<u8> {
        let mut out = Header::new(
            self.version, Self::PDU, self.state.session(), Self::LEN
        ).to_bytes().to_vec();
        out.extend_from_slice(&self.state.serial().into_int().to_be_bytes());
        out
    }

    async fn read_payload<Sock: AsyncRead + Unpin>(
        header: Header, sock: &mut Sock
    ) -> Result<Self, io::Error> {
        let mut serial = [0u8; 4];
        sock.read_exact(&mut serial).await?;
        Ok(SerialNotify {
            version: header.version(),
            state: State::from_parts(
                header.session(), Serial(u32::from_be_bytes(serial))
            ),
        })
    }
}


//------------ SerialQuery ---------------------------------------------------

/// A serial query requests all updates since a router's last update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SerialQuery {
    version: u8,
    state: State,
}

impl SerialQuery {
    /// The PDU type of a serial query.
    pub const PDU: u8 = 1;

    /// The encoded size.
    pub const LEN: u32 = 12;

    /// Creates a new serial query from the given state.
    pub fn new(version: u8, state: State) -> Self {
        SerialQuery { version, state }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the state the router last saw.
    pub fn state(self) -> State {
        self.state
    }

    fn to_vec(self) -> Vec<u8> {
        let mut out = Header::new(
            self.version, Self::PDU, self.state.session(), Self::LEN
        ).to_bytes().to_vec();
        out.extend_from_slice(&self.state.serial().into_int().to_be_bytes());
        out
    }

    async fn read_payload<Sock: AsyncRead + Unpin>(
        header: Header, sock: &mut Sock
    ) -> Result<Self, io::Error> {
        let mut serial = [0u8; 4];
        sock.read_exact(&mut serial).await?;
        Ok(SerialQuery {
            version: header.version(),
            state: State::from_parts(
                header.session(), Serial(u32::from_be_bytes(serial))
            ),
        })
    }
}


//------------ ResetQuery ----------------------------------------------------

/// A reset query requests the complete current set of data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResetQuery {
    version: u8,
}

impl ResetQuery {
    /// The PDU type of a reset query.
    pub const PDU: u8 = 2;

    /// The encoded size.
    pub const LEN: u32 = 8;

    /// Creates a new reset query.
    pub fn new(version: u8) -> Self {
        ResetQuery { version }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    fn to_vec(self) -> Vec<u8> {
        Header::new(self.version, Self::PDU, 0, Self::LEN)
            .to_bytes().to_vec()
    }
}


//------------ CacheResponse -------------------------------------------------

/// The cache response starts a sequence of payload PDUs with data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheResponse {
    version: u8,
    session: u16,
}

impl CacheResponse {
    /// The PDU type of a cache response.
    pub const PDU: u8 = 3;

    /// The encoded size.
    pub const LEN: u32 = 8;

    /// Creates a new cache response for the given state.
    pub fn new(version: u8, state: State) -> Self {
        CacheResponse { version, session: state.session() }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the session ID.
    pub fn session(self) -> u16 {
        self.session
    }

    fn to_vec(self) -> Vec<u8> {
        Header::new(self.version, Self::PDU, self.session, Self::LEN)
            .to_bytes().to_vec()
    }
}


//------------ Ipv4Prefix ----------------------------------------------------

/// The payload PDU for route origin authorisation in IPv4.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ipv4Prefix {
    version: u8,
    flags: u8,
    prefix_len: u8,
    max_len: u8,
    prefix: Ipv4Addr,
    asn: u32,
}

impl Ipv4Prefix {
    /// The PDU type of an IPv4 prefix.
    pub const PDU: u8 = 4;

    /// The encoded size.
    pub const LEN: u32 = 20;

    /// Creates a new IPv4 prefix PDU.
    pub fn new(
        version: u8,
        flags: u8,
        prefix_len: u8,
        max_len: u8,
        prefix: Ipv4Addr,
        asn: u32,
    ) -> Self {
        Ipv4Prefix { version, flags, prefix_len, max_len, prefix, asn }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the flags field.
    ///
    /// The only used flag is the least significant bit: 1 announces the
    /// prefix, 0 withdraws it.
    pub fn flags(self) -> u8 {
        self.flags
    }

    /// Returns the prefix length.
    pub fn prefix_len(self) -> u8 {
        self.prefix_len
    }

    /// Returns the max length.
    pub fn max_len(self) -> u8 {
        self.max_len
    }

    /// Returns the prefix address.
    pub fn prefix(self) -> Ipv4Addr {
        self.prefix
    }

    /// Returns the autonomous system number.
    pub fn asn(self) -> u32 {
        self.asn
    }

    fn to_vec(self) -> Vec<u8> {
        let mut out = Header::new(self.version, Self::PDU, 0, Self::LEN)
            .to_bytes().to_vec();
        out.extend_from_slice(&[
            self.flags, self.prefix_len, self.max_len, 0
        ]);
        out.extend_from_slice(&u32::from(self.prefix).to_be_bytes());
        out.extend_from_slice(&self.asn.to_be_bytes());
        out
    }

    async fn read_payload<Sock: AsyncRead + Unpin>(
        header: Header, sock: &mut Sock
    ) -> Result<Self, io::Error> {
        let mut buf = [0u8; 12];
        sock.read_exact(&mut buf).await?;
        Ok(Ipv4Prefix {
            version: header.version(),
            flags: buf[0],
            prefix_len: buf[1],
            max_len: buf[2],
            prefix: u32::from_be_bytes(
                [buf[4], buf[5], buf[6], buf[7]]
            ).into(),
            asn: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
        })
    }
}


//------------ Ipv6Prefix ----------------------------------------------------

/// The payload PDU for route origin authorisation in IPv6.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ipv6Prefix {
    version: u8,
    flags: u8,
    prefix_len: u8,
    max_len: u8,
    prefix: Ipv6Addr,
    asn: u32,
}

impl Ipv6Prefix {
    /// The PDU type of an IPv6 prefix.
    pub const PDU: u8 = 6;

    /// The encoded size.
    pub const LEN: u32 = 32;

    /// Creates a new IPv6 prefix PDU.
    pub fn new(
        version: u8,
        flags: u8,
        prefix_len: u8,
        max_len: u8,
        prefix: Ipv6Addr,
        asn: u32,
    ) -> Self {
        Ipv6Prefix { version, flags, prefix_len, max_len, prefix, asn }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the flags field.
    pub fn flags(self) -> u8 {
        self.flags
    }

    /// Returns the prefix length.
    pub fn prefix_len(self) -> u8 {
        self.prefix_len
    }

    /// Returns the max length.
    pub fn max_len(self) -> u8 {
        self.max_len
    }

    /// Returns the prefix address.
    pub fn prefix(self) -> Ipv6Addr {
        self.prefix
    }

    /// Returns the autonomous system number.
    pub fn asn(self) -> u32 {
        self.asn
    }

    fn to_vec(self) -> Vec<u8> {
        let mut out = Header::new(self.version, Self::PDU, 0, Self::LEN)
            .to_bytes().to_vec();
        out.extend_from_slice(&[
            self.flags, self.prefix_len, self.max_len, 0
        ]);
        out.extend_from_slice(&u128::from(self.prefix).to_be_bytes());
        out.extend_from_slice(&self.asn.to_be_bytes());
        out
    }

    async fn read_payload<Sock: AsyncRead + Unpin>(
        header: Header, sock: &mut Sock
    ) -> Result<Self, io::Error> {
        let mut buf = [0u8; 24];
        sock.read_exact(&mut buf).await?;
        let mut addr = [0u8; 16];
        addr.copy_from_slice(&buf[4..20]);
        Ok(Ipv6Prefix {
            version: header.version(),
            flags: buf[0],
            prefix_len: buf[1],
            max_len: buf[2],
            prefix: u128::from_be_bytes(addr).into(),
            asn: u32::from_be_bytes([buf[20], buf[21], buf[22], buf[23]]),
        })
    }
}


//------------ Timing --------------------------------------------------------

/// The three timer values of a version 1 end-of-data PDU.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Timing {
    /// Seconds until a client should ask for an update.
    pub refresh: u32,

    /// Seconds to wait before retrying a failed update.
    pub retry: u32,

    /// Seconds after which unrefreshed data must be discarded.
    pub expire: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            refresh: 3600,
            retry: 600,
            expire: 7200,
        }
    }
}


//------------ EndOfData -----------------------------------------------------

/// End-of-data marks the end of a sequence of payload PDUs.
///
/// In protocol version 0 the PDU only carries the state; version 1 added
/// the three timer values, carried here as an optional [`Timing`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndOfData {
    version: u8,
    state: State,
    timing: Option<Timing>,
}

impl EndOfData {
    /// The PDU type of end-of-data.
    pub const PDU: u8 = 7;

    /// Creates a new end-of-data PDU.
    ///
    /// For version 0 the timing values are dropped.
    pub fn new(version: u8, state: State, timing: Timing) -> Self {
        EndOfData {
            version,
            state,
            timing: if version == 0 { None } else { Some(timing) },
        }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    /// Returns the state carried in the PDU.
    pub fn state(self) -> State {
        self.state
    }

    /// Returns the timing values if the version has them.
    pub fn timing(self) -> Option<Timing> {
        self.timing
    }

    fn to_vec(self) -> Vec<u8> {
        let length = match self.timing {
            Some(_) => 24,
            None => 12,
        };
        let mut out = Header::new(
            self.version, Self::PDU, self.state.session(), length
        ).to_bytes().to_vec();
        out.extend_from_slice(&self.state.serial().into_int().to_be_bytes());
        if let Some(timing) = self.timing {
            out.extend_from_slice(&timing.refresh.to_be_bytes());
            out.extend_from_slice(&timing.retry.to_be_bytes());
            out.extend_from_slice(&timing.expire.to_be_bytes());
        }
        out
    }

    async fn read_payload<Sock: AsyncRead + Unpin>(
        header: Header, sock: &mut Sock
    ) -> Result<Self, io::Error> {
        let mut serial = [0u8; 4];
        sock.read_exact(&mut serial).await?;
        let state = State::from_parts(
            header.session(), Serial(u32::from_be_bytes(serial))
        );
        let timing = if header.length() == 24 {
            let mut buf = [0u8; 12];
            sock.read_exact(&mut buf).await?;
            Some(Timing {
                refresh: u32::from_be_bytes(
                    [buf[0], buf[1], buf[2], buf[3]]
                ),
                retry: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
                expire: u32::from_be_bytes(
                    [buf[8], buf[9], buf[10], buf[11]]
                ),
            })
        }
        else {
            None
        };
        Ok(EndOfData { version: header.version(), state, timing })
    }
}


//------------ CacheReset ----------------------------------------------------

/// Cache reset tells a client that its serial query cannot be served.
///
/// A cache that cannot provide an incremental update back to the serial
/// number a serial query asked for responds with a cache reset, asking the
/// client to start over with a reset query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheReset {
    version: u8,
}

impl CacheReset {
    /// The PDU type of a cache reset.
    pub const PDU: u8 = 8;

    /// The encoded size.
    pub const LEN: u32 = 8;

    /// Creates a new cache reset.
    pub fn new(version: u8) -> Self {
        CacheReset { version }
    }

    /// Returns the protocol version.
    pub fn version(self) -> u8 {
        self.version
    }

    fn to_vec(self) -> Vec<u8> {
        Header::new(self.version, Self::PDU, 0, Self::LEN)
            .to_bytes().to_vec()
    }
}


//------------ ErrorReport ---------------------------------------------------

/// An error report signals that something went wrong.
///
/// The report carries an error code in the header's session field and can
/// embed both the PDU that caused the trouble and diagnostic text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorReport {
    version: u8,
    error_code: u16,
    pdu: Bytes,
    text: Bytes,
}

impl ErrorReport {
    /// The PDU type of an error report.
    pub const PDU: u8 = 10;

    /// Creates a new error report.
    pub fn new(
        version: u8,
        error_code: u16,
        pdu: impl Into<Bytes>,
        text: impl Into<Bytes>,
    ) -> Self {
        ErrorReport {
            version, error_code,
            pdu: pdu.into(),
            text: text.into(),
        }
    }

    /// Returns the protocol version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the error code.
    pub fn error_code(&self) -> u16 {
        self.error_code
    }

    /// Returns the embedded erroneous PDU.
    pub fn pdu(&self) -> &Bytes {
        &self.pdu
    }

    /// Returns the embedded diagnostic text.
    pub fn text(&self) -> &Bytes {
        &self.text
    }

    fn to_vec(&self) -> Vec<u8> {
        let length = Header::LEN + 8 + self.pdu.len() + self.text.len();
        let mut out = Header::new(
            self.version, Self::PDU, self.error_code, length as u32
        ).to_bytes().to_vec();
        out.extend_from_slice(&(self.pdu.len() as u32).to_be_bytes());
        out.extend_from_slice(self.pdu.as_ref());
        out.extend_from_slice(&(self.text.len() as u32).to_be_bytes());
        out.extend_from_slice(self.text.as_ref());
        out
    }

    /// Parses the payload, which must already be fully read.
    fn from_payload(header: Header, body: &[u8]) -> Option<Self> {
        if body.len() < 4 {
            return None
        }
        let pdu_len = u32::from_be_bytes(
            [body[0], body[1], body[2], body[3]]
        ) as usize;
        let rest = body.get(4..)?;
        let pdu = rest.get(..pdu_len)?;
        let rest = rest.get(pdu_len..)?;
        if rest.len() < 4 {
            return None
        }
        let text_len = u32::from_be_bytes(
            [rest[0], rest[1], rest[2], rest[3]]
        ) as usize;
        let text = rest.get(4..)?;
        if text.len() != text_len {
            return None
        }
        Some(ErrorReport {
            version: header.version(),
            error_code: header.session(),
            pdu: Bytes::copy_from_slice(pdu),
            text: Bytes::copy_from_slice(text),
        })
    }
}


//------------ Pdu -----------------------------------------------------------

/// Any protocol data unit.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Pdu {
    SerialNotify(SerialNotify),
    SerialQuery(SerialQuery),
    ResetQuery(ResetQuery),
    CacheResponse(CacheResponse),
    Ipv4Prefix(Ipv4Prefix),
    Ipv6Prefix(Ipv6Prefix),
    EndOfData(EndOfData),
    CacheReset(CacheReset),
    ErrorReport(ErrorReport),
}

impl Pdu {
    /// Reads the next PDU from a reader.
    ///
    /// Returns `Ok(None)` when the connection was closed before a new PDU
    /// started or when a PDU announces a length that its type cannot
    /// have. The latter is logged: there is no way to find the start of
    /// the next PDU in such a stream, so the session has to end. An
    /// unknown PDU type is an error.
    pub async fn read<Sock: AsyncRead + Unpin>(
        sock: &mut Sock
    ) -> Result<Option<Self>, io::Error> {
        let header = match Header::read(sock).await? {
            Some(header) => header,
            None => return Ok(None),
        };
        let expected = match header.pdu() {
            SerialNotify::PDU => Some(SerialNotify::LEN),
            SerialQuery::PDU => Some(SerialQuery::LEN),
            ResetQuery::PDU => Some(ResetQuery::LEN),
            CacheResponse::PDU => Some(CacheResponse::LEN),
            Ipv4Prefix::PDU => Some(Ipv4Prefix::LEN),
            Ipv6Prefix::PDU => Some(Ipv6Prefix::LEN),
            EndOfData::PDU => None,
            CacheReset::PDU => Some(CacheReset::LEN),
            ErrorReport::PDU => None,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "unknown PDU type"
                ))
            }
        };
        if let Some(expected) = expected {
            if header.length() != expected {
                warn!(
                    "RTR: PDU type {} with invalid length {}",
                    header.pdu(), header.length()
                );
                return Ok(None)
            }
        }

        match header.pdu() {
            SerialNotify::PDU => {
                SerialNotify::read_payload(header, sock).await
                    .map(|pdu| Some(Pdu::SerialNotify(pdu)))
            }
            SerialQuery::PDU => {
                SerialQuery::read_payload(header, sock).await
                    .map(|pdu| Some(Pdu::SerialQuery(pdu)))
            }
            ResetQuery::PDU => {
                Ok(Some(Pdu::ResetQuery(ResetQuery::new(header.version()))))
            }
            CacheResponse::PDU => {
                Ok(Some(Pdu::CacheResponse(CacheResponse {
                    version: header.version(),
                    session: header.session(),
                })))
            }
            Ipv4Prefix::PDU => {
                Ipv4Prefix::read_payload(header, sock).await
                    .map(|pdu| Some(Pdu::Ipv4Prefix(pdu)))
            }
            Ipv6Prefix::PDU => {
                Ipv6Prefix::read_payload(header, sock).await
                    .map(|pdu| Some(Pdu::Ipv6Prefix(pdu)))
            }
            EndOfData::PDU => {
                if header.length() != 12 && header.length() != 24 {
                    warn!(
                        "RTR: end-of-data with invalid length {}",
                        header.length()
                    );
                    return Ok(None)
                }
                EndOfData::read_payload(header, sock).await
                    .map(|pdu| Some(Pdu::EndOfData(pdu)))
            }
            CacheReset::PDU => {
                Ok(Some(Pdu::CacheReset(CacheReset::new(header.version()))))
            }
            _ => {
                // Only the error report is left at this point.
                let length = header.length();
                if length < (Header::LEN as u32) + 8
                    || length > MAX_PDU_LEN
                {
                    warn!(
                        "RTR: error report with invalid length {}", length
                    );
                    return Ok(None)
                }
                let mut body = vec![0u8; length as usize - Header::LEN];
                sock.read_exact(&mut body).await?;
                match ErrorReport::from_payload(header, &body) {
                    Some(pdu) => Ok(Some(Pdu::ErrorReport(pdu))),
                    None => {
                        warn!("RTR: malformed error report");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Writes the PDU to a writer.
    pub async fn write<Sock: AsyncWrite + Unpin>(
        &self, sock: &mut Sock
    ) -> Result<(), io::Error> {
        sock.write_all(&self.to_vec()).await
    }

    /// Returns the wire encoding of the PDU.
    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            Pdu::SerialNotify(pdu) => pdu.to_vec(),
            Pdu::SerialQuery(pdu) => pdu.to_vec(),
            Pdu::ResetQuery(pdu) => pdu.to_vec(),
            Pdu::CacheResponse(pdu) => pdu.to_vec(),
            Pdu::Ipv4Prefix(pdu) => pdu.to_vec(),
            Pdu::Ipv6Prefix(pdu) => pdu.to_vec(),
            Pdu::EndOfData(pdu) => pdu.to_vec(),
            Pdu::CacheReset(pdu) => pdu.to_vec(),
            Pdu::ErrorReport(pdu) => pdu.to_vec(),
        }
    }

    /// Returns the protocol version of the PDU.
    pub fn version(&self) -> u8 {
        match self {
            Pdu::SerialNotify(pdu) => pdu.version(),
            Pdu::SerialQuery(pdu) => pdu.version(),
            Pdu::ResetQuery(pdu) => pdu.version(),
            Pdu::CacheResponse(pdu) => pdu.version(),
            Pdu::Ipv4Prefix(pdu) => pdu.version(),
            Pdu::Ipv6Prefix(pdu) => pdu.version(),
            Pdu::EndOfData(pdu) => pdu.version(),
            Pdu::CacheReset(pdu) => pdu.version(),
            Pdu::ErrorReport(pdu) => pdu.version(),
        }
    }

    /// Creates a prefix payload PDU for an address of either family.
    pub fn prefix(
        version: u8,
        flags: u8,
        prefix_len: u8,
        max_len: u8,
        addr: IpAddr,
        asn: u32,
    ) -> Self {
        match addr {
            IpAddr::V4(addr) => {
                Pdu::Ipv4Prefix(Ipv4Prefix::new(
                    version, flags, prefix_len, max_len, addr, asn
                ))
            }
            IpAddr::V6(addr) => {
                Pdu::Ipv6Prefix(Ipv6Prefix::new(
                    version, flags, prefix_len, max_len, addr, asn
                ))
            }
        }
    }
}


//============ Tests =========================================================
