//! Session state.
//!
//! The state of a session with an RTR cache consists of a sixteen bit
//! session ID and a serial number, wrapped up in [`State`]. Serial numbers
//! follow the special arithmetic of RFC 1982 and therefore get their own
//! type [`Serial`].

use std::{cmp, fmt, str};
use std::time::SystemTime;


//------------ State ---------------------------------------------------------

/// The RTR session state.
///
/// The session ID describes one continuous session with the same evolving
/// data set; the serial number describes a particular version of that set.
/// Both are chosen when a session starts, and the serial number increases
/// by one with every data update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct State {
    session: u16,
    serial: Serial,
}

impl State {
    /// Creates a state value for a new session.
    ///
    /// The session ID is derived from the lower sixteen bits of the
    /// current Unix time, the serial starts at zero.
    pub fn new() -> Self {
        Self::new_with_serial(Serial(0))
    }

    /// Creates a state value with the given initial serial number.
    pub fn new_with_serial(serial: Serial) -> Self {
        State {
            session: {
                SystemTime::now()
                    .duration_since(SystemTime::UNIX_EPOCH)
                    .map(|dur| dur.as_secs() as u16)
                    .unwrap_or(0)
            },
            serial,
        }
    }

    /// Creates a state value from its components.
    pub const fn from_parts(session: u16, serial: Serial) -> Self {
        State { session, serial }
    }

    /// Increases the serial number by one.
    ///
    /// Serial numbers may wrap, which is fine; see [`Serial`].
    pub fn inc(&mut self) {
        self.serial = self.serial.add(1)
    }

    /// Returns the session ID.
    pub fn session(self) -> u16 {
        self.session
    }

    /// Returns the serial number.
    pub fn serial(self) -> Serial {
        self.serial
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}


//------------ Serial --------------------------------------------------------

/// A serial number.
///
/// Serial numbers are integers with addition and comparison defined in
/// [RFC 1982] so they can roll over. Addition is only defined for values
/// up to `2^31 - 1`; to avoid surprise panics there is no `Add` impl but
/// a dedicated [`add`][Serial::add] method. Comparison is necessarily
/// partial: some pairs of unequal values are not ordered either way.
///
/// [RFC 1982]: https://tools.ietf.org/html/rfc1982
#[derive(Clone, Copy, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Serial(pub u32);

impl Serial {
    /// Returns the serial as a raw integer.
    pub fn into_int(self) -> u32 {
        self.0
    }

    /// Adds `other` to the serial, wrapping around as necessary.
    ///
    /// # Panics
    ///
    /// Addition is only defined for values of `other` up to `2^31 - 1`;
    /// anything larger panics.
    pub fn add(self, other: u32) -> Self {
        assert!(other <= 0x7fff_ffff);
        Serial(self.0.wrapping_add(other))
    }
}


//--- From and FromStr

impl From<u32> for Serial {
    fn from(value: u32) -> Self {
        Serial(value)
    }
}

impl From<Serial> for u32 {
    fn from(serial: Serial) -> Self {
        serial.0
    }
}

impl str::FromStr for Serial {
    type Err = <u32 as str::FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u32::from_str(s).map(Serial)
    }
}


//--- Display

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//--- PartialEq and Eq

impl PartialEq for Serial {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<u32> for Serial {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl Eq for Serial { }


//--- PartialOrd

impl cmp::PartialOrd for Serial {
    fn partial_cmp(&self, other: &Serial) -> Option<cmp::Ordering> {
        match self.0.cmp(&other.0) {
            cmp::Ordering::Equal => Some(cmp::Ordering::Equal),
            cmp::Ordering::Less => {
                let diff = other.0 - self.0;
                if diff < 0x8000_0000 {
                    Some(cmp::Ordering::Less)
                }
                else if diff > 0x8000_0000 {
                    Some(cmp::Ordering::Greater)
                }
                else {
                    None
                }
            }
            cmp::Ordering::Greater => {
                let diff = self.0 - other.0;
                if diff < 0x8000_0000 {
                    Some(cmp::Ordering::Greater)
                }
                else if diff > 0x8000_0000 {
                    Some(cmp::Ordering::Less)
                }
                else {
                    None
                }
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serial_arithmetic() {
        assert_eq!(Serial(12).add(4), Serial(16));
        assert_eq!(Serial(0xffff_ffff).add(1), Serial(0));
        assert_eq!(Serial(0xffff_fffe).add(5), Serial(3));
    }

    #[test]
    #[should_panic]
    fn serial_add_out_of_range() {
        let _ = Serial(0).add(0x8000_0000);
    }

    #[test]
    fn serial_ordering() {
        use std::cmp::Ordering::*;

        assert_eq!(Serial(1).partial_cmp(&Serial(1)), Some(Equal));
        assert_eq!(Serial(1).partial_cmp(&Serial(2)), Some(Less));
        assert_eq!(Serial(2).partial_cmp(&Serial(1)), Some(Greater));

        // Wrapped: 0 is newer than a serial just below the rollover.
        assert_eq!(
            Serial(0xffff_ffff).partial_cmp(&Serial(0)),
            Some(Less)
        );
        assert_eq!(
            Serial(0).partial_cmp(&Serial(0xffff_ffff)),
            Some(Greater)
        );

        // Exactly half the space apart: not comparable.
        assert_eq!(Serial(0).partial_cmp(&Serial(0x8000_0000)), None);
    }

    #[test]
    fn state() {
        let mut state = State::from_parts(4711, Serial(10));
        state.inc();
        assert_eq!(state.session(), 4711);
        assert_eq!(state.serial(), Serial(11));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serial_serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(&Serial(17), &[Token::U32(17)]);
    }
}
