//! UTCTime and GeneralizedTime accessors.
//!
//! Validity times in certificates come as either UTCTime with a two-digit
//! year or GeneralizedTime with four digits, both in the DER profile that
//! requires seconds and the `Z` suffix. The accessors map between those
//! content octets and `chrono::DateTime<Utc>`. Two-digit years follow the
//! X.509 rule: values 00 through 49 mean 20xx, everything else 19xx.

use chrono::{DateTime, Datelike, LocalResult, TimeZone, Timelike, Utc};
use crate::error::{Error, ErrorKind};
use crate::tag::AsnType;
use crate::tree::{Node, Tree, FILLED};


/// # Time access
///
impl Tree {
    /// Reads the value of a UTCTime or GeneralizedTime node.
    pub fn read_time(&mut self, node: Node) -> Result<DateTime<Utc>, Error> {
        let ix = self.begin(node)?;
        let typ = self.node_type(ix);
        if !matches!(typ, AsnType::UtcTime | AsnType::GeneralizedTime) {
            return Err(self.fail(ix, ErrorKind::Type))
        }
        let content = match self.node_content(ix) {
            Some(content) => content,
            None => return Err(self.fail(ix, ErrorKind::Mandatory)),
        };
        match parse_time(content, typ == AsnType::UtcTime) {
            Some(time) => Ok(time),
            None => Err(self.fail(ix, ErrorKind::Range)),
        }
    }

    /// Writes the value of a UTCTime or GeneralizedTime node.
    ///
    /// A time whose year cannot be represented in the node's type is
    /// rejected with a range error. Returns the new content length.
    pub fn write_time(
        &mut self, node: Node, time: DateTime<Utc>
    ) -> Result<usize, Error> {
        let ix = self.begin(node)?;
        let typ = self.node_type(ix);
        let text = match typ {
            AsnType::UtcTime => {
                let year = time.year();
                if !(1950..=2049).contains(&year) {
                    return Err(self.fail(ix, ErrorKind::Range))
                }
                format!(
                    "{:02}{:02}{:02}{:02}{:02}{:02}Z",
                    year % 100, time.month(), time.day(),
                    time.hour(), time.minute(), time.second()
                )
            }
            AsnType::GeneralizedTime => {
                let year = time.year();
                if !(0..=9999).contains(&year) {
                    return Err(self.fail(ix, ErrorKind::Range))
                }
                format!(
                    "{:04}{:02}{:02}{:02}{:02}{:02}Z",
                    year, time.month(), time.day(),
                    time.hour(), time.minute(), time.second()
                )
            }
            _ => return Err(self.fail(ix, ErrorKind::Type)),
        };
        let len = text.len();
        self.install_content(ix, text.into_bytes());
        if let Err(err) = self.fill_upward(node, FILLED) {
            return Err(self.fail(ix, err.kind()))
        }
        Ok(len)
    }
}

fn parse_time(content: &[u8], two_digit_year: bool) -> Option<DateTime<Utc>> {
    let expected = if two_digit_year { 13 } else { 15 };
    if content.len() != expected || *content.last()? != b'Z' {
        return None
    }
    let mut digits = content[..expected - 1].iter().map(|&octet| {
        if octet.is_ascii_digit() {
            Some(u32::from(octet - b'0'))
        }
        else {
            None
        }
    });
    let mut take = |count: u32| -> Option<u32> {
        let mut res = 0;
        for _ in 0..count {
            res = res * 10 + digits.next()??;
        }
        Some(res)
    };
    let year = if two_digit_year {
        match take(2)? {
            year if year < 50 => 2000 + year,
            year => 1900 + year,
        }
    }
    else {
        take(4)?
    };
    let (month, day) = (take(2)?, take(2)?);
    let (hour, minute, second) = (take(2)?, take(2)?, take(2)?);
    match Utc.with_ymd_and_hms(
        year as i32, month, day, hour, minute, second
    ) {
        LocalResult::Single(time) => Some(time),
        _ => None,
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn time_node(typ: AsnType) -> (Tree, Node) {
        let mut tree = Tree::new(AsnType::Sequence);
        let node = tree.add_child(tree.root(), typ).unwrap();
        (tree, node)
    }

    #[test]
    fn utc_time_roundtrip() {
        let (mut tree, node) = time_node(AsnType::UtcTime);
        let time = Utc.with_ymd_and_hms(2026, 8, 6, 12, 34, 56).unwrap();
        assert_eq!(tree.write_time(node, time).unwrap(), 13);
        assert_eq!(tree.content(node), Some(&b"260806123456Z"[..]));
        assert_eq!(tree.read_time(node).unwrap(), time);
    }

    #[test]
    fn utc_time_year_window() {
        let (mut tree, node) = time_node(AsnType::UtcTime);

        // 99 means 1999, 49 means 2049.
        let ix = tree.begin(node).unwrap();
        tree.install_content(ix, b"991231235959Z".to_vec());
        assert_eq!(tree.read_time(node).unwrap().year(), 1999);
        tree.install_content(ix, b"490101000000Z".to_vec());
        assert_eq!(tree.read_time(node).unwrap().year(), 2049);

        // 2050 cannot be a UTCTime.
        let future = Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            tree.write_time(node, future).unwrap_err().kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn generalized_time_roundtrip() {
        let (mut tree, node) = time_node(AsnType::GeneralizedTime);
        let time = Utc.with_ymd_and_hms(2052, 1, 31, 0, 0, 1).unwrap();
        assert_eq!(tree.write_time(node, time).unwrap(), 15);
        assert_eq!(tree.content(node), Some(&b"20520131000001Z"[..]));
        assert_eq!(tree.read_time(node).unwrap(), time);
    }

    #[test]
    fn rejects_malformed_content() {
        let (mut tree, node) = time_node(AsnType::UtcTime);
        let ix = tree.begin(node).unwrap();
        for content in [
            &b"260806123456"[..],     // missing Z
            &b"2608061234567"[..],    // digit instead of Z
            &b"26x806123456Z"[..],    // non-digit
            &b"261306123456Z"[..],    // month 13
            &b"20260806123456Z"[..],  // four-digit year in a UTCTime
        ] {
            tree.install_content(ix, content.to_vec());
            assert_eq!(
                tree.read_time(node).unwrap_err().kind(),
                ErrorKind::Range,
                "content {:?}", content
            );
        }
    }

    #[test]
    fn type_errors() {
        let mut tree = Tree::new(AsnType::Sequence);
        let int = tree.add_child(tree.root(), AsnType::Integer).unwrap();
        assert_eq!(
            tree.read_time(int).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            tree.write_time(int, Utc::now()).unwrap_err().kind(),
            ErrorKind::Type
        );
    }
}
