//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use smallvec::SmallVec;
use crate::decode::ErrorKind;
use crate::encode::Target;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length can either be definite, providing the actual number of
/// content octets, or indefinite, in which case the content is delimited
/// by the end-of-contents marker.
///
/// # BER Encoding
///
/// If the most significant bit of the first octet is not set, the
/// remaining bits provide the definite length directly. If it is set, the
/// remaining bits specify the number of octets that follow to encode the
/// actual length as a big-endian unsigned integer. Zero following octets,
/// i.e., a first octet of 0x80, signal the indefinite form. A first octet
/// of 0xFF is reserved and always rejected.
///
/// Under DER rules, a definite length must be encoded in the minimum
/// number of octets. We treat this minimality requirement the same way as
/// tag minimality and only enforce it in strict mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// The value has the given number of content octets.
    Definite(usize),

    /// The content is delimited by an end-of-contents marker.
    Indefinite,
}

impl Length {
    /// Splits the length octets off the beginning of `data`.
    ///
    /// Returns the length and the number of octets used. On error,
    /// returns the error kind and the number of octets examined before
    /// the error was detected.
    pub fn split_from(
        data: &[u8], strict: bool,
    ) -> Result<(Self, usize), (ErrorKind, usize)> {
        let first = match data.first() {
            Some(first) => *first,
            None => return Err((ErrorKind::Incomplete, 0)),
        };

        if first & 0x80 == 0 {
            return Ok((Length::Definite(first.into()), 1))
        }
        if first == 0x80 {
            return Ok((Length::Indefinite, 1))
        }
        if first == 0xFF {
            return Err((ErrorKind::MalformedLength, 1))
        }

        let count = (first & 0x7f) as usize;
        let octets = match data.get(1..1 + count) {
            Some(octets) => octets,
            None => return Err((ErrorKind::Incomplete, data.len())),
        };

        // A leading zero octet or a single octet below 0x80 both have a
        // shorter encoding.
        if strict && (octets[0] == 0 || (count == 1 && octets[0] < 0x80)) {
            return Err((ErrorKind::NonMinimalLength, 2))
        }

        // Skip leading zeros, then check that what remains fits a usize.
        let significant = match octets.iter().position(|&octet| octet != 0) {
            Some(idx) => &octets[idx..],
            None => return Ok((Length::Definite(0), 1 + count)),
        };
        if significant.len() > core::mem::size_of::<usize>() {
            return Err((ErrorKind::MalformedLength, 1 + count))
        }

        let mut value = 0usize;
        for &octet in significant {
            value = value << 8 | usize::from(octet);
        }
        Ok((Length::Definite(value), 1 + count))
    }

    /// Returns the number of octets of the encoded form of a definite
    /// length.
    pub fn definite_len(len: usize) -> usize {
        if len < 0x80 {
            1
        }
        else {
            1 + significant_octets(len)
        }
    }

    /// Writes the canonical encoding of a definite length to a target.
    pub fn write_definite<T: Target>(
        len: usize, target: &mut T,
    ) -> Result<(), T::Error> {
        if len < 0x80 {
            return target.write_all(&[len as u8])
        }
        let count = significant_octets(len);
        let mut buf = SmallVec::<[u8; 12]>::new();
        buf.push(0x80 | count as u8);
        buf.extend_from_slice(
            &len.to_be_bytes()[core::mem::size_of::<usize>() - count..]
        );
        target.write_all(&buf)
    }
}

/// Returns the number of octets needed for the big-endian form of `len`.
///
/// Only called for lengths of 0x80 and up, so the result is at least one.
fn significant_octets(len: usize) -> usize {
    (usize::BITS as usize - len.leading_zeros() as usize + 7) / 8
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn split(data: &[u8], strict: bool) -> (Length, usize) {
        Length::split_from(data, strict).unwrap()
    }

    fn split_err(data: &[u8], strict: bool) -> ErrorKind {
        Length::split_from(data, strict).unwrap_err().0
    }

    #[test]
    fn ber_split_from() {
        assert_eq!(split(b"\x00", false), (Length::Definite(0), 1));
        assert_eq!(split(b"\x12", false), (Length::Definite(0x12), 1));
        assert_eq!(split(b"\x7f", false), (Length::Definite(0x7f), 1));
        assert_eq!(split(b"\x80", false), (Length::Indefinite, 1));
        assert_eq!(split(b"\x81\x00", false), (Length::Definite(0), 2));
        assert_eq!(split(b"\x81\x05", false), (Length::Definite(5), 2));
        assert_eq!(split(b"\x81\xf0", false), (Length::Definite(0xf0), 2));
        assert_eq!(
            split(b"\x82\x00\x00", false), (Length::Definite(0), 3)
        );
        assert_eq!(
            split(b"\x82\xf0\x0e", false), (Length::Definite(0xf00e), 3)
        );
        assert_eq!(
            split(b"\x82\x00\x0e", false), (Length::Definite(0x0e), 3)
        );
        assert!(matches!(
            split_err(b"\xff", false), ErrorKind::MalformedLength
        ));
    }

    #[test]
    fn der_split_from() {
        assert_eq!(split(b"\x00", true), (Length::Definite(0), 1));
        assert_eq!(split(b"\x7f", true), (Length::Definite(0x7f), 1));
        assert_eq!(split(b"\x80", true), (Length::Indefinite, 1));
        assert_eq!(split(b"\x81\x80", true), (Length::Definite(0x80), 2));
        assert_eq!(split(b"\x81\xf0", true), (Length::Definite(0xf0), 2));
        assert_eq!(
            split(b"\x82\xf0\x0e", true), (Length::Definite(0xf00e), 3)
        );
        assert!(matches!(
            split_err(b"\x81\x00", true), ErrorKind::NonMinimalLength
        ));
        assert!(matches!(
            split_err(b"\x81\x05", true), ErrorKind::NonMinimalLength
        ));
        assert!(matches!(
            split_err(b"\x81\x7f", true), ErrorKind::NonMinimalLength
        ));
        assert!(matches!(
            split_err(b"\x82\x00\x0e", true), ErrorKind::NonMinimalLength
        ));
        assert!(matches!(
            split_err(b"\xff", true), ErrorKind::MalformedLength
        ));
    }

    #[test]
    fn split_incomplete() {
        assert!(matches!(split_err(b"", false), ErrorKind::Incomplete));
        assert!(matches!(split_err(b"\x82\x01", false), ErrorKind::Incomplete));
    }

    #[test]
    fn excessive() {
        // Nine significant octets can’t fit a 64 bit usize.
        assert!(matches!(
            split_err(
                b"\x89\x01\x01\x01\x01\x01\x01\x01\x01\x01", false
            ),
            ErrorKind::MalformedLength
        ));
    }

    #[test]
    fn encode() {
        fn step(len: usize, expected: &[u8]) {
            let mut target = Vec::new();
            Length::write_definite(len, &mut target).unwrap();
            assert_eq!(target.as_slice(), expected);
            assert_eq!(target.len(), Length::definite_len(len));
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(0xdead, b"\x82\xde\xad");
        step(0x01_0000, b"\x83\x01\x00\x00");
    }

    #[test]
    fn minimal_round_trip() {
        for len in [0, 1, 0x7f, 0x80, 0xff, 0x100, 0xffff, 0x10000] {
            let mut target = Vec::new();
            Length::write_definite(len, &mut target).unwrap();
            assert_eq!(
                split(&target, true), (Length::Definite(len), target.len())
            );
        }
    }
}
