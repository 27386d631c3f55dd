//! Encoding object trees in DER.
//!
//! Encoding is driven from [`Value`]: [`Value::write_encoded`] writes to
//! any [`Target`], [`Value::write_into`] to any `std::io::Write`, and
//! [`Value::to_vec`] produces a fresh vector. The output is always the
//! canonical DER form with minimal identifier and length octets and
//! definite lengths throughout, no matter which rules the tree was
//! originally decoded under.
//!
//! Sizes are computed bottom-up before anything is written, since the
//! length octets of a constructed value depend on the total encoded
//! size of its children. A failed write to an IO target may leave
//! partial output in the writer but never reports success for it.

pub use self::target::{IoTarget, Target};

mod target;

use std::io;
use crate::length::Length;
use crate::value::{Content, Value};


/// # Encoding
///
impl Value {
    /// Writes the canonical DER encoding of the value to a target.
    pub fn write_encoded<T: Target>(
        &self, target: &mut T,
    ) -> Result<(), T::Error> {
        self.tag().write_identifier(self.is_constructed(), target)?;
        Length::write_definite(self.content_len(), target)?;
        match self.content() {
            Content::Primitive(bytes) => target.write_all(bytes),
            Content::Constructed(children) => {
                for child in children {
                    child.write_encoded(target)?;
                }
                Ok(())
            }
        }
    }

    /// Writes the canonical DER encoding of the value to a writer.
    pub fn write_into<W: io::Write>(&self, writer: W) -> io::Result<()> {
        self.write_encoded(&mut IoTarget::new(writer))
    }

    /// Returns the canonical DER encoding of the value as a vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(self.encoded_len());
        match self.write_encoded(&mut res) {
            Ok(()) => res,
            Err(err) => match err {}
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::context::Context;
    use crate::ident::Tag;
    use super::*;

    #[test]
    fn encode_primitive() {
        let value = Value::primitive(
            Tag::OCTET_STRING, &b"\x01\x02\x03\x04"[..]
        );
        assert_eq!(value.to_vec(), b"\x04\x04\x01\x02\x03\x04");
    }

    #[test]
    fn encode_constructed() {
        let value = Value::constructed(Tag::SEQUENCE, vec![
            Value::primitive(Tag::INTEGER, &b"\x2a"[..]),
            Value::primitive(Tag::NULL, &b""[..]),
        ]);
        assert_eq!(value.to_vec(), b"\x30\x06\x02\x01\x2a\x05\x00");
        assert_eq!(value.to_vec().len(), value.encoded_len());
    }

    #[test]
    fn encode_long_form_length() {
        let value = Value::primitive(Tag::OCTET_STRING, vec![0xabu8; 200]);
        let encoded = value.to_vec();
        assert_eq!(&encoded[..3], b"\x04\x81\xc8");
        assert_eq!(encoded.len(), 203);
    }

    #[test]
    fn write_into() {
        let value = Value::primitive(Tag::NULL, &b""[..]);
        let mut buf = Vec::new();
        value.write_into(&mut buf).unwrap();
        assert_eq!(buf, b"\x05\x00");
    }

    #[test]
    fn round_trip_strict() {
        // Strict DER input re-encodes to the identical octets.
        let inputs: &[&[u8]] = &[
            b"\x30\x00",
            b"\x04\x04\x01\x02\x03\x04",
            b"\x30\x06\x02\x01\x2a\x05\x00",
            b"\x30\x08\x30\x03\x02\x01\x00\x01\x01\xff",
            b"\x5f\x81\x48\x01\xfe",
        ];
        let ctx = Context::new();
        for input in inputs {
            let (value, consumed) = ctx.decode_slice(input).unwrap().unwrap();
            assert_eq!(consumed, input.len());
            assert_eq!(
                value.to_vec().as_slice(), *input,
                "round trip failed for {:02x?}", input
            );
        }
    }

    #[test]
    fn canonicalizes_ber() {
        let mut ctx = Context::new();
        ctx.set_strict(false);

        // Non-minimal length re-encodes to the short form.
        let (value, _) = ctx.decode_slice(
            b"\x04\x81\x05\x01\x02\x03\x04\x05"
        ).unwrap().unwrap();
        assert_eq!(value.to_vec(), b"\x04\x05\x01\x02\x03\x04\x05");

        // Indefinite length re-encodes to the definite form.
        let (value, _) = ctx.decode_slice(
            b"\x30\x80\x02\x01\x2a\x00\x00"
        ).unwrap().unwrap();
        assert_eq!(value.to_vec(), b"\x30\x03\x02\x01\x2a");

        // Non-minimal tag re-encodes to the low form.
        let (value, _) = ctx.decode_slice(
            b"\x1f\x04\x01\xaa"
        ).unwrap().unwrap();
        assert_eq!(value.to_vec(), b"\x04\x01\xaa");

        // The canonical form then round-trips under strict rules.
        let canonical = value.to_vec();
        let (again, consumed) = Context::new().decode_slice(
            &canonical
        ).unwrap().unwrap();
        assert_eq!(consumed, canonical.len());
        assert_eq!(again, value);
    }
}
