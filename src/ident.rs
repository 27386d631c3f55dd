//! The identifier octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use smallvec::SmallVec;
use crate::decode::ErrorKind;
use crate::encode::Target;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// Each encoded value starts with a sequence of one or more octets called
/// the _identifier octets._ They encode the tag of the value as well as
/// whether the value uses primitive or constructed encoding. The `Tag`
/// type represents the tag only; whether a value is constructed is kept
/// alongside it in [`Value`][crate::Value].
///
/// A tag consists of a class, represented by the [`Class`] enum, and a
/// number within that class. Numbers up to 30 are encoded directly in the
/// first identifier octet; larger numbers use the high-tag-number form
/// with base 128 continuation octets.
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u64`. This should be more
/// than enough in practice. Input using more continuation octets than a
/// `u64` can hold is rejected as malformed.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    /// The class of the tag.
    class: Class,

    /// The number of the tag.
    number: u64,
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690.
///
impl Tag {
    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::new(Class::Universal, 1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::new(Class::Universal, 2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::new(Class::Universal, 3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::new(Class::Universal, 4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::new(Class::Universal, 5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::new(Class::Universal, 6);

    /// The tag for the ObjectDescriptor type, UNIVERSAL 7.
    pub const OBJECT_DESCRIPTOR: Self = Self::new(Class::Universal, 7);

    /// The tag for the EXTERNAL and Instance-of types, UNIVERSAL 8.
    pub const EXTERNAL: Self = Self::new(Class::Universal, 8);

    /// The tag for the REAL type, UNIVERSAL 9.
    pub const REAL: Self = Self::new(Class::Universal, 9);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::new(Class::Universal, 10);

    /// The tag for the EMBEDDED PDV type, UNIVERSAL 11.
    pub const EMBEDDED_PDV: Self = Self::new(Class::Universal, 11);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Self::new(Class::Universal, 12);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Self::new(Class::Universal, 13);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::new(Class::Universal, 16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::new(Class::Universal, 17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::new(Class::Universal, 18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::new(Class::Universal, 19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::new(Class::Universal, 20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Self::new(Class::Universal, 21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::new(Class::Universal, 22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::new(Class::Universal, 23);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::new(Class::Universal, 24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::new(Class::Universal, 25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::new(Class::Universal, 26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::new(Class::Universal, 27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::new(Class::Universal, 28);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::new(Class::Universal, 30);
}

impl Tag {
    /// Creates a tag from a class and a number.
    pub const fn new(class: Class, number: u64) -> Self {
        Self { class, number }
    }

    /// Creates a new tag in the universal class with the given number.
    pub const fn universal(number: u64) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given number.
    pub const fn application(number: u64) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in the context specific class with the given
    /// number.
    pub const fn ctx(number: u64) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given number.
    pub const fn private(number: u64) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u64 {
        self.number
    }
}

/// # Decoding and Encoding
///
impl Tag {
    /// Splits the identifier octets off the beginning of `data`.
    ///
    /// Returns the tag, whether the value is constructed, and the number
    /// of octets used. On error, returns the error kind and the number of
    /// octets examined before the error was detected.
    pub(crate) fn split_from(
        data: &[u8], strict: bool,
    ) -> Result<(Self, bool, usize), (ErrorKind, usize)> {
        let first = match data.first() {
            Some(first) => *first,
            None => return Err((ErrorKind::Incomplete, 0)),
        };

        // The first identifier octet of a regular value is never zero.
        // UNIVERSAL 0 is reserved for the end-of-contents marker which
        // is handled before we ever get here.
        if first == 0 {
            return Err((ErrorKind::MalformedTag, 1))
        }

        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;

        if first & 0x1f != 0x1f {
            return Ok((
                Self::new(class, (first & 0x1f).into()), constructed, 1
            ))
        }

        // High-tag-number form: base 128, most significant digit first,
        // bit 8 of every octet except the last set to 1.
        let mut number = 0u64;
        let mut idx = 1;
        loop {
            let octet = match data.get(idx) {
                Some(octet) => *octet,
                None => return Err((ErrorKind::Incomplete, idx)),
            };
            if idx == 1 && octet == 0x80 {
                // A padded leading octet is ambiguous even in BER.
                return Err((ErrorKind::MalformedTag, 2))
            }
            if number >> 57 != 0 {
                // The number won’t fit into a u64.
                return Err((ErrorKind::MalformedTag, idx + 1))
            }
            number = number << 7 | u64::from(octet & 0x7f);
            idx += 1;
            if octet & 0x80 == 0 {
                break
            }
        }

        if strict && number < 0x1f {
            return Err((ErrorKind::NonMinimalTag, idx))
        }

        Ok((Self::new(class, number), constructed, idx))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub(crate) fn identifier_len(self) -> usize {
        if self.number <= 0x1e {
            1
        }
        else {
            1 + base128_len(self.number)
        }
    }

    /// Writes the identifier octets to a target.
    ///
    /// If `constructed` is `true`, the encoded identifier will signal a
    /// value in constructed encoding and primitive encoding otherwise.
    /// The octets are always the minimal form for the tag number.
    pub(crate) fn write_identifier<T: Target>(
        self, constructed: bool, target: &mut T,
    ) -> Result<(), T::Error> {
        let mut buf = SmallVec::<[u8; 12]>::new();
        let mut first = self.class.into_u8();
        if constructed {
            first |= 0x20
        }
        if self.number <= 0x1e {
            buf.push(first | self.number as u8);
        }
        else {
            buf.push(first | 0x1f);
            let mut shift = (base128_len(self.number) - 1) * 7;
            while shift > 0 {
                buf.push(((self.number >> shift) & 0x7f) as u8 | 0x80);
                shift -= 7;
            }
            buf.push((self.number & 0x7f) as u8);
        }
        target.write_all(&buf)
    }
}

/// Returns the number of base 128 digits needed for `number`.
fn base128_len(number: u64) -> usize {
    (64 - number.leading_zeros() as usize + 6) / 7
}


//--- Display and Debug

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::OBJECT_DESCRIPTOR => write!(f, "ObjectDescriptor"),
            Tag::EXTERNAL => write!(f, "EXTERNAL"),
            Tag::REAL => write!(f, "REAL"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::EMBEDDED_PDV => write!(f, "EMBEDDED PDV"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::RELATIVE_OID => write!(f, "RELATIVE-OID"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::TELETEX_STRING => write!(f, "TeletexString"),
            Tag::VIDEOTEX_STRING => write!(f, "VideotexString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GRAPHIC_STRING => write!(f, "GraphicString"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            Tag::UNIVERSAL_STRING => write!(f, "UniversalString"),
            Tag::BMP_STRING => write!(f, "BMPString"),
            tag => {
                match tag.class {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number)
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The class lives in the two most significant bits of the first
/// identifier octet.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// The universal class, bits 00.
    Universal,

    /// The application class, bits 01.
    Application,

    /// The context specific class, bits 10.
    Context,

    /// The private class, bits 11.
    Private,
}

impl Class {
    /// Returns the class encoded in the first identifier octet.
    pub(crate) const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private,
        }
    }

    /// Returns the class bits positioned for the first identifier octet.
    pub(crate) const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================
