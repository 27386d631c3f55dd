//! Decoding BER and DER encoded data.
//!
//! Decoding starts from a [`Context`][crate::Context]: use
//! [`Context::decode_slice`][crate::Context::decode_slice] for data that
//! is fully available in memory, [`StreamDecoder`] for input arriving in
//! arbitrary fragments, and [`ReadDecoder`] to pull from anything
//! implementing `std::io::Read`.

pub use self::error::{DecodeError, ErrorKind, Pos};
pub use self::stream::{ReadDecoder, StreamDecoder};

pub mod error;

mod parser;
mod stream;

pub(crate) use self::parser::parse_top;
