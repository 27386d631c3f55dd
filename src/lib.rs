//! Handling of BER and DER encoded data as object trees.
//!
//! This crate decodes a stream of BER or DER encoded data into a tree of
//! generic [`Value`]s, one node per tag-length-value triple, and encodes
//! such trees back into canonical DER. Decoding starts from a flat byte
//! slice, from anything implementing `std::io::Read`, or from a resumable
//! [`StreamDecoder`][decode::StreamDecoder] that accepts input in arbitrary
//! fragments. All decoding is driven by a [`Context`] which selects the
//! encoding rules via [`Mode`] and bounds the nesting depth.
//!
//! Encoding always produces the canonical DER form, no matter which rules
//! the tree was originally decoded under.

pub use self::context::Context;
pub use self::ident::{Class, Tag};
pub use self::mode::Mode;
pub use self::value::{Content, Value};

pub mod decode;
pub mod encode;

pub mod context;
pub mod ident;
pub mod mode;
pub mod value;

mod length;
