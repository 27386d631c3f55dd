//! Errors happening while decoding.

use std::{fmt, io, ops};


//------------ ErrorKind -----------------------------------------------------

/// The kind of error encountered while decoding.
///
/// Apart from [`Incomplete`][Self::Incomplete], every kind is fatal for
/// the decode attempt that produced it. The strict-mode-only kinds
/// [`NonMinimalTag`][Self::NonMinimalTag],
/// [`NonMinimalLength`][Self::NonMinimalLength], and
/// [`IndefiniteLength`][Self::IndefiniteLength] are never produced when
/// decoding under BER rules.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The data ended in the middle of a value.
    ///
    /// On a flat buffer this is final. The streaming decoder treats it
    /// as “need more data” and retries once more input has arrived, so
    /// it only surfaces from a stream after end-of-input was signalled.
    #[error("unexpected end of data")]
    Incomplete,

    /// The identifier octets violate the BER grammar.
    #[error("malformed identifier octets")]
    MalformedTag,

    /// The length octets violate the BER grammar.
    #[error("malformed length octets")]
    MalformedLength,

    /// The high-tag-number form was used for a number below 31.
    #[error("non-minimal identifier octets")]
    NonMinimalTag,

    /// A definite length was encoded in more octets than necessary.
    #[error("non-minimal length octets")]
    NonMinimalLength,

    /// A constructed value used the indefinite length form.
    #[error("indefinite length not allowed")]
    IndefiniteLength,

    /// A constructed value’s children end short of its declared length.
    #[error("constructed value shorter than its declared length")]
    TruncatedConstructed,

    /// A child value crosses the end of its constructed value.
    #[error("child value crosses the end of its constructed value")]
    OverrunConstructed,

    /// An indefinite length value never found its end-of-contents marker.
    #[error("indefinite length value without end-of-contents marker")]
    UnterminatedIndefinite,

    /// The nesting depth exceeded the configured limit.
    #[error("nesting depth exceeds the configured limit")]
    TooDeeplyNested,

    /// Reading from the underlying source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ErrorKind {
    /// Returns whether more data could turn this error into a success.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ErrorKind::Incomplete)
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error combines the [`ErrorKind`] with the position of the data
/// up to which the decoder had examined input when the error was
/// detected. The position is never zero unless the input itself was
/// empty, so a caller working through a stream of concatenated values
/// can always make forward progress.
#[derive(Debug, thiserror::Error)]
#[error("{kind} at position {pos}")]
pub struct DecodeError {
    /// The kind of error.
    #[source]
    kind: ErrorKind,

    /// The number of octets examined when the error was detected.
    pos: Pos,
}

impl DecodeError {
    /// Creates a new decode error from a kind and a position.
    pub(crate) fn new(kind: impl Into<ErrorKind>, pos: impl Into<Pos>) -> Self {
        Self { kind: kind.into(), pos: pos.into() }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the position at which the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns whether more data could turn this error into a success.
    pub fn is_incomplete(&self) -> bool {
        self.kind.is_incomplete()
    }

    /// Returns the same error with its position shifted right by `by`.
    ///
    /// Used by the streaming decoder to report positions relative to the
    /// start of the overall stream rather than its internal buffer.
    pub(crate) fn advanced(self, by: usize) -> Self {
        Self { kind: self.kind, pos: self.pos + Pos::from(by) }
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// Values of this type can only be used for diagnostics and for forward
/// progress decisions. This is why we use a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as a plain number of octets.
    pub fn to_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
