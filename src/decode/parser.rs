//! The TLV parser.
//!
//! This is a private module. The entry point [`parse_top`] is used by
//! [`Context`][crate::Context] for flat buffers and by the streaming
//! decoder for its internal buffer.

use bytes::Bytes;
use crate::context::Context;
use crate::ident::Tag;
use crate::length::Length;
use crate::value::Value;
use super::error::{DecodeError, ErrorKind};


//------------ parse_top -----------------------------------------------------

/// Parses one top-level value off the beginning of `data`.
///
/// Returns the value and the number of octets consumed for it, or
/// `Ok(None)` if `data` is empty. The `eof` flag states whether `data`
/// is all the input there will ever be: with it set, running out of
/// octets produces a final error instead of
/// [`Incomplete`][ErrorKind::Incomplete].
pub(crate) fn parse_top(
    ctx: &Context, data: &[u8], eof: bool,
) -> Result<Option<(Value, usize)>, DecodeError> {
    if data.is_empty() {
        return Ok(None)
    }
    let mut parser = Parser {
        data,
        pos: 0,
        strict: ctx.is_strict(),
        max_depth: ctx.max_depth(),
        eof,
    };
    let value = parser.parse_value(0)?;
    Ok(Some((value, parser.pos)))
}


//------------ Parser --------------------------------------------------------

/// The state of a single parse run.
struct Parser<'a> {
    /// The data to parse.
    ///
    /// While parsing the children of a definite length constructed
    /// value, this is temporarily narrowed to the value’s content
    /// window so that children cannot read across the window boundary.
    data: &'a [u8],

    /// The current position in `data`.
    pos: usize,

    /// Are we decoding under DER rules?
    strict: bool,

    /// The maximum allowed nesting depth.
    max_depth: usize,

    /// Is `data` all the input there will ever be?
    eof: bool,
}

impl<'a> Parser<'a> {
    /// Returns the not-yet-parsed rest of the data.
    fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Parses the value starting at the current position.
    fn parse_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let (tag, constructed) = self.take_identifier()?;
        match self.take_length()? {
            Length::Definite(len) => {
                if constructed {
                    self.parse_definite_constructed(tag, len, depth)
                }
                else {
                    self.parse_primitive(tag, len)
                }
            }
            Length::Indefinite => {
                if !constructed {
                    // X.690 only allows the indefinite form for
                    // constructed values.
                    return Err(DecodeError::new(
                        ErrorKind::MalformedLength, self.pos
                    ))
                }
                if self.strict {
                    return Err(DecodeError::new(
                        ErrorKind::IndefiniteLength, self.pos
                    ))
                }
                self.parse_indefinite_constructed(tag, depth)
            }
        }
    }

    /// Takes the identifier octets at the current position.
    fn take_identifier(&mut self) -> Result<(Tag, bool), DecodeError> {
        match Tag::split_from(self.remaining(), self.strict) {
            Ok((tag, constructed, used)) => {
                self.pos += used;
                Ok((tag, constructed))
            }
            Err((kind, examined)) => {
                Err(DecodeError::new(kind, self.pos + examined))
            }
        }
    }

    /// Takes the length octets at the current position.
    fn take_length(&mut self) -> Result<Length, DecodeError> {
        match Length::split_from(self.remaining(), self.strict) {
            Ok((length, used)) => {
                self.pos += used;
                Ok(length)
            }
            Err((kind, examined)) => {
                Err(DecodeError::new(kind, self.pos + examined))
            }
        }
    }

    /// Parses the content of a primitive value.
    fn parse_primitive(
        &mut self, tag: Tag, len: usize,
    ) -> Result<Value, DecodeError> {
        let end = self.content_end(len)?;
        let content = Bytes::copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(Value::primitive(tag, content))
    }

    /// Parses the children of a definite length constructed value.
    fn parse_definite_constructed(
        &mut self, tag: Tag, len: usize, depth: usize,
    ) -> Result<Value, DecodeError> {
        let end = self.content_end(len)?;
        let full = self.data;
        self.data = &full[..end];
        let res = self.parse_children(end, depth);
        self.data = full;
        match res {
            Ok(children) => Ok(Value::constructed(tag, children)),
            Err(err) if err.is_incomplete() => {
                // The window itself is fully available, so a child that
                // ran out of octets either crossed the window boundary
                // with more data waiting beyond it, or the window ends
                // with the input itself and the last child is simply cut
                // short.
                if end < full.len() {
                    Err(DecodeError::new(
                        ErrorKind::OverrunConstructed, err.pos()
                    ))
                }
                else if self.eof {
                    Err(DecodeError::new(
                        ErrorKind::TruncatedConstructed, err.pos()
                    ))
                }
                else {
                    Err(err)
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Parses children until the current position reaches `end`.
    fn parse_children(
        &mut self, end: usize, depth: usize,
    ) -> Result<Vec<Value>, DecodeError> {
        let mut children = Vec::new();
        while self.pos < end {
            if depth + 1 > self.max_depth {
                return Err(DecodeError::new(
                    ErrorKind::TooDeeplyNested, self.pos
                ))
            }
            children.push(self.parse_value(depth + 1)?);
        }
        Ok(children)
    }

    /// Parses the children of an indefinite length constructed value.
    ///
    /// Children follow until the end-of-contents marker `00 00` appears
    /// at this nesting level.
    fn parse_indefinite_constructed(
        &mut self, tag: Tag, depth: usize,
    ) -> Result<Value, DecodeError> {
        let mut children = Vec::new();
        loop {
            match self.remaining() {
                [] => {
                    return Err(self.unterminated(self.pos))
                }
                [0] => {
                    return Err(self.unterminated(self.pos + 1))
                }
                [0, 0, ..] => {
                    self.pos += 2;
                    break
                }
                [0, _, ..] => {
                    // An end-of-contents marker with a nonzero length.
                    return Err(DecodeError::new(
                        ErrorKind::MalformedLength, self.pos + 2
                    ))
                }
                _ => {
                    if depth + 1 > self.max_depth {
                        return Err(DecodeError::new(
                            ErrorKind::TooDeeplyNested, self.pos
                        ))
                    }
                    children.push(self.parse_value(depth + 1)?);
                }
            }
        }
        Ok(Value::constructed(tag, children))
    }

    /// Returns the end position of a content window of `len` octets.
    ///
    /// Errors out if the window overflows or extends beyond the
    /// available data.
    fn content_end(&self, len: usize) -> Result<usize, DecodeError> {
        let end = match self.pos.checked_add(len) {
            Some(end) => end,
            None => {
                return Err(DecodeError::new(
                    ErrorKind::MalformedLength, self.pos
                ))
            }
        };
        if end > self.data.len() {
            return Err(DecodeError::new(
                ErrorKind::Incomplete, self.data.len()
            ))
        }
        Ok(end)
    }

    /// Returns the error for input ending inside an indefinite value.
    fn unterminated(&self, pos: usize) -> DecodeError {
        DecodeError::new(
            if self.eof {
                ErrorKind::UnterminatedIndefinite
            }
            else {
                ErrorKind::Incomplete
            },
            pos
        )
    }
}


//============ Tests =========================================================
