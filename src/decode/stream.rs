//! Incremental decoding of byte streams.
//!
//! This is a private module. Its public items are re-exported by the
//! parent module.

use std::io;
use bytes::{Buf, BytesMut};
use crate::context::Context;
use crate::value::Value;
use super::error::{DecodeError, ErrorKind};
use super::parser;


//------------ StreamDecoder -------------------------------------------------

/// A resumable decoder fed by the caller in arbitrary fragments.
///
/// The decoder accumulates whatever fragments arrive via
/// [`feed`][Self::feed] and hands out one completed top-level value at a
/// time from [`next_value`][Self::next_value]. A value that is not yet
/// complete simply stays pending: the decoder suspends without losing or
/// re-consuming octets, no matter how the input is fragmented.
///
/// Once the caller knows no more input will arrive, it signals this via
/// [`end`][Self::end]. From then on a pending partial value is reported
/// as an error rather than as something worth waiting for.
///
/// The sequence of values produced is the same for every fragmentation
/// of the same input, and identical to decoding the concatenated input
/// as one flat buffer.
pub struct StreamDecoder {
    /// The context supplying mode and depth limit.
    ctx: Context,

    /// Octets received but not yet consumed by a completed value.
    buf: BytesMut,

    /// The number of octets consumed by completed values so far.
    consumed: usize,

    /// Has the caller signalled end-of-input?
    ended: bool,
}

impl StreamDecoder {
    /// Creates a new stream decoder using the given context.
    pub(crate) fn new(ctx: Context) -> Self {
        Self {
            ctx,
            buf: BytesMut::new(),
            consumed: 0,
            ended: false,
        }
    }

    /// Hands a fragment of input to the decoder.
    ///
    /// # Panics
    ///
    /// Panics if called after [`end`][Self::end].
    pub fn feed(&mut self, data: &[u8]) {
        assert!(!self.ended, "feed after end of input");
        self.buf.extend_from_slice(data);
    }

    /// Signals that no more input will arrive.
    pub fn end(&mut self) {
        self.ended = true;
    }

    /// Returns whether end-of-input has been signalled.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Returns whether the input has ended and nothing is left pending.
    pub fn is_exhausted(&self) -> bool {
        self.ended && self.buf.is_empty()
    }

    /// Returns the number of octets consumed by completed values.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns the number of octets received but not yet consumed.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Tries to decode the next value from the pending octets.
    ///
    /// Returns `Ok(Some(_))` with the next completed value, or
    /// `Ok(None)` if there is no complete value in the pending octets,
    /// which, after [`end`][Self::end] was called, means the input is
    /// cleanly exhausted. A pending partial value after `end` is an
    /// error, as is any malformed value at any time: a cleanly
    /// malformed value is never treated as “need more data”.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        match parser::parse_top(&self.ctx, &self.buf, self.ended) {
            Ok(None) => Ok(None),
            Ok(Some((value, used))) => {
                self.buf.advance(used);
                self.consumed += used;
                Ok(Some(value))
            }
            Err(err) if err.is_incomplete() && !self.ended => Ok(None),
            Err(err) => Err(err.advanced(self.consumed)),
        }
    }
}


//------------ ReadDecoder ---------------------------------------------------

/// A decoder pulling its input from a `std::io::Read`.
///
/// This drives a [`StreamDecoder`] from any reader, a buffered file
/// stream or a raw file descriptor or socket alike. Reads happen in
/// chunks of whatever size the reader delivers; short reads merely leave
/// the inner decoder suspended until the next read returns more octets.
/// The decoder itself never opens or closes the underlying transport.
pub struct ReadDecoder<R> {
    /// The reader supplying the input.
    reader: R,

    /// The inner resumable decoder.
    stream: StreamDecoder,
}

impl<R: io::Read> ReadDecoder<R> {
    /// Creates a new decoder reading from `reader`.
    pub(crate) fn new(ctx: Context, reader: R) -> Self {
        Self { reader, stream: StreamDecoder::new(ctx) }
    }

    /// Decodes the next value from the reader.
    ///
    /// Blocks on the underlying read as necessary. Returns `Ok(None)`
    /// on a clean end of input with nothing pending.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        loop {
            if let Some(value) = self.stream.next_value()? {
                return Ok(Some(value))
            }
            if self.stream.has_ended() {
                return Ok(None)
            }
            let mut chunk = [0u8; 4096];
            let n = match self.reader.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    continue
                }
                Err(err) => {
                    return Err(DecodeError::new(
                        ErrorKind::Io(err), self.stream.consumed()
                    ))
                }
            };
            if n == 0 {
                self.stream.end();
            }
            else {
                self.stream.feed(&chunk[..n]);
            }
        }
    }

    /// Returns the number of octets consumed by completed values.
    pub fn consumed(&self) -> usize {
        self.stream.consumed()
    }

    /// Converts the decoder back into its reader.
    ///
    /// Octets already read from the reader but not consumed by a
    /// completed value are lost.
    pub fn into_reader(self) -> R {
        self.reader
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::ident::Tag;
    use super::*;

    fn ber() -> Context {
        let mut ctx = Context::new();
        ctx.set_strict(false);
        ctx
    }

    /// Decodes `data` as one flat buffer, stopping at the first error.
    fn flat_values(ctx: &Context, mut data: &[u8]) -> Vec<Value> {
        let mut res = Vec::new();
        while let Ok(Some((value, used))) = ctx.decode_slice(data) {
            res.push(value);
            data = &data[used..];
        }
        res
    }

    /// Decodes `data` fed in fragments of `step` octets.
    fn streamed_values(
        ctx: &Context, data: &[u8], step: usize,
    ) -> Vec<Value> {
        let mut stream = ctx.stream_decoder();
        let mut res = Vec::new();
        for chunk in data.chunks(step) {
            stream.feed(chunk);
            loop {
                match stream.next_value() {
                    Ok(Some(value)) => res.push(value),
                    Ok(None) => break,
                    Err(_) => return res,
                }
            }
        }
        stream.end();
        while let Ok(Some(value)) = stream.next_value() {
            res.push(value);
        }
        res
    }

    #[test]
    fn streaming_equivalence() {
        let data: &[u8] =
            b"\x30\x06\x02\x01\x2a\x05\x00\x04\x04\x01\x02\x03\x04\
              \x30\x80\x05\x00\x00\x00";
        let ctx = ber();
        let flat = flat_values(&ctx, data);
        assert_eq!(flat.len(), 3);
        for step in 1..=data.len() {
            assert_eq!(
                streamed_values(&ctx, data, step), flat,
                "fragment size {}", step
            );
        }
    }

    #[test]
    fn suspends_mid_value() {
        let ctx = Context::new();
        let mut stream = ctx.stream_decoder();
        stream.feed(b"\x04\x04\x01\x02");
        assert!(stream.next_value().unwrap().is_none());
        assert_eq!(stream.pending(), 4);
        assert_eq!(stream.consumed(), 0);
        stream.feed(b"\x03\x04");
        let value = stream.next_value().unwrap().unwrap();
        assert_eq!(value.bytes().unwrap().as_ref(), b"\x01\x02\x03\x04");
        assert_eq!(stream.consumed(), 6);
        assert_eq!(stream.pending(), 0);
    }

    #[test]
    fn clean_end() {
        let ctx = Context::new();
        let mut stream = ctx.stream_decoder();
        stream.feed(b"\x05\x00");
        assert!(stream.next_value().unwrap().is_some());
        stream.end();
        assert!(stream.next_value().unwrap().is_none());
        assert!(stream.is_exhausted());
    }

    #[test]
    fn partial_value_at_end_is_an_error() {
        let ctx = Context::new();
        let mut stream = ctx.stream_decoder();
        stream.feed(b"\x04\x04\x01");
        assert!(stream.next_value().unwrap().is_none());
        stream.end();
        let err = stream.next_value().unwrap_err();
        assert!(err.is_incomplete());
        assert_ne!(err.pos().to_usize(), 0);
    }

    #[test]
    fn malformed_is_not_need_more_data() {
        // A malformed value fails even while the stream is still open.
        let ctx = Context::new();
        let mut stream = ctx.stream_decoder();
        stream.feed(b"\x04\xff");
        assert!(matches!(
            stream.next_value().unwrap_err().kind(),
            ErrorKind::MalformedLength
        ));
    }

    #[test]
    fn error_positions_are_stream_relative() {
        let ctx = Context::new();
        let mut stream = ctx.stream_decoder();
        stream.feed(b"\x05\x00\x04\xff");
        assert!(stream.next_value().unwrap().is_some());
        let err = stream.next_value().unwrap_err();
        // Two octets consumed by the NULL, two examined of the bad value.
        assert_eq!(err.pos().to_usize(), 4);
    }

    #[test]
    fn read_decoder() {
        let data: &[u8] = b"\x30\x03\x02\x01\x2a\x05\x00";
        let mut decoder = Context::new().read_decoder(data);
        let first = decoder.next_value().unwrap().unwrap();
        assert_eq!(first.tag(), Tag::SEQUENCE);
        let second = decoder.next_value().unwrap().unwrap();
        assert_eq!(second.tag(), Tag::NULL);
        assert!(decoder.next_value().unwrap().is_none());
        assert_eq!(decoder.consumed(), 7);
    }

    #[test]
    fn read_decoder_short_reads() {
        /// A reader that delivers one octet per call.
        struct Trickle<'a>(&'a [u8]);

        impl<'a> io::Read for Trickle<'a> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.0.split_first() {
                    Some((&first, rest)) => {
                        buf[0] = first;
                        self.0 = rest;
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
        }

        let data: &[u8] = b"\x30\x06\x02\x01\x2a\x04\x01\xfe\x05\x00";
        let mut decoder = Context::new().read_decoder(Trickle(data));
        let first = decoder.next_value().unwrap().unwrap();
        assert_eq!(first.children().unwrap().len(), 2);
        let second = decoder.next_value().unwrap().unwrap();
        assert_eq!(second.tag(), Tag::NULL);
        assert!(decoder.next_value().unwrap().is_none());
        assert_eq!(decoder.consumed(), data.len());
    }
}
