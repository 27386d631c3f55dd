//! Decoding contexts.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::io;
use crate::decode::{self, DecodeError, ReadDecoder, StreamDecoder};
use crate::mode::Mode;
use crate::value::Value;


//------------ Context -------------------------------------------------------

/// The configuration for decoding data.
///
/// A context selects the encoding rules via [`Mode`] and bounds the
/// nesting depth of decoded trees. It holds no decode state of its own:
/// every decode call works on data owned by the caller and returns a
/// tree owned by the caller, so independent contexts can decode
/// concurrently from any number of threads. Since a context is never
/// mutated while decoding, even a single shared context can.
///
/// A fresh context uses DER rules. Use [`set_strict`][Self::set_strict]
/// or [`set_mode`][Self::set_mode] to switch to BER before decoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Context {
    /// The encoding rules to apply.
    mode: Mode,

    /// The maximum allowed nesting depth.
    max_depth: usize,
}

impl Context {
    /// The nesting depth limit of a newly created context.
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// Creates a new context using DER rules.
    pub fn new() -> Self {
        Self::with_mode(Mode::Der)
    }

    /// Creates a new context using the given rules.
    pub fn with_mode(mode: Mode) -> Self {
        Self { mode, max_depth: Self::DEFAULT_MAX_DEPTH }
    }

    /// Returns the encoding rules the context applies.
    pub fn mode(self) -> Mode {
        self.mode
    }

    /// Sets the encoding rules the context applies.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Returns whether the context only accepts canonical encodings.
    pub fn is_strict(self) -> bool {
        self.mode.is_strict()
    }

    /// Selects between strict DER and relaxed BER rules.
    pub fn set_strict(&mut self, strict: bool) {
        self.mode = if strict { Mode::Der } else { Mode::Ber };
    }

    /// Returns the maximum allowed nesting depth.
    pub fn max_depth(self) -> usize {
        self.max_depth
    }

    /// Sets the maximum allowed nesting depth.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Decodes one top-level value off the beginning of `data`.
    ///
    /// Returns the value and the number of octets consumed for it, which
    /// may be less than `data.len()` if further values follow. Callers
    /// decode a sequence of concatenated values by advancing the slice
    /// by the consumed count and calling again. Empty input returns
    /// `Ok(None)`.
    ///
    /// On error, [`DecodeError::pos`] reports how many octets were
    /// examined, which is never zero for nonempty input.
    pub fn decode_slice(
        self, data: &[u8],
    ) -> Result<Option<(Value, usize)>, DecodeError> {
        decode::parse_top(&self, data, true)
    }

    /// Creates a resumable decoder fed by the caller.
    pub fn stream_decoder(self) -> StreamDecoder {
        StreamDecoder::new(self)
    }

    /// Creates a decoder pulling its input from `reader`.
    pub fn read_decoder<R: io::Read>(self, reader: R) -> ReadDecoder<R> {
        ReadDecoder::new(self, reader)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}


//============ Tests =========================================================
