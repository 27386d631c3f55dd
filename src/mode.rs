//! The encoding rules mode.

/// The encoding rules to apply when decoding.
///
/// BER allows alternative encodings for the same value: non-minimal
/// length octets, the high-tag-number form for small tag numbers, and
/// indefinite length constructed values. DER forbids all of these, so
/// every value has exactly one valid encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing non-minimal tag and
    /// length encodings as well as indefinite length values.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding everywhere.
    Der,
}

impl Mode {
    /// Returns whether the mode only accepts canonical encodings.
    pub fn is_strict(self) -> bool {
        matches!(self, Mode::Der)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Der
    }
}
