#![no_main]

use libfuzzer_sys::fuzz_target;
use dertree::Context;

// First input byte selects the mode, the rest is decoded as a sequence
// of concatenated values, skipping one byte after any failure.
fuzz_target!(|data: &[u8]| {
    let (ctl, mut input) = match data.split_first() {
        Some((ctl, input)) => (*ctl, input),
        None => return,
    };
    let mut ctx = Context::new();
    ctx.set_strict(ctl & 1 != 0);

    while !input.is_empty() {
        match ctx.decode_slice(input) {
            Ok(Some((value, consumed))) => {
                assert_ne!(consumed, 0);
                assert!(consumed <= input.len());

                let encoded = value.to_vec();
                assert!(!encoded.is_empty());
                if ctx.is_strict() {
                    // Strict DER has a unique encoding.
                    assert_eq!(encoded.as_slice(), &input[..consumed]);
                }

                // The canonical form must decode under strict rules to
                // an equal tree.
                let (again, used) = Context::new()
                    .decode_slice(&encoded)
                    .expect("re-decode failed")
                    .expect("re-decode empty");
                assert_eq!(used, encoded.len());
                assert_eq!(again, value);

                input = &input[consumed..];
            }
            Ok(None) => break,
            Err(err) => {
                assert_ne!(err.pos().to_usize(), 0);
                input = &input[1..];
            }
        }
    }
});
