#![no_main]

use libfuzzer_sys::fuzz_target;
use dertree::Context;

// Decoding an input fed to the stream decoder in fragments must yield
// the same values as decoding it as one flat buffer, for any fragment
// size. The first input byte selects mode and fragment size.
fuzz_target!(|data: &[u8]| {
    let (ctl, input) = match data.split_first() {
        Some((ctl, input)) => (*ctl, input),
        None => return,
    };
    let mut ctx = Context::new();
    ctx.set_strict(ctl & 1 != 0);
    let step = usize::from(ctl >> 1).max(1);

    // Flat reference decode, stopping at the first error.
    let mut flat = Vec::new();
    let mut tail = input;
    while let Ok(Some((value, consumed))) = ctx.decode_slice(tail) {
        assert_ne!(consumed, 0);
        flat.push(value);
        tail = &tail[consumed..];
    }

    // The same input again, fed in fragments.
    let mut streamed = Vec::new();
    let mut stream = ctx.stream_decoder();
    let mut failed = false;
    for chunk in input.chunks(step) {
        stream.feed(chunk);
        loop {
            match stream.next_value() {
                Ok(Some(value)) => streamed.push(value),
                Ok(None) => break,
                Err(_) => {
                    failed = true;
                    break
                }
            }
        }
        if failed {
            break
        }
    }
    if !failed {
        stream.end();
        while let Ok(Some(value)) = stream.next_value() {
            streamed.push(value);
        }
    }

    assert_eq!(flat, streamed);
});
