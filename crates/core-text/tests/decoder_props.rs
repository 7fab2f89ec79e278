//! Property tests for the incremental UTF-8 decoder.

use core_text::{Decoded, Utf8Decoder};
use proptest::prelude::*;

fn decode_stream(bytes: &[u8]) -> Vec<(char, usize)> {
    let mut dec = Utf8Decoder::new();
    let mut out = Vec::new();
    for &b in bytes {
        if let Decoded::Rune(r, n) = dec.add(b) {
            out.push((r, n));
        }
    }
    out
}

proptest! {
    /// Feeding any valid UTF-8 encoding byte-at-a-time reassembles the
    /// original string exactly, and the reported sizes sum to the byte
    /// length.
    #[test]
    fn valid_streams_round_trip(s in ".*") {
        let out = decode_stream(s.as_bytes());
        let reassembled: String = out.iter().map(|&(r, _)| r).collect();
        prop_assert_eq!(&reassembled, &s);
        let total: usize = out.iter().map(|&(_, n)| n).sum();
        prop_assert_eq!(total, s.len());
    }

    /// Arbitrary byte soup never panics and every emitted rune is either a
    /// valid scalar or the replacement character; an ASCII byte fed after
    /// the stream always decodes immediately (the machine resets).
    #[test]
    fn arbitrary_bytes_never_wedge(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut dec = Utf8Decoder::new();
        for &b in &bytes {
            let _ = dec.add(b);
        }
        // A malformed tail may leave a sequence open; an invalid
        // continuation resolves it to one replacement, after which the
        // probe byte must decode as itself.
        match dec.add(b'!') {
            Decoded::Rune('!', 1) => {}
            Decoded::Rune(r, 1) => {
                prop_assert_eq!(r, char::REPLACEMENT_CHARACTER);
                prop_assert_eq!(dec.add(b'!'), Decoded::Rune('!', 1));
            }
            other => prop_assert!(false, "unexpected outcome: {:?}", other),
        }
    }
}
