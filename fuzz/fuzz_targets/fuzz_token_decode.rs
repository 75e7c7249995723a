#![no_main]

use datafutures_crypto::{MarkerCodec, SealedCodec, ValueCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let sealed = SealedCodec::new(b"fuzz").expect("non-empty secret");

    // Decoding arbitrary tokens fails cleanly and never yields a non-finite value.
    for codec in [&MarkerCodec as &dyn ValueCodec, &sealed] {
        if let Ok(value) = codec.decode(token) {
            assert!(value.is_finite());
        }
    }

    // Any finite value derived from the input round-trips exactly.
    if data.len() >= 8 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&data[..8]);
        let value = f64::from_le_bytes(raw);
        if value.is_finite() {
            for codec in [&MarkerCodec as &dyn ValueCodec, &sealed] {
                let token = codec.encode(value).expect("finite values encode");
                assert_eq!(codec.decode(&token).expect("own tokens decode"), value);
            }
        }
    }
});
