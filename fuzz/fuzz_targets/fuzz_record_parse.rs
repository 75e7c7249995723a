#![no_main]

use datafutures_index::document::{decode_index, decode_record, encode_record};
use datafutures_types::FutureId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary store payloads must never panic the readers.
    let _ = decode_index("future_keys", data);

    // A record that parses must survive a write/read cycle unchanged.
    if let Ok(record) = decode_record("future_x", FutureId::new("x"), data, 30) {
        let bytes = encode_record(&record).expect("parsed records re-encode");
        let again = decode_record("future_x", FutureId::new("x"), &bytes, 30)
            .expect("re-encoded record parses");
        assert_eq!(again, record);
    }
});
