#![no_main]

use datafutures_authorization::ChallengeBuilder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = std::str::from_utf8(data) else {
        return;
    };
    // Whatever parses must rebuild to a message that parses back the same.
    if let Ok(params) = ChallengeBuilder.parse(message) {
        let rebuilt = ChallengeBuilder.build(&params);
        let reparsed = ChallengeBuilder.parse(&rebuilt).expect("built challenges parse");
        assert_eq!(reparsed, params);
    }
});
