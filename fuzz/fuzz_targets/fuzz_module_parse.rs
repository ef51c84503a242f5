#![no_main]

use libfuzzer_sys::fuzz_target;

use compiler::Module;

fuzz_target!(|data: &[u8]| {
    // Parsing must reject malformed input without panicking, and accepted
    // input must survive a byte-identical round trip.
    if let Ok(module) = Module::parse(data) {
        let bytes = module.to_bytes();
        assert_eq!(&bytes[..], &data[..bytes.len()]);
    }
});
