#![no_main]

use libfuzzer_sys::fuzz_target;
use inform_protocol::config::MAX_DECOMPRESSED_SIZE;
use inform_protocol::utils::compression::decompress_snappy;
use inform_protocol::utils::padding::pkcs7_unpad;

fuzz_target!(|data: &[u8]| {
    // Raw snappy input must fail cleanly and respect the output limit
    if let Ok(out) = decompress_snappy(data, MAX_DECOMPRESSED_SIZE) {
        assert!(out.len() <= MAX_DECOMPRESSED_SIZE);
    }

    if let Ok(unpadded) = pkcs7_unpad(data) {
        assert!(unpadded.len() < data.len());
    }
});
