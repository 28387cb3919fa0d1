#![no_main]

use libfuzzer_sys::fuzz_target;
use inform_protocol::Packet;

fuzz_target!(|data: &[u8]| {
    // Fuzz packet framing and payload resolution - test for panics, crashes, huge allocations
    if let Ok(packet) = Packet::from_bytes(data) {
        let _ = packet.resolve_payload(&[0x42; 16]);
    }
});
