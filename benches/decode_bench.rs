use aes::Aes128;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use inform_protocol::Packet;

const KEY: [u8; 16] = [0x42; 16];
const IV: [u8; 16] = [0x24; 16];

fn wire(flags: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = b"UBNT".to_vec();
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&[0u8; 6]);
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&IV);
    out.extend_from_slice(&1u32.to_be_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

#[allow(clippy::unwrap_used)]
fn bench_decode_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_resolve");
    let payload_sizes = [64usize, 512, 4096, 65536, 1024 * 1024];

    for &size in &payload_sizes {
        let plaintext = vec![b'x'; size];
        group.throughput(Throughput::Bytes(size as u64));

        let plain = wire(0, &plaintext);
        group.bench_function(format!("decode_{size}b"), |b| {
            b.iter(|| {
                let decoded = Packet::from_bytes(&plain);
                assert!(decoded.is_ok());
            })
        });

        let ciphertext = cbc::Encryptor::<Aes128>::new(&KEY.into(), &IV.into())
            .encrypt_padded_vec_mut::<Pkcs7>(&plaintext);
        let encrypted = wire(0x0001, &ciphertext);
        group.bench_function(format!("decode_decrypt_{size}b"), |b| {
            b.iter(|| {
                let packet = Packet::from_bytes(&encrypted).unwrap();
                let out = packet.resolve_payload(&KEY).unwrap();
                assert_eq!(out.len(), size);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_resolve);
criterion_main!(benches);
