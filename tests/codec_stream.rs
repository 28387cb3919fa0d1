//! Integration tests for streamed decoding through `FramedRead`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use futures::StreamExt;
use inform_protocol::config::DecoderConfig;
use inform_protocol::{InformCodec, InformDecoder, InformError, Packet};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::FramedRead;

fn wire(flags: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = b"UBNT".to_vec();
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&[0x24, 0xa4, 0x3c, 0x00, 0x00, 0x07]);
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&[0u8; 16]);
    out.extend_from_slice(&1u32.to_be_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

#[tokio::test]
async fn test_stream_of_packets() {
    let mut bytes = wire(0, b"first");
    bytes.extend_from_slice(&wire(0, b"second"));
    bytes.extend_from_slice(&wire(0, b"third"));

    let mut framed = FramedRead::new(&bytes[..], InformCodec::new());
    let mut payloads = Vec::new();
    while let Some(packet) = framed.next().await {
        payloads.push(packet.unwrap().payload);
    }
    assert_eq!(payloads, vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]);
}

#[tokio::test]
async fn test_packets_split_across_writes() {
    let (mut tx, rx) = tokio::io::duplex(16);
    let bytes = wire(0, &[0x5a; 300]);

    let writer = tokio::spawn(async move {
        for chunk in bytes.chunks(7) {
            tx.write_all(chunk).await.unwrap();
        }
    });

    let mut framed = FramedRead::new(rx, InformCodec::new());
    let packet = framed.next().await.unwrap().unwrap();
    assert_eq!(packet.payload, vec![0x5a; 300]);

    writer.await.unwrap();
    assert!(framed.next().await.is_none());
}

#[tokio::test]
async fn test_stream_ends_mid_packet() {
    let bytes = wire(0, b"truncated");
    let mut framed = FramedRead::new(&bytes[..bytes.len() - 3], InformCodec::new());
    match framed.next().await {
        Some(Err(InformError::IncompletePacket(_))) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_bad_magic() {
    let mut bytes = wire(0, b"payload");
    bytes[..4].copy_from_slice(b"GET ");
    let mut framed = FramedRead::new(&bytes[..], InformCodec::new());
    assert!(matches!(
        framed.next().await,
        Some(Err(InformError::InvalidMagic))
    ));
}

#[tokio::test]
async fn test_decoder_codec_shares_limit() {
    let config = DecoderConfig {
        max_payload_size: 8,
        ..DecoderConfig::default()
    };
    let decoder = InformDecoder::with_key(config, &[0u8; 16]).unwrap();
    let bytes = wire(0, b"more than eight bytes");
    let mut framed = FramedRead::new(&bytes[..], decoder.codec());
    assert!(matches!(
        framed.next().await,
        Some(Err(InformError::OversizedPacket { .. }))
    ));
}

#[tokio::test]
async fn test_async_decode_over_duplex() {
    let (mut tx, mut rx) = tokio::io::duplex(64);
    let bytes = wire(0, b"async payload");
    tokio::spawn(async move {
        tx.write_all(&bytes).await.unwrap();
    });

    let decoder = InformDecoder::new(DecoderConfig::default()).unwrap();
    let packet = decoder.decode_async(&mut rx).await.unwrap();
    assert_eq!(decoder.resolve(&packet).unwrap(), b"async payload");
}

#[tokio::test]
async fn test_async_decode_closed_stream() {
    let (tx, mut rx) = tokio::io::duplex(64);
    drop(tx);
    match Packet::decode_async(&mut rx).await {
        Err(InformError::IncompletePacket(reason)) => assert_eq!(reason, "header too short"),
        other => panic!("unexpected: {other:?}"),
    }
}
